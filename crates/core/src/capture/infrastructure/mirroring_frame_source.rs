use crate::capture::domain::frame_source::{CaptureError, FrameSource, SourceInfo};
use crate::shared::frame::Frame;

/// Decorator that flips every captured frame left-to-right.
///
/// Downstream stages see a mirror-corrected view and never need to know
/// which way the camera faces.
pub struct MirroringFrameSource {
    inner: Box<dyn FrameSource>,
}

impl MirroringFrameSource {
    pub fn new(inner: Box<dyn FrameSource>) -> Self {
        Self { inner }
    }
}

impl FrameSource for MirroringFrameSource {
    fn open(&mut self, device_index: i32) -> Result<SourceInfo, CaptureError> {
        self.inner.open(device_index)
    }

    fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        let mut frame = self.inner.next_frame()?;
        frame.mirror_horizontal();
        Ok(frame)
    }

    fn close(&mut self) {
        self.inner.close();
    }
}
