use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::capture::domain::frame_source::{CaptureError, FrameSource, SourceInfo};
use crate::shared::frame::Frame;
use crate::shared::mat_conversion::mat_to_frame;

/// Webcam capture through OpenCV's `VideoCapture`.
///
/// Delivers unmirrored RGB frames; wrap in
/// [`MirroringFrameSource`](super::mirroring_frame_source::MirroringFrameSource)
/// for a mirror view.
pub struct OpencvCamera {
    capture: Option<VideoCapture>,
    frame_count: usize,
}

impl OpencvCamera {
    pub fn new() -> Self {
        Self {
            capture: None,
            frame_count: 0,
        }
    }
}

impl Default for OpencvCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for OpencvCamera {
    fn open(&mut self, device_index: i32) -> Result<SourceInfo, CaptureError> {
        let unavailable = |reason: String| CaptureError::DeviceUnavailable {
            index: device_index,
            reason,
        };

        let capture = VideoCapture::new(device_index, videoio::CAP_ANY)
            .map_err(|e| unavailable(e.to_string()))?;
        if !capture.is_opened().map_err(|e| unavailable(e.to_string()))? {
            return Err(unavailable("device could not be opened".into()));
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH).unwrap_or(0.0);
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT).unwrap_or(0.0);
        let fps = capture.get(videoio::CAP_PROP_FPS).unwrap_or(0.0);
        log::info!("Camera {device_index} opened at {width}x{height} @ {fps:.1}fps");

        self.capture = Some(capture);
        self.frame_count = 0;
        Ok(SourceInfo {
            width: width as u32,
            height: height as u32,
            fps,
        })
    }

    fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        let capture = self
            .capture
            .as_mut()
            .ok_or_else(|| CaptureError::CaptureFailed("camera not opened".into()))?;

        let mut mat = Mat::default();
        let grabbed = capture
            .read(&mut mat)
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
        if !grabbed || mat.empty() {
            return Err(CaptureError::CaptureFailed(
                "camera returned no frame".into(),
            ));
        }

        let frame = mat_to_frame(&mat, self.frame_count)
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
        self.frame_count += 1;
        Ok(frame)
    }

    fn close(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera: {e}");
            }
        }
    }
}
