use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("camera {index} is unavailable: {reason}")]
    DeviceUnavailable { index: i32, reason: String },
    #[error("failed to grab frame: {0}")]
    CaptureFailed(String),
}

/// Geometry reported by a source once it is open.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// Yields frames from a live capture device.
///
/// `next_frame` blocks until the device delivers a frame; there is no
/// timeout. End-of-stream and hardware errors both surface as
/// [`CaptureError::CaptureFailed`].
pub trait FrameSource {
    fn open(&mut self, device_index: i32) -> Result<SourceInfo, CaptureError>;

    fn next_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Releases the device. Must be safe to call more than once.
    fn close(&mut self);
}

/// An open [`FrameSource`] that is closed when the guard goes out of scope.
///
/// Covers every exit path of the capture loop, including early returns and
/// unwinding.
pub struct OpenSource<'a> {
    source: &'a mut dyn FrameSource,
    info: SourceInfo,
}

impl<'a> OpenSource<'a> {
    /// Opens `source`. A source that fails to open is still closed before
    /// the error is returned.
    pub fn open(source: &'a mut dyn FrameSource, device_index: i32) -> Result<Self, CaptureError> {
        match source.open(device_index) {
            Ok(info) => Ok(Self { source, info }),
            Err(e) => {
                source.close();
                Err(e)
            }
        }
    }

    pub fn info(&self) -> SourceInfo {
        self.info
    }

    pub fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        self.source.next_frame()
    }
}

impl Drop for OpenSource<'_> {
    fn drop(&mut self) {
        self.source.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct StubSource {
        fail_open: bool,
        frames: Vec<Frame>,
        closes: Arc<Mutex<usize>>,
    }

    impl FrameSource for StubSource {
        fn open(&mut self, device_index: i32) -> Result<SourceInfo, CaptureError> {
            if self.fail_open {
                return Err(CaptureError::DeviceUnavailable {
                    index: device_index,
                    reason: "no such device".into(),
                });
            }
            Ok(SourceInfo {
                width: 4,
                height: 4,
                fps: 30.0,
            })
        }

        fn next_frame(&mut self) -> Result<Frame, CaptureError> {
            self.frames
                .pop()
                .ok_or_else(|| CaptureError::CaptureFailed("end of stream".into()))
        }

        fn close(&mut self) {
            *self.closes.lock().unwrap() += 1;
        }
    }

    fn stub(fail_open: bool, frames: Vec<Frame>) -> (StubSource, Arc<Mutex<usize>>) {
        let closes = Arc::new(Mutex::new(0));
        (
            StubSource {
                fail_open,
                frames,
                closes: closes.clone(),
            },
            closes,
        )
    }

    #[test]
    fn test_guard_closes_on_drop() {
        let (mut source, closes) = stub(false, vec![Frame::zeroed(4, 4, 3, 0)]);
        {
            let mut open = OpenSource::open(&mut source, 0).unwrap();
            assert_eq!(open.info().width, 4);
            assert!(open.next_frame().is_ok());
        }
        assert_eq!(*closes.lock().unwrap(), 1);
    }

    #[test]
    fn test_guard_closes_after_capture_failure() {
        let (mut source, closes) = stub(false, vec![]);
        let result = (|| -> Result<Frame, CaptureError> {
            let mut open = OpenSource::open(&mut source, 0)?;
            open.next_frame()
        })();
        assert!(matches!(result, Err(CaptureError::CaptureFailed(_))));
        assert_eq!(*closes.lock().unwrap(), 1);
    }

    #[test]
    fn test_failed_open_releases_source() {
        let (mut source, closes) = stub(true, vec![]);
        let result = OpenSource::open(&mut source, 3);
        match result {
            Err(CaptureError::DeviceUnavailable { index, .. }) => assert_eq!(index, 3),
            _ => panic!("expected DeviceUnavailable"),
        }
        assert_eq!(*closes.lock().unwrap(), 1);
    }

    #[test]
    fn test_error_messages() {
        let e = CaptureError::DeviceUnavailable {
            index: 1,
            reason: "busy".into(),
        };
        assert_eq!(e.to_string(), "camera 1 is unavailable: busy");
        let e = CaptureError::CaptureFailed("eof".into());
        assert_eq!(e.to_string(), "failed to grab frame: eof");
    }
}
