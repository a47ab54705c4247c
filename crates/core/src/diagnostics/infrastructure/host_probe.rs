use sysinfo::System;

use crate::capture::domain::frame_source::{FrameSource, OpenSource};
use crate::diagnostics::capability_check::SystemProbe;

/// Builds a fresh, unopened camera for the readability probe.
pub type CameraFactory = Box<dyn FnMut() -> Box<dyn FrameSource>>;

/// [`SystemProbe`] for the machine the process runs on.
///
/// Memory and OS come from `sysinfo`, core count from `num_cpus`. The camera
/// probe opens the device, reads one frame and releases it again.
pub struct HostProbe {
    system: System,
    camera_factory: CameraFactory,
    device_index: i32,
}

impl HostProbe {
    pub fn new(camera_factory: CameraFactory, device_index: i32) -> Self {
        Self {
            system: System::new(),
            camera_factory,
            device_index,
        }
    }
}

impl SystemProbe for HostProbe {
    fn total_memory_bytes(&mut self) -> u64 {
        self.system.refresh_memory();
        self.system.total_memory()
    }

    fn logical_cores(&self) -> usize {
        num_cpus::get()
    }

    fn camera_readable(&mut self) -> bool {
        let mut camera = (self.camera_factory)();
        let readable = match OpenSource::open(camera.as_mut(), self.device_index) {
            Ok(mut open) => match open.next_frame() {
                Ok(_) => true,
                Err(e) => {
                    log::debug!("Camera probe could not read a frame: {e}");
                    false
                }
            },
            Err(e) => {
                log::debug!("Camera probe could not open device: {e}");
                false
            }
        };
        camera.close();
        readable
    }

    fn os_description(&self) -> String {
        System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| std::env::consts::OS.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::domain::frame_source::{CaptureError, SourceInfo};
    use crate::shared::frame::Frame;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        opens: usize,
        reads: usize,
        closes: usize,
    }

    struct StubCamera {
        open_ok: bool,
        read_ok: bool,
        calls: Arc<Mutex<Calls>>,
    }

    impl FrameSource for StubCamera {
        fn open(&mut self, device_index: i32) -> Result<SourceInfo, CaptureError> {
            self.calls.lock().unwrap().opens += 1;
            if !self.open_ok {
                return Err(CaptureError::DeviceUnavailable {
                    index: device_index,
                    reason: "busy".into(),
                });
            }
            Ok(SourceInfo {
                width: 2,
                height: 2,
                fps: 30.0,
            })
        }

        fn next_frame(&mut self) -> Result<Frame, CaptureError> {
            self.calls.lock().unwrap().reads += 1;
            if self.read_ok {
                Ok(Frame::zeroed(2, 2, 3, 0))
            } else {
                Err(CaptureError::CaptureFailed("empty".into()))
            }
        }

        fn close(&mut self) {
            self.calls.lock().unwrap().closes += 1;
        }
    }

    fn probe(open_ok: bool, read_ok: bool) -> (HostProbe, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let shared = calls.clone();
        let factory: CameraFactory = Box::new(move || {
            Box::new(StubCamera {
                open_ok,
                read_ok,
                calls: shared.clone(),
            })
        });
        (HostProbe::new(factory, 0), calls)
    }

    #[test]
    fn test_readable_camera() {
        let (mut probe, calls) = probe(true, true);
        assert!(probe.camera_readable());
        let calls = calls.lock().unwrap();
        assert_eq!(calls.reads, 1);
        assert!(calls.closes >= 1);
    }

    #[test]
    fn test_camera_that_cannot_open() {
        let (mut probe, calls) = probe(false, true);
        assert!(!probe.camera_readable());
        let calls = calls.lock().unwrap();
        assert_eq!(calls.reads, 0);
        assert!(calls.closes >= 1);
    }

    #[test]
    fn test_camera_that_cannot_read() {
        let (mut probe, calls) = probe(true, false);
        assert!(!probe.camera_readable());
        assert!(calls.lock().unwrap().closes >= 1);
    }

    #[test]
    fn test_host_facts_are_populated() {
        let (mut probe, _) = probe(true, true);
        assert!(probe.logical_cores() >= 1);
        assert!(probe.total_memory_bytes() > 0);
        assert!(!probe.os_description().is_empty());
    }
}
