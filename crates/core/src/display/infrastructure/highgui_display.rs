//! On-screen window backed by OpenCV's highgui module.

use opencv::highgui;

use crate::display::domain::frame_display::FrameDisplay;
use crate::shared::frame::Frame;
use crate::shared::mat_conversion::frame_to_mat;

/// Milliseconds `wait_key` waits for input; also drives window events.
const KEY_POLL_MS: i32 = 1;

pub struct HighguiDisplay {
    title: String,
    opened: bool,
}

impl HighguiDisplay {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            opened: false,
        }
    }
}

impl FrameDisplay for HighguiDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if !self.opened {
            highgui::named_window(&self.title, highgui::WINDOW_AUTOSIZE)?;
            self.opened = true;
        }
        let mat = frame_to_mat(frame)?;
        highgui::imshow(&self.title, &mat)?;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<char>, Box<dyn std::error::Error>> {
        let code = highgui::wait_key(KEY_POLL_MS)?;
        if code < 0 {
            return Ok(None);
        }
        Ok(char::from_u32((code & 0xFF) as u32))
    }

    fn close(&mut self) {
        if !self.opened {
            return;
        }
        self.opened = false;
        if let Err(e) = highgui::destroy_window(&self.title) {
            log::warn!("Failed to destroy window {:?}: {e}", self.title);
        }
    }
}

impl Drop for HighguiDisplay {
    fn drop(&mut self) {
        self.close();
    }
}
