use crate::shared::frame::Frame;

/// Domain interface for presenting composited frames to the user.
///
/// The display also owns the stop signal: `poll_key` is non-blocking and
/// returns the key pressed since the last call, if any.
pub trait FrameDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    fn poll_key(&mut self) -> Result<Option<char>, Box<dyn std::error::Error>>;

    /// Tears the window down. Safe to call more than once.
    fn close(&mut self);
}
