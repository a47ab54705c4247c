use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// What happened to one face during compositing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompositeOutcome {
    Applied,
    /// The face was left untouched for this frame only.
    Skipped { reason: String },
}

/// Domain interface for pasting the sticker relative to one detected face.
///
/// Implementations modify the frame in place and keep no state between
/// calls: the same inputs always produce the same frame.
pub trait OverlayCompositor {
    fn composite(
        &self,
        frame: &mut Frame,
        face: &BoundingBox,
    ) -> Result<CompositeOutcome, Box<dyn std::error::Error>>;
}
