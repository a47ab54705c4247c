use crate::geometry::domain::geometry_solver::GeometrySolver;
use crate::geometry::domain::quad::Quad;
use crate::overlay::domain::mask::Mask;
use crate::overlay::domain::overlay_compositor::{CompositeOutcome, OverlayCompositor};
use crate::overlay::domain::sticker_asset::StickerAsset;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

use super::warp::{composite_masked, warp_perspective};

/// CPU compositor that warps the sticker into the face-sized region
/// directly above each face.
///
/// Inside the destination quad the sticker replaces the frame pixels
/// outright; there is no alpha blending or edge smoothing.
pub struct StickerCompositor {
    sticker: StickerAsset,
    solver: Box<dyn GeometrySolver>,
}

impl StickerCompositor {
    pub fn new(sticker: StickerAsset, solver: Box<dyn GeometrySolver>) -> Self {
        Self { sticker, solver }
    }
}

impl OverlayCompositor for StickerCompositor {
    fn composite(
        &self,
        frame: &mut Frame,
        face: &BoundingBox,
    ) -> Result<CompositeOutcome, Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!(
                "Sticker compositing needs an RGB frame, got {} channels",
                frame.channels()
            )
            .into());
        }
        if face.is_empty() {
            return Ok(CompositeOutcome::Skipped {
                reason: format!("empty face box {}x{}", face.width, face.height),
            });
        }

        let (w, h) = (face.width as u32, face.height as u32);
        let resized = self.sticker.resized(w, h);
        let source = Quad::from_size(w, h);
        let dest = Quad::above_face(face);

        let transform = match self.solver.solve(&source, &dest) {
            Ok(t) => t,
            Err(e) => {
                log::debug!("Skipping face at ({}, {}): {e}", face.x, face.y);
                return Ok(CompositeOutcome::Skipped {
                    reason: e.to_string(),
                });
            }
        };

        let Some(canvas) =
            warp_perspective(&resized, &transform, &dest, frame.width(), frame.height())
        else {
            return Ok(CompositeOutcome::Skipped {
                reason: "transform is not invertible".into(),
            });
        };

        let keep = Mask::filled_quad(frame.width(), frame.height(), &dest).inverted();
        composite_masked(frame, &keep, &canvas);

        Ok(CompositeOutcome::Applied)
    }
}
