use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;
pub const DEFAULT_MIN_NEIGHBORS: i32 = 5;
pub const DEFAULT_MIN_SIZE: (i32, i32) = (30, 30);

/// Tuning knobs for multi-scale face detection.
///
/// The defaults favour fewer false positives at a 10% pyramid step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    /// Image pyramid step between scales; must be greater than 1.
    pub scale_factor: f64,
    /// Overlapping hits a candidate needs to be kept.
    pub min_neighbors: i32,
    /// Smallest face considered, as `(width, height)` in pixels.
    pub min_size: (i32, i32),
}

impl DetectionParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.scale_factor.is_nan() || self.scale_factor <= 1.0 {
            return Err(format!(
                "Scale factor must be greater than 1.0, got {}",
                self.scale_factor
            ));
        }
        if self.min_neighbors < 0 {
            return Err(format!(
                "Min neighbors must not be negative, got {}",
                self.min_neighbors
            ));
        }
        if self.min_size.0 < 1 || self.min_size.1 < 1 {
            return Err(format!(
                "Min size must be at least 1x1, got {}x{}",
                self.min_size.0, self.min_size.1
            ));
        }
        Ok(())
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

/// Domain interface for face detection on a grayscale frame.
///
/// The returned boxes are an unordered set. Implementations may keep
/// state between calls, hence `&mut self`.
pub trait FaceDetector {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>>;
}
