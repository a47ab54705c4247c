//! Frontal face detector backed by an OpenCV Haar cascade.

use std::path::Path;

use opencv::core::{Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::face_detector::{DetectionParams, FaceDetector};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;
use crate::shared::mat_conversion::frame_to_mat;

/// Runs `detectMultiScale` with the configured [`DetectionParams`].
pub struct CascadeFaceDetector {
    classifier: CascadeClassifier,
    params: DetectionParams,
}

impl CascadeFaceDetector {
    /// Load a cascade XML model.
    ///
    /// Fails if the file cannot be parsed into a non-empty classifier.
    pub fn new(model_path: &Path, params: DetectionParams) -> Result<Self, Box<dyn std::error::Error>> {
        params.validate()?;
        let path = model_path
            .to_str()
            .ok_or_else(|| format!("Model path is not valid UTF-8: {}", model_path.display()))?;
        let classifier = CascadeClassifier::new(path)?;
        if classifier.empty()? {
            return Err(format!("Could not load Haar cascade at {}", model_path.display()).into());
        }
        Ok(Self { classifier, params })
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        if gray.channels() != 1 {
            return Err(format!(
                "Cascade detector expects a grayscale frame, got {} channels",
                gray.channels()
            )
            .into());
        }
        let mat = frame_to_mat(gray)?;

        let mut faces: Vector<Rect> = Vector::new();
        self.classifier.detect_multi_scale(
            &mat,
            &mut faces,
            self.params.scale_factor,
            self.params.min_neighbors,
            0,
            Size::new(self.params.min_size.0, self.params.min_size.1),
            Size::default(),
        )?;

        Ok(faces
            .iter()
            .map(|r| BoundingBox::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}
