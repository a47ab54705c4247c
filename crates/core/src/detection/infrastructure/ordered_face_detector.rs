use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Decorator that returns boxes sorted left-to-right, then top-to-bottom.
///
/// Stickers are composited in detection order and overwrite each other
/// where they overlap, so a fixed order keeps the overlap result stable.
pub struct OrderedFaceDetector {
    inner: Box<dyn FaceDetector>,
}

impl OrderedFaceDetector {
    pub fn new(inner: Box<dyn FaceDetector>) -> Self {
        Self { inner }
    }
}

impl FaceDetector for OrderedFaceDetector {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        let mut boxes = self.inner.detect(gray)?;
        boxes.sort_by_key(|b| (b.x, b.y, b.width, b.height));
        Ok(boxes)
    }
}
