use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::shared::frame::Frame;

/// The 2-D image pasted above each detected face.
///
/// Loaded once per session and never mutated; every face gets its own
/// resized copy.
#[derive(Clone, Debug)]
pub struct StickerAsset {
    image: RgbImage,
}

impl StickerAsset {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Bilinear resize to exactly `width` x `height`, as an RGB frame.
    pub fn resized(&self, width: u32, height: u32) -> Frame {
        let scaled = if (width, height) == self.image.dimensions() {
            self.image.clone()
        } else {
            imageops::resize(&self.image, width, height, FilterType::Triangle)
        };
        Frame::new(scaled.into_raw(), width, height, 3, 0)
    }
}
