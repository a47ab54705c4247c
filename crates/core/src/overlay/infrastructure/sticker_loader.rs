use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::overlay::domain::sticker_asset::StickerAsset;

#[derive(Error, Debug)]
pub enum StickerLoadError {
    #[error("could not load sticker image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("sticker image {} has no pixels", path.display())]
    Empty { path: PathBuf },
}

/// Decodes the sticker at `path` into an RGB asset.
///
/// Any alpha channel is discarded. Errors carry the absolute path so the
/// message is useful regardless of the working directory.
pub fn load_sticker(path: &Path) -> Result<StickerAsset, StickerLoadError> {
    let absolute = absolute_path(path);
    let image = image::open(path)
        .map_err(|source| StickerLoadError::Decode {
            path: absolute.clone(),
            source,
        })?
        .to_rgb8();

    if image.width() == 0 || image.height() == 0 {
        return Err(StickerLoadError::Empty { path: absolute });
    }

    log::info!(
        "Loaded sticker {} ({}x{})",
        absolute.display(),
        image.width(),
        image.height()
    );
    Ok(StickerAsset::new(image))
}

fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sticker.png");
        RgbImage::from_pixel(12, 8, Rgb([9, 8, 7]))
            .save(&path)
            .unwrap();

        let sticker = load_sticker(&path).unwrap();
        assert_eq!(sticker.width(), 12);
        assert_eq!(sticker.height(), 8);
        assert_eq!(&sticker.resized(12, 8).data()[..3], &[9, 8, 7]);
    }

    #[test]
    fn test_alpha_channel_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sticker.png");
        RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 0]))
            .save(&path)
            .unwrap();

        let frame = load_sticker(&path).unwrap().resized(4, 4);
        assert_eq!(frame.channels(), 3);
        assert_eq!(&frame.data()[..3], &[200, 100, 50]);
    }

    #[test]
    fn test_missing_file_reports_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.png");

        let err = load_sticker(&path).unwrap_err();
        assert!(matches!(err, StickerLoadError::Decode { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn test_relative_path_made_absolute() {
        let err = load_sticker(Path::new("definitely_not_here_sticker.png")).unwrap_err();
        let StickerLoadError::Decode { path, .. } = err else {
            panic!("expected decode error");
        };
        assert!(path.is_absolute());
        assert!(path.ends_with("definitely_not_here_sticker.png"));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(load_sticker(&path).is_err());
    }
}
