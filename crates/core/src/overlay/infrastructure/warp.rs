use crate::geometry::domain::quad::{Point, Quad};
use crate::geometry::domain::transform::Transform;
use crate::overlay::domain::mask::Mask;
use crate::shared::frame::Frame;

/// Projects `src` through `transform` onto a black canvas of the given size.
///
/// Each canvas pixel centre is mapped back through the inverse transform and
/// takes the nearest source pixel; centres that land outside `src` stay
/// zero. Only the bounding rectangle of `dest` is scanned because a
/// projective map carries the source rectangle exactly onto `dest`.
/// Returns `None` if the transform is not invertible.
pub(super) fn warp_perspective(
    src: &Frame,
    transform: &Transform,
    dest: &Quad,
    width: u32,
    height: u32,
) -> Option<Frame> {
    let inverse = transform.inverse()?;
    let channels = src.channels() as usize;
    let mut canvas = Frame::zeroed(width, height, src.channels(), 0);

    let (col_range, row_range) = scan_window(dest, width, height);
    let sw = src.width() as f64;
    let sh = src.height() as f64;
    let src_stride = src.width() as usize * channels;
    let dst_stride = width as usize * channels;
    let src_data = src.data();
    let out = canvas.data_mut();

    for row in row_range {
        for col in col_range.clone() {
            let centre = Point::new(col as f64 + 0.5, row as f64 + 0.5);
            let Some(p) = inverse.apply(centre) else {
                continue;
            };
            if !(p.x >= 0.0 && p.x < sw && p.y >= 0.0 && p.y < sh) {
                continue;
            }
            let sx = p.x.floor() as usize;
            let sy = p.y.floor() as usize;
            let s = sy * src_stride + sx * channels;
            let d = row * dst_stride + col * channels;
            out[d..d + channels].copy_from_slice(&src_data[s..s + channels]);
        }
    }
    Some(canvas)
}

/// `frame = (frame AND keep) OR canvas`, per channel byte.
pub(super) fn composite_masked(frame: &mut Frame, keep: &Mask, canvas: &Frame) {
    debug_assert_eq!(frame.width(), canvas.width());
    debug_assert_eq!(frame.height(), canvas.height());
    debug_assert_eq!(frame.channels(), canvas.channels());

    let channels = frame.channels() as usize;
    let keep = keep.as_array();
    let over = canvas.data();
    for (i, px) in frame.data_mut().chunks_exact_mut(channels).enumerate() {
        let row = i / keep.ncols();
        let col = i % keep.ncols();
        let k = keep[[row, col]];
        let base = i * channels;
        for (c, v) in px.iter_mut().enumerate() {
            *v = (*v & k) | over[base + c];
        }
    }
}

fn scan_window(
    dest: &Quad,
    width: u32,
    height: u32,
) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
    let xs = dest.corners.iter().map(|p| p.x);
    let ys = dest.corners.iter().map(|p| p.y);
    let min_x = xs.clone().fold(f64::MAX, f64::min);
    let max_x = xs.fold(f64::MIN, f64::max);
    let min_y = ys.clone().fold(f64::MAX, f64::min);
    let max_y = ys.fold(f64::MIN, f64::max);

    let clamp = |v: f64, hi: u32| v.clamp(0.0, hi as f64) as usize;
    (
        clamp(min_x.floor(), width)..clamp(max_x.ceil(), width),
        clamp(min_y.floor(), height)..clamp(max_y.ceil(), height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix3;

    fn translation(dx: f64, dy: f64) -> Transform {
        Transform::new(Matrix3::new(1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0, 1.0))
    }

    #[test]
    fn test_translation_places_source_exactly() {
        let src = Frame::new(vec![9; 2 * 2 * 3], 2, 2, 3, 0);
        let dest = Quad::new([
            Point::new(3.0, 1.0),
            Point::new(5.0, 1.0),
            Point::new(5.0, 3.0),
            Point::new(3.0, 3.0),
        ]);
        let canvas = warp_perspective(&src, &translation(3.0, 1.0), &dest, 6, 4).unwrap();
        let arr = canvas.as_ndarray();
        for row in 0..4 {
            for col in 0..6 {
                let inside = (3..5).contains(&col) && (1..3).contains(&row);
                let expected = if inside { 9 } else { 0 };
                assert_eq!(arr[[row, col, 0]], expected, "pixel ({col},{row})");
            }
        }
    }

    #[test]
    fn test_scale_up_uses_nearest_source_pixel() {
        // 2x1 source (red, blue) stretched to 4x1.
        let src = Frame::new(vec![255, 0, 0, 0, 0, 255], 2, 1, 3, 0);
        let t = Transform::new(Matrix3::new(2.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        let dest = Quad::from_size(4, 1);
        let canvas = warp_perspective(&src, &t, &dest, 4, 1).unwrap();
        assert_eq!(
            canvas.data(),
            &[255, 0, 0, 255, 0, 0, 0, 0, 255, 0, 0, 255]
        );
    }

    #[test]
    fn test_singular_transform_returns_none() {
        let src = Frame::zeroed(2, 2, 3, 0);
        let t = Transform::new(Matrix3::zeros());
        assert!(warp_perspective(&src, &t, &Quad::from_size(2, 2), 4, 4).is_none());
    }

    #[test]
    fn test_composite_masked_replaces_only_masked_pixels() {
        let mut frame = Frame::new(vec![100; 6], 2, 1, 3, 0);
        let canvas = Frame::new(vec![7, 7, 7, 0, 0, 0], 2, 1, 3, 0);
        let quad = Quad::from_size(1, 1);
        let keep = Mask::filled_quad(2, 1, &quad).inverted();
        composite_masked(&mut frame, &keep, &canvas);
        assert_eq!(frame.data(), &[7, 7, 7, 100, 100, 100]);
    }
}
