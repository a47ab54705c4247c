use ndarray::Array2;

use crate::geometry::domain::quad::Quad;

pub const MASK_SET: u8 = 255;

/// Single-channel binary selector with the same geometry as a frame.
///
/// A pixel is set (255) or clear (0); indexing is `[[row, col]]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    data: Array2<u8>,
}

impl Mask {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            data: Array2::zeros((height as usize, width as usize)),
        }
    }

    /// Rasterises `quad` as a filled polygon.
    ///
    /// A pixel is set iff its centre lies inside the quad, so an
    /// axis-aligned `w` x `h` quad on integer corners sets exactly `w * h`
    /// pixels. Parts of the quad outside the mask are clipped.
    pub fn filled_quad(width: u32, height: u32, quad: &Quad) -> Self {
        let mut mask = Self::empty(width, height);
        if width == 0 || height == 0 {
            return mask;
        }

        let min_y = quad.corners.iter().map(|p| p.y).fold(f64::MAX, f64::min);
        let max_y = quad.corners.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        let row_start = ((min_y - 0.5).ceil().max(0.0)) as usize;
        let row_end = ((max_y - 0.5).ceil().min(height as f64)).max(0.0) as usize;

        let mut crossings: Vec<f64> = Vec::with_capacity(4);
        for row in row_start..row_end {
            let yc = row as f64 + 0.5;
            crossings.clear();
            let c = &quad.corners;
            let mut j = 3;
            for i in 0..4 {
                let (a, b) = (c[i], c[j]);
                if (a.y > yc) != (b.y > yc) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
                j = i;
            }
            crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().clamp(0.0, width as f64) as usize;
                let end = (span[1] - 0.5).ceil().clamp(0.0, width as f64) as usize;
                for col in start..end {
                    mask.data[[row, col]] = MASK_SET;
                }
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.data.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.data.nrows() as u32
    }

    pub fn is_set(&self, col: usize, row: usize) -> bool {
        self.data[[row, col]] != 0
    }

    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Bitwise NOT of every pixel.
    pub fn inverted(&self) -> Mask {
        Mask {
            data: self.data.mapv(|v| !v),
        }
    }

    /// Bitwise AND with a mask of the same geometry.
    pub fn and(&self, other: &Mask) -> Mask {
        debug_assert_eq!(self.data.dim(), other.data.dim(), "mask dimensions differ");
        Mask {
            data: &self.data & &other.data,
        }
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.data
    }
}
