use crate::shared::bounding_box::BoundingBox;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Four corners in canonical order: top-left, top-right, bottom-right,
/// bottom-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub corners: [Point; 4],
}

impl Quad {
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Corners of a `width` x `height` image in its own pixel space.
    pub fn from_size(width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self::new([
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ])
    }

    pub fn from_box(b: &BoundingBox) -> Self {
        let (x0, y0) = (b.x as f64, b.y as f64);
        let (x1, y1) = (b.right() as f64, b.bottom() as f64);
        Self::new([
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    /// Sticker destination for a detected face: the face-sized region
    /// directly above the face, so the sticker never covers the face itself.
    pub fn above_face(face: &BoundingBox) -> Self {
        Self::from_box(&face.above())
    }

    /// Shoelace area; positive for clockwise corners in image coordinates.
    pub fn signed_area(&self) -> f64 {
        let c = &self.corners;
        let mut acc = 0.0;
        for i in 0..4 {
            let a = c[i];
            let b = c[(i + 1) % 4];
            acc += a.x * b.y - b.x * a.y;
        }
        acc / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// True when any three corners are (nearly) collinear.
    pub fn is_degenerate(&self) -> bool {
        let c = &self.corners;
        let scale = self.extent().max(1.0);
        let eps = 1e-9 * scale * scale;
        for skip in 0..4 {
            let pts: Vec<Point> = (0..4).filter(|&i| i != skip).map(|i| c[i]).collect();
            let cross = (pts[1].x - pts[0].x) * (pts[2].y - pts[0].y)
                - (pts[1].y - pts[0].y) * (pts[2].x - pts[0].x);
            if cross.abs() <= eps {
                return true;
            }
        }
        false
    }

    fn extent(&self) -> f64 {
        let xs = self.corners.iter().map(|p| p.x);
        let ys = self.corners.iter().map(|p| p.y);
        let (min_x, max_x) = xs.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let (min_y, max_y) = ys.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        (max_x - min_x).max(max_y - min_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_above_face_matches_reference_layout() {
        let quad = Quad::above_face(&BoundingBox::new(100, 100, 50, 50));
        assert_eq!(
            quad.corners,
            [
                Point::new(100.0, 50.0),
                Point::new(150.0, 50.0),
                Point::new(150.0, 100.0),
                Point::new(100.0, 100.0),
            ]
        );
    }

    #[test]
    fn test_above_face_shares_top_edge_of_face() {
        let face = BoundingBox::new(30, 200, 80, 120);
        let quad = Quad::above_face(&face);
        assert_relative_eq!(quad.corners[2].y, 200.0);
        assert_relative_eq!(quad.corners[0].y, 80.0);
        assert_relative_eq!(quad.area(), 80.0 * 120.0);
    }

    #[test]
    fn test_from_size_canonical_order() {
        let quad = Quad::from_size(40, 20);
        assert_eq!(quad.corners[0], Point::new(0.0, 0.0));
        assert_eq!(quad.corners[1], Point::new(40.0, 0.0));
        assert_eq!(quad.corners[2], Point::new(40.0, 20.0));
        assert_eq!(quad.corners[3], Point::new(0.0, 20.0));
        assert!(quad.signed_area() > 0.0);
    }

    #[rstest]
    #[case::zero_width(Quad::from_size(0, 10), true)]
    #[case::zero_height(Quad::from_size(10, 0), true)]
    #[case::collinear(Quad::new([
        Point::new(0.0, 0.0),
        Point::new(5.0, 5.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ]), true)]
    #[case::square(Quad::from_size(10, 10), false)]
    #[case::trapezoid(Quad::new([
        Point::new(2.0, 0.0),
        Point::new(8.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ]), false)]
    fn test_is_degenerate(#[case] quad: Quad, #[case] expected: bool) {
        assert_eq!(quad.is_degenerate(), expected);
    }
}
