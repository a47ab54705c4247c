/// An axis-aligned face box in frame pixel coordinates.
///
/// Boxes are produced fresh by the detector on every frame and carry no
/// identity across frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Same-size box directly above this one, sharing its top edge.
    pub fn above(&self) -> BoundingBox {
        BoundingBox {
            y: self.y - self.height,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_edges() {
        let b = BoundingBox::new(100, 100, 50, 40);
        assert_eq!(b.right(), 150);
        assert_eq!(b.bottom(), 140);
        assert_eq!(b.area(), 2000);
    }

    #[test]
    fn test_above_shifts_by_own_height() {
        let b = BoundingBox::new(100, 100, 50, 50);
        assert_eq!(b.above(), BoundingBox::new(100, 50, 50, 50));
    }

    #[test]
    fn test_above_can_leave_frame() {
        let b = BoundingBox::new(10, 20, 30, 60);
        assert_eq!(b.above().y, -40);
    }

    #[rstest]
    #[case::zero_width(BoundingBox::new(0, 0, 0, 10), true)]
    #[case::zero_height(BoundingBox::new(0, 0, 10, 0), true)]
    #[case::negative(BoundingBox::new(0, 0, -5, 10), true)]
    #[case::regular(BoundingBox::new(0, 0, 1, 1), false)]
    fn test_is_empty(#[case] b: BoundingBox, #[case] expected: bool) {
        assert_eq!(b.is_empty(), expected);
        if expected {
            assert_eq!(b.area(), 0);
        }
    }
}
