use nalgebra::{Matrix3, Vector3};

use super::quad::Point;

/// Planar projective transform (homography) as a 3x3 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    matrix: Matrix3<f64>,
}

impl Transform {
    pub fn new(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Maps a point, or `None` if it lands on the line at infinity.
    pub fn apply(&self, p: Point) -> Option<Point> {
        let v = self.matrix * Vector3::new(p.x, p.y, 1.0);
        if v.z.abs() < f64::EPSILON {
            return None;
        }
        Some(Point::new(v.x / v.z, v.y / v.z))
    }

    pub fn inverse(&self) -> Option<Transform> {
        self.matrix.try_inverse().map(Transform::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_translation_and_inverse() {
        let t = Transform::new(Matrix3::new(1.0, 0.0, 10.0, 0.0, 1.0, -5.0, 0.0, 0.0, 1.0));
        let p = t.apply(Point::new(1.0, 1.0)).unwrap();
        assert_relative_eq!(p.x, 11.0);
        assert_relative_eq!(p.y, -4.0);

        let back = t.inverse().unwrap().apply(p).unwrap();
        assert_relative_eq!(back.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(back.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_point_at_infinity_is_none() {
        let t = Transform::new(Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0));
        assert!(t.apply(Point::new(0.0, 4.0)).is_none());
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Transform::new(Matrix3::zeros()).inverse().is_none());
    }
}
