//! Four-point homography via the direct linear transform.
//!
//! Both quads are normalised (centroid at the origin, mean corner distance
//! sqrt(2)) before the 8x8 system is solved with LU decomposition, then the
//! result is denormalised and scaled so that h33 = 1.

use nalgebra::{Matrix3, SMatrix, SVector};

use crate::geometry::domain::geometry_solver::{GeometryError, GeometrySolver};
use crate::geometry::domain::quad::{Point, Quad};
use crate::geometry::domain::transform::Transform;

#[derive(Clone, Copy, Debug, Default)]
pub struct DltGeometrySolver;

impl DltGeometrySolver {
    pub fn new() -> Self {
        Self
    }
}

impl GeometrySolver for DltGeometrySolver {
    fn solve(&self, source: &Quad, dest: &Quad) -> Result<Transform, GeometryError> {
        if source.is_degenerate() {
            return Err(GeometryError::DegenerateConfiguration(
                "source corners are collinear".into(),
            ));
        }
        if dest.is_degenerate() {
            return Err(GeometryError::DegenerateConfiguration(
                "destination corners are collinear".into(),
            ));
        }

        let t_src = normalizing_transform(source);
        let t_dst = normalizing_transform(dest);
        let src = apply_all(&t_src, source);
        let dst = apply_all(&t_dst, dest);

        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();
        for i in 0..4 {
            let (x, y) = (src[i].x, src[i].y);
            let (u, v) = (dst[i].x, dst[i].y);
            let r = 2 * i;
            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -x * u;
            a[(r, 7)] = -y * u;
            b[r] = u;
            a[(r + 1, 3)] = x;
            a[(r + 1, 4)] = y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -x * v;
            a[(r + 1, 7)] = -y * v;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b).ok_or_else(|| {
            GeometryError::DegenerateConfiguration("correspondence system is singular".into())
        })?;
        let normalized = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);

        let t_dst_inv = t_dst.try_inverse().ok_or_else(|| {
            GeometryError::DegenerateConfiguration("destination normalisation failed".into())
        })?;
        let mut m = t_dst_inv * normalized * t_src;
        let h33 = m[(2, 2)];
        if h33.abs() < f64::EPSILON || m.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::DegenerateConfiguration(
                "solution is not finite".into(),
            ));
        }
        m /= h33;
        Ok(Transform::new(m))
    }
}

/// Similarity transform moving the centroid to the origin with mean
/// distance sqrt(2).
fn normalizing_transform(quad: &Quad) -> Matrix3<f64> {
    let n = quad.corners.len() as f64;
    let cx = quad.corners.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = quad.corners.iter().map(|p| p.y).sum::<f64>() / n;
    let mean_dist = quad
        .corners
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    let s = if mean_dist > 0.0 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn apply_all(t: &Matrix3<f64>, quad: &Quad) -> [Point; 4] {
    quad.corners.map(|p| {
        let x = t[(0, 0)] * p.x + t[(0, 1)] * p.y + t[(0, 2)];
        let y = t[(1, 0)] * p.x + t[(1, 1)] * p.y + t[(1, 2)];
        Point::new(x, y)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bounding_box::BoundingBox;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn assert_maps_corners(t: &Transform, source: &Quad, dest: &Quad) {
        for (s, d) in source.corners.iter().zip(dest.corners.iter()) {
            let mapped = t.apply(*s).unwrap();
            assert_relative_eq!(mapped.x, d.x, epsilon = 1e-6);
            assert_relative_eq!(mapped.y, d.y, epsilon = 1e-6);
        }
    }

    #[rstest]
    #[case::reference_face(BoundingBox::new(100, 100, 50, 50))]
    #[case::wide_face(BoundingBox::new(10, 300, 200, 90))]
    #[case::tall_face(BoundingBox::new(600, 40, 31, 170))]
    #[case::top_edge_face(BoundingBox::new(0, 0, 64, 64))]
    fn test_sticker_corners_round_trip(#[case] face: BoundingBox) {
        let source = Quad::from_size(face.width as u32, face.height as u32);
        let dest = Quad::above_face(&face);
        let t = DltGeometrySolver.solve(&source, &dest).unwrap();
        assert_maps_corners(&t, &source, &dest);
    }

    #[test]
    fn test_same_size_placement_is_pure_translation() {
        let face = BoundingBox::new(100, 100, 50, 50);
        let t = DltGeometrySolver
            .solve(&Quad::from_size(50, 50), &Quad::above_face(&face))
            .unwrap();
        let m = t.matrix();
        assert_relative_eq!(m[(0, 0)], 1.0, epsilon = 1e-9);
        assert_relative_eq!(m[(1, 1)], 1.0, epsilon = 1e-9);
        assert_relative_eq!(m[(0, 2)], 100.0, epsilon = 1e-9);
        assert_relative_eq!(m[(1, 2)], 50.0, epsilon = 1e-9);
        assert_relative_eq!(m[(2, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(m[(2, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perspective_quad_round_trip() {
        let source = Quad::from_size(100, 80);
        let dest = Quad::new([
            Point::new(12.0, 5.0),
            Point::new(140.0, 20.0),
            Point::new(120.0, 130.0),
            Point::new(30.0, 110.0),
        ]);
        let t = DltGeometrySolver.solve(&source, &dest).unwrap();
        assert_maps_corners(&t, &source, &dest);
        assert_relative_eq!(t.matrix()[(2, 2)], 1.0);
    }

    #[test]
    fn test_degenerate_source_rejected() {
        let result = DltGeometrySolver.solve(&Quad::from_size(0, 50), &Quad::from_size(50, 50));
        assert!(matches!(
            result,
            Err(GeometryError::DegenerateConfiguration(_))
        ));
    }

    #[test]
    fn test_collinear_destination_rejected() {
        let dest = Quad::new([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(0.0, 10.0),
        ]);
        let result = DltGeometrySolver.solve(&Quad::from_size(10, 10), &dest);
        assert!(matches!(
            result,
            Err(GeometryError::DegenerateConfiguration(_))
        ));
    }
}
