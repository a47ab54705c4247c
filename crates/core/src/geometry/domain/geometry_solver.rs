use thiserror::Error;

use super::quad::Quad;
use super::transform::Transform;

#[derive(Error, Debug, PartialEq)]
pub enum GeometryError {
    #[error("degenerate configuration: {0}")]
    DegenerateConfiguration(String),
}

/// Solves the projective transform carrying `source` onto `dest`,
/// corner by corner.
pub trait GeometrySolver {
    fn solve(&self, source: &Quad, dest: &Quad) -> Result<Transform, GeometryError>;
}
