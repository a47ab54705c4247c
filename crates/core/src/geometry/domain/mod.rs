pub mod geometry_solver;
pub mod quad;
pub mod transform;
