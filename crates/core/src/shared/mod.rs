pub mod bounding_box;
pub mod constants;
pub mod frame;
#[cfg(feature = "opencv")]
pub mod mat_conversion;
