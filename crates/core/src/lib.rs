pub mod capture;
pub mod detection;
pub mod diagnostics;
pub mod display;
pub mod geometry;
pub mod overlay;
pub mod pipeline;
pub mod shared;
