pub mod mirroring_frame_source;
#[cfg(feature = "opencv")]
pub mod opencv_camera;
