pub const CASCADE_MODEL_NAME: &str = "haarcascade_frontalface_default.xml";
pub const CASCADE_MODEL_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/master/data/haarcascades/haarcascade_frontalface_default.xml";

/// Data directories where OpenCV packages commonly install their cascades.
pub const OPENCV_HAARCASCADE_DIRS: &[&str] = &[
    "/usr/share/opencv4/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/opt/homebrew/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
    "/usr/local/share/opencv/haarcascades",
    "C:\\opencv\\build\\etc\\haarcascades",
];

pub const DEFAULT_STICKER_PATH: &str = "AR_photo.png";
pub const DEFAULT_CAMERA_INDEX: i32 = 0;

pub const WINDOW_TITLE: &str = "AR Face Overlay";
pub const STOP_KEY: char = 'q';

pub const MIN_RAM_GB: u64 = 2;
pub const MIN_LOGICAL_CORES: usize = 2;
