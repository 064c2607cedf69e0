pub mod camera;
#[cfg(feature = "opencv")]
pub mod opencv_camera;
