pub mod face_detection;
pub mod face_normalization;
pub mod face_selection;
#[cfg(feature = "opencv")]
pub mod cascade_detection;
