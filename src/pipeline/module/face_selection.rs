use thiserror::Error;
use crate::pipeline::module::face_detection::FaceRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no face detected")]
    NoFaceDetected,
    #[error("{0} faces detected, expected exactly one")]
    MultipleFacesDetected(usize),
}

/// Accept the detections only when they contain exactly one face.
///
/// There is no "best face" policy: several candidates are rejected outright,
/// whatever their size or position.
pub fn select_single_face(faces: &[FaceRect]) -> Result<FaceRect, SelectionError> {
    match faces {
        [] => Err(SelectionError::NoFaceDetected),
        [face] => Ok(*face),
        _ => Err(SelectionError::MultipleFacesDetected(faces.len())),
    }
}
