use anyhow::{Error, Result};
use image::RgbImage;

/// Axis-aligned face box as reported by a detector: top-left corner plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        FaceRect {
            x,
            y,
            width,
            height,
        }
    }
}

/// Frontal-face detection capability.
///
/// The pipeline only ever sees rectangles, so any backend (the OpenCV Haar
/// cascade, a remote model, a canned list in tests) can be plugged in.
pub trait FaceDetector: Send + Sync {
    /// Find every face in `frame`. An empty vector means no face was found.
    fn detect(&self, frame: &RgbImage) -> Result<Vec<FaceRect>, Error>;
}

/// Detector that reports the same rectangles for every frame.
#[derive(Debug, Clone, Default)]
pub struct FixedFaceDetector {
    faces: Vec<FaceRect>,
}

impl FixedFaceDetector {
    pub fn new(faces: Vec<FaceRect>) -> Self {
        FixedFaceDetector { faces }
    }
}

impl FaceDetector for FixedFaceDetector {
    fn detect(&self, _frame: &RgbImage) -> Result<Vec<FaceRect>, Error> {
        Ok(self.faces.clone())
    }
}
