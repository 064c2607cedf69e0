use std::sync::{Mutex, PoisonError};
use anyhow::{Error, Result};
use image::RgbImage;
use opencv::core::{Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::{CascadeClassifierTrait, CascadeClassifierTraitConst};
use tracing::debug;
use crate::pipeline::module::face_detection::{FaceDetector, FaceRect};
use crate::pipeline::passport_pipeline::config::DetectionConfig;
use crate::utils::mat::image_to_gray_opencv;

/// Haar cascade frontal-face detector.
pub struct CascadeFaceDetection {
    // detect_multi_scale needs &mut, the detector is shared across requests
    classifier: Mutex<CascadeClassifier>,
    scale_factor: f64,
    min_neighbors: i32,
    min_face_size: Size,
}

impl CascadeFaceDetection {
    pub fn new(model_path: &str, config: &DetectionConfig) -> Result<Self, Error> {
        let classifier = CascadeClassifier::new(model_path)
            .map_err(|e| Error::msg(format!("failed to load cascade {}: {}", model_path, e)))?;

        if classifier.empty()? {
            return Err(Error::msg(format!("cascade {} is empty", model_path)));
        }

        Ok(CascadeFaceDetection {
            classifier: Mutex::new(classifier),
            scale_factor: config.scale_factor,
            min_neighbors: config.min_neighbors,
            min_face_size: Size::new(config.min_face_size.0, config.min_face_size.1),
        })
    }
}

impl FaceDetector for CascadeFaceDetection {
    fn detect(&self, frame: &RgbImage) -> Result<Vec<FaceRect>, Error> {
        let gray_img = image_to_gray_opencv(frame)?;

        let mut faces_detected: Vector<Rect> = Vector::new();
        {
            // the classifier carries no per-call state, a panicked caller leaves it usable
            let mut classifier = self.classifier.lock().unwrap_or_else(PoisonError::into_inner);
            classifier.detect_multi_scale(
                &gray_img,
                &mut faces_detected,
                self.scale_factor,
                self.min_neighbors,
                0,
                self.min_face_size,
                Size::new(0, 0),
            )?;
        }

        debug!(count = faces_detected.len(), "cascade detections");

        Ok(faces_detected
            .iter()
            .map(|r| FaceRect::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}
