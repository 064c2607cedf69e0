use std::sync::Arc;
use image::RgbImage;
use thiserror::Error;
use tracing::{debug, info};
use crate::pipeline::module::face_detection::{FaceDetector, FaceRect};
use crate::pipeline::module::face_normalization::{normalize, NormalizeError};
use crate::pipeline::module::face_selection::SelectionError;
use crate::pipeline::passport_pipeline::config::PassportConfig;
use crate::processing::crop::CropRect;
use crate::utils::utils::{base64_to_byte_data, byte_data_to_image, image_to_jpeg};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to decode input image: {0}")]
    DecodeFailure(anyhow::Error),
    #[error("no face detected")]
    NoFaceDetected,
    #[error("{0} faces detected")]
    MultipleFacesDetected(usize),
    #[error("face detection failed: {0}")]
    Detection(anyhow::Error),
    #[error("crop window {0:?} covers no pixels")]
    EmptyCrop(CropRect),
    #[error("failed to encode passport photo: {0}")]
    Encode(anyhow::Error),
}

impl From<NormalizeError> for PipelineError {
    fn from(e: NormalizeError) -> Self {
        match e {
            NormalizeError::Selection(SelectionError::NoFaceDetected) => PipelineError::NoFaceDetected,
            NormalizeError::Selection(SelectionError::MultipleFacesDetected(n)) => {
                PipelineError::MultipleFacesDetected(n)
            }
            NormalizeError::EmptyCrop(crop) => PipelineError::EmptyCrop(crop),
        }
    }
}

/// Normalized passport photo together with the geometry that produced it.
#[derive(Debug, Clone)]
pub struct PassportPhoto {
    pub image: RgbImage,
    pub jpeg: Vec<u8>,
    pub face: FaceRect,
    pub crop: CropRect,
}

pub struct PassportPipeline {
    detector: Arc<dyn FaceDetector>,
    config: PassportConfig,
}

impl PassportPipeline {
    pub fn new(detector: Arc<dyn FaceDetector>, config: PassportConfig) -> Self {
        PassportPipeline { detector, config }
    }

    pub fn config(&self) -> &PassportConfig {
        &self.config
    }

    /// Detect, crop and encode the single face of `frame`.
    pub fn process(&self, frame: &RgbImage) -> Result<PassportPhoto, PipelineError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(PipelineError::DecodeFailure(anyhow::Error::msg(
                "frame has zero width or height",
            )));
        }

        let faces = self
            .detector
            .detect(frame)
            .map_err(PipelineError::Detection)?;
        debug!(
            width = frame.width(),
            height = frame.height(),
            faces = faces.len(),
            "face detection done"
        );

        let normalized = normalize(frame, &faces, &self.config.normalize)?;

        let jpeg = image_to_jpeg(&normalized.image, self.config.encode.jpeg_quality)
            .map_err(PipelineError::Encode)?;

        info!(
            face = ?normalized.face,
            crop = ?normalized.crop,
            bytes = jpeg.len(),
            "passport photo created"
        );

        Ok(PassportPhoto {
            image: normalized.image,
            jpeg,
            face: normalized.face,
            crop: normalized.crop,
        })
    }

    pub fn process_bytes(&self, im_bytes: &[u8]) -> Result<PassportPhoto, PipelineError> {
        let frame = byte_data_to_image(im_bytes).map_err(PipelineError::DecodeFailure)?;
        self.process(&frame)
    }

    pub fn process_base64(&self, encoded: &str) -> Result<PassportPhoto, PipelineError> {
        let im_bytes = base64_to_byte_data(encoded).map_err(PipelineError::DecodeFailure)?;
        self.process_bytes(&im_bytes)
    }
}
