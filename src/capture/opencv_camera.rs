use anyhow::{Error, Result};
use image::RgbImage;
use opencv::core::Mat;
use opencv::prelude::{VideoCaptureTrait, VideoCaptureTraitConst};
use opencv::videoio::{VideoCapture, CAP_ANY, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH};
use tracing::{info, warn};
use crate::capture::camera::FrameSource;
use crate::utils::mat::opencv_to_image;

/// Locally attached camera read through OpenCV's `VideoCapture`.
pub struct OpenCvCamera {
    capture: VideoCapture,
    index: i32,
}

impl OpenCvCamera {
    pub fn open(index: i32, width: u32, height: u32) -> Result<Self, Error> {
        let mut capture = VideoCapture::new(index, CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(Error::msg(format!("camera {} could not be opened", index)));
        }

        // drivers may refuse the requested resolution; keep their default then
        if !capture.set(CAP_PROP_FRAME_WIDTH, width as f64)?
            || !capture.set(CAP_PROP_FRAME_HEIGHT, height as f64)?
        {
            warn!(index, width, height, "camera rejected requested resolution");
        }

        info!(
            index,
            width = capture.get(CAP_PROP_FRAME_WIDTH)?,
            height = capture.get(CAP_PROP_FRAME_HEIGHT)?,
            "camera opened"
        );

        Ok(OpenCvCamera { capture, index })
    }
}

impl FrameSource for OpenCvCamera {
    fn read_frame(&mut self) -> Result<RgbImage, Error> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? {
            return Err(Error::msg(format!("camera {} returned no frame", self.index)));
        }
        opencv_to_image(&frame)
    }
}
