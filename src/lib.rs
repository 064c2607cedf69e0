pub mod capture;
pub mod pipeline;
pub mod processing;
pub mod server;
pub mod utils;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use image::{Rgb, RgbImage};
    use crate::capture::camera::{FrameSource, SharedCamera};
    use crate::pipeline::module::face_detection::{FaceRect, FixedFaceDetector};
    use crate::pipeline::passport_pipeline::config::PassportConfig;
    use crate::pipeline::passport_pipeline::pipeline::PassportPipeline;
    use crate::utils::utils::{base64_to_byte_data, byte_data_to_base64, byte_data_to_image};

    struct StillCamera;

    impl FrameSource for StillCamera {
        fn read_frame(&mut self) -> anyhow::Result<RgbImage> {
            Ok(RgbImage::from_pixel(640, 480, Rgb([90, 120, 150])))
        }
    }

    #[tokio::test]
    async fn test_pipeline() {
        let camera = SharedCamera::new(Box::new(StillCamera));
        let pipeline = PassportPipeline::new(
            Arc::new(FixedFaceDetector::new(vec![FaceRect::new(100, 100, 50, 60)])),
            PassportConfig::default(),
        );

        let frame = camera.capture().unwrap();
        let photo = pipeline.process(&frame).unwrap();

        let transported = byte_data_to_base64(&photo.jpeg);
        let decoded = byte_data_to_image(&base64_to_byte_data(&transported).unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (200, 200));
    }
}
