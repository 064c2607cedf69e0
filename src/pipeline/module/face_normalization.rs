use image::imageops::{self, FilterType};
use image::RgbImage;
use thiserror::Error;
use tracing::debug;
use crate::pipeline::module::face_detection::FaceRect;
use crate::pipeline::module::face_selection::{select_single_face, SelectionError};
use crate::pipeline::passport_pipeline::config::NormalizeConfig;
use crate::processing::crop::CropRect;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("crop window {0:?} covers no pixels")]
    EmptyCrop(CropRect),
}

/// A face cut out of its frame and stretched to the canonical output size.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub image: RgbImage,
    pub face: FaceRect,
    pub crop: CropRect,
}

/// Turn the single detected face of `frame` into a fixed-size passport crop.
///
/// Zero or several faces are rejected. The padded crop is resized without
/// preserving its aspect ratio, using bilinear interpolation.
pub fn normalize(frame: &RgbImage, faces: &[FaceRect], config: &NormalizeConfig) -> Result<Normalized, NormalizeError> {
    let face = select_single_face(faces)?;

    let crop = CropRect::padded(&face, frame.width(), frame.height(), config.padding_ratio);
    if crop.is_empty() {
        return Err(NormalizeError::EmptyCrop(crop));
    }

    debug!(?face, ?crop, "cropping face region");

    let face_region = imageops::crop_imm(
        frame,
        crop.x_start as u32,
        crop.y_start as u32,
        crop.width(),
        crop.height(),
    )
    .to_image();

    let (out_w, out_h) = config.output_size;
    let image = imageops::resize(&face_region, out_w, out_h, FilterType::Triangle);

    Ok(Normalized { image, face, crop })
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use crate::pipeline::module::face_detection::FaceRect;
    use crate::pipeline::module::face_normalization::{normalize, NormalizeError};
    use crate::pipeline::module::face_selection::SelectionError;
    use crate::pipeline::passport_pipeline::config::NormalizeConfig;
    use crate::processing::crop::CropRect;

    fn make_frame(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
        })
    }

    #[test]
    fn test_no_face() {
        let frame = make_frame(640, 480);
        let err = normalize(&frame, &[], &NormalizeConfig::new()).unwrap_err();
        assert_eq!(err, NormalizeError::Selection(SelectionError::NoFaceDetected));
    }

    #[test]
    fn test_multiple_faces() {
        let frame = make_frame(640, 480);
        let faces = [FaceRect::new(10, 10, 20, 20), FaceRect::new(300, 300, 20, 20)];
        let err = normalize(&frame, &faces, &NormalizeConfig::new()).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::Selection(SelectionError::MultipleFacesDetected(2))
        );
    }

    #[test]
    fn test_single_face() {
        let frame = make_frame(640, 480);
        let face = FaceRect::new(100, 100, 50, 60);
        let out = normalize(&frame, &[face], &NormalizeConfig::new()).unwrap();

        assert_eq!(out.face, face);
        assert_eq!(
            out.crop,
            CropRect {
                x_start: 70,
                y_start: 70,
                x_end: 180,
                y_end: 190
            }
        );
        assert_eq!(out.image.dimensions(), (200, 200));
    }

    #[test]
    fn test_output_size_is_fixed() {
        let frame = make_frame(640, 480);
        let faces = [
            FaceRect::new(0, 0, 1, 1),
            FaceRect::new(600, 440, 40, 40),
            FaceRect::new(0, 0, 640, 480),
            FaceRect::new(320, 10, 300, 30),
        ];
        for face in faces {
            let out = normalize(&frame, &[face], &NormalizeConfig::new()).unwrap();
            assert_eq!(out.image.dimensions(), (200, 200), "{:?}", face);
        }
    }

    #[test]
    fn test_crop_content() {
        // uniform patch over the crop window: the stretched output keeps its color
        let mut frame = RgbImage::from_pixel(640, 480, Rgb([0, 0, 0]));
        for y in 70..190 {
            for x in 70..180 {
                frame.put_pixel(x, y, Rgb([200, 40, 10]));
            }
        }
        let out = normalize(&frame, &[FaceRect::new(100, 100, 50, 60)], &NormalizeConfig::new()).unwrap();
        for (x, y) in [(0, 0), (100, 100), (199, 199)] {
            let Rgb([r, g, b]) = *out.image.get_pixel(x, y);
            assert!(r.abs_diff(200) <= 1 && g.abs_diff(40) <= 1 && b.abs_diff(10) <= 1);
        }
    }

    #[test]
    fn test_zero_height_face() {
        let frame = make_frame(640, 480);
        let err = normalize(&frame, &[FaceRect::new(10, 10, 20, 0)], &NormalizeConfig::new()).unwrap_err();
        assert!(matches!(err, NormalizeError::EmptyCrop(_)));
    }

    #[test]
    fn test_custom_output_size() {
        let frame = make_frame(64, 64);
        let config = NormalizeConfig {
            output_size: (30, 40),
            padding_ratio: 0.0,
        };
        let out = normalize(&frame, &[FaceRect::new(8, 8, 16, 16)], &config).unwrap();
        assert_eq!(out.crop.width(), 16);
        assert_eq!(out.image.dimensions(), (30, 40));
    }
}
