use anyhow::{Error, Result};
use image::RgbImage;
use opencv::core::{Mat, MatTraitConst};
use opencv::imgproc::{cvt_color, COLOR_BGR2RGB, COLOR_BGRA2RGB, COLOR_GRAY2RGB, COLOR_RGB2GRAY};

/// Copy an OpenCV frame (BGR, BGRA or single channel) into an RGB buffer.
pub fn opencv_to_image(img: &Mat) -> Result<RgbImage, Error> {
    if img.empty() {
        return Err(Error::msg("empty frame"));
    }

    let code = match img.channels() {
        1 => COLOR_GRAY2RGB,
        3 => COLOR_BGR2RGB,
        4 => COLOR_BGRA2RGB,
        n => return Err(Error::msg(format!("unsupported channel count: {}", n))),
    };

    let mut rgb_img = Mat::default();
    cvt_color(img, &mut rgb_img, code, 0)?;

    let (width, height) = (rgb_img.cols() as u32, rgb_img.rows() as u32);
    let data = rgb_img.data_bytes()?.to_vec();

    RgbImage::from_raw(width, height, data)
        .ok_or_else(|| Error::msg("frame buffer does not match its dimensions"))
}

/// Single channel luma `Mat` of an RGB frame, with OpenCV's BT.601 weights.
pub fn image_to_gray_opencv(img: &RgbImage) -> Result<Mat, Error> {
    let flat = Mat::from_slice(img.as_raw())?;
    let rgb_img = flat.reshape(3, img.height() as i32)?.try_clone()?;

    let mut gray_img = Mat::default();
    cvt_color(&rgb_img, &mut gray_img, COLOR_RGB2GRAY, 0)?;
    Ok(gray_img)
}
