use anyhow::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

pub fn base64_to_byte_data(encoded: &str) -> Result<Vec<u8>, Error> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::msg(format!("invalid base64 payload: {}", e)))
}

pub fn byte_data_to_base64(im_bytes: &[u8]) -> String {
    STANDARD.encode(im_bytes)
}

/// Decode an encoded image (JPEG, PNG) into an 8-bit, 3-channel frame.
///
/// Alpha is dropped and grayscale is expanded to three identical channels.
pub fn byte_data_to_image(im_bytes: &[u8]) -> Result<RgbImage, Error> {
    let decoded = image::load_from_memory(im_bytes)?;
    let rgb_img = decoded.to_rgb8();

    if rgb_img.width() == 0 || rgb_img.height() == 0 {
        return Err(Error::msg("decoded image has zero width or height"));
    }

    Ok(rgb_img)
}

pub fn image_to_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buffer)
}

#[cfg(test)]
pub(crate) fn make_test_png(width: u32, height: u32) -> Vec<u8> {
    use image::codecs::png::PngEncoder;

    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}
