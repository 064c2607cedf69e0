use crate::pipeline::module::face_detection::FaceRect;

/// Half-open crop window `[x_start, x_end) x [y_start, y_end)` in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x_start: i32,
    pub y_start: i32,
    pub x_end: i32,
    pub y_end: i32,
}

impl CropRect {
    /// Grow `face` by `floor(padding_ratio * face.height)` on every side and
    /// clamp the result to a `frame_width` x `frame_height` frame.
    ///
    /// Padding only depends on the detected height, never on the width.
    pub fn padded(face: &FaceRect, frame_width: u32, frame_height: u32, padding_ratio: f32) -> Self {
        let padding = (padding_ratio as f64 * face.height as f64).floor() as i32;
        let frame_width = i32::try_from(frame_width).unwrap_or(i32::MAX);
        let frame_height = i32::try_from(frame_height).unwrap_or(i32::MAX);

        CropRect {
            x_start: face.x.saturating_sub(padding).max(0),
            y_start: face.y.saturating_sub(padding).max(0),
            x_end: face
                .x
                .saturating_add(face.width)
                .saturating_add(padding)
                .min(frame_width),
            y_end: face
                .y
                .saturating_add(face.height)
                .saturating_add(padding)
                .min(frame_height),
        }
    }

    pub fn width(&self) -> u32 {
        (self.x_end - self.x_start).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y_end - self.y_start).max(0) as u32
    }

    /// True when the window covers no pixel, e.g. a zero-height detection
    /// or a rectangle lying entirely outside the frame.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
