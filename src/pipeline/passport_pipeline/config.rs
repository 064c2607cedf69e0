#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    pub min_face_size: (i32, i32),
}

impl DetectionConfig {
    pub fn new() -> Self {
        DetectionConfig {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_face_size: (40, 40),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeConfig {
    pub output_size: (u32, u32),
    /// Margin added on each side, as a fraction of the detected face height.
    pub padding_ratio: f32,
}

impl NormalizeConfig {
    pub fn new() -> Self {
        NormalizeConfig {
            output_size: (200, 200),
            padding_ratio: 0.5,
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodeConfig {
    pub jpeg_quality: u8,
}

impl EncodeConfig {
    pub fn new() -> Self {
        EncodeConfig { jpeg_quality: 95 }
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassportConfig {
    pub detection: DetectionConfig,
    pub normalize: NormalizeConfig,
    pub encode: EncodeConfig,
}
