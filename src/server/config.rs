use std::str::FromStr;
use anyhow::{Error, Result};
use crate::pipeline::passport_pipeline::config::{DetectionConfig, EncodeConfig, NormalizeConfig, PassportConfig};

/// Fits a base64 encoded photo from any current phone camera.
pub const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub enabled: bool,
    pub index: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cascade_model_path: String,
    pub camera: CameraConfig,
    pub stream_fps: u32,
    /// Largest accepted request body, in bytes.
    pub upload_limit_bytes: usize,
    pub passport: PassportConfig,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup, falling back to defaults
    /// for absent keys. Present but unparsable values are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_str = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let jpeg_quality: u8 = parse_or(&lookup, "JPEG_QUALITY", 95)?;
        if !(1..=100).contains(&jpeg_quality) {
            return Err(Error::msg(format!("JPEG_QUALITY must be within 1..=100, got {}", jpeg_quality)));
        }

        let scale_factor: f64 = parse_or(&lookup, "DETECT_SCALE_FACTOR", 1.1)?;
        if scale_factor <= 1.0 {
            return Err(Error::msg(format!("DETECT_SCALE_FACTOR must be > 1.0, got {}", scale_factor)));
        }

        let min_face_size: i32 = parse_or(&lookup, "DETECT_MIN_SIZE", 40)?;

        let stream_fps: u32 = parse_or(&lookup, "STREAM_FPS", 15)?;
        if stream_fps == 0 {
            return Err(Error::msg("STREAM_FPS must be > 0"));
        }

        let upload_limit_bytes: usize = parse_or(&lookup, "UPLOAD_LIMIT_BYTES", DEFAULT_UPLOAD_LIMIT_BYTES)?;
        if upload_limit_bytes == 0 {
            return Err(Error::msg("UPLOAD_LIMIT_BYTES must be > 0"));
        }

        Ok(AppConfig {
            host: get_str("PASSPORT_HOST", "127.0.0.1"),
            port: parse_or(&lookup, "PASSPORT_PORT", 5000)?,
            cascade_model_path: get_str("CASCADE_MODEL_PATH", "haarcascade_frontalface_default.xml"),
            camera: CameraConfig {
                enabled: parse_bool_or(&lookup, "CAMERA_ENABLED", true)?,
                index: parse_or(&lookup, "CAMERA_INDEX", 0)?,
                width: parse_or(&lookup, "CAMERA_WIDTH", 640)?,
                height: parse_or(&lookup, "CAMERA_HEIGHT", 480)?,
            },
            stream_fps,
            upload_limit_bytes,
            passport: PassportConfig {
                detection: DetectionConfig {
                    scale_factor,
                    min_neighbors: parse_or(&lookup, "DETECT_MIN_NEIGHBORS", 5)?,
                    min_face_size: (min_face_size, min_face_size),
                },
                normalize: NormalizeConfig::new(),
                encode: EncodeConfig { jpeg_quality },
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::msg(format!("invalid value {:?} for {}: {}", raw, key, e))),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> Result<bool, Error>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None => Ok(default),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("no") => Ok(false),
        Some(other) => Err(Error::msg(format!("invalid boolean {:?} for {}", other, key))),
    }
}
