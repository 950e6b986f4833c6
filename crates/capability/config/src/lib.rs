//! 转换运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// MCAP 分块压缩方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionSetting {
    None,
    #[default]
    Zstd,
    Lz4,
}

impl CompressionSetting {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "" => Some(Self::None),
            "zstd" => Some(Self::Zstd),
            "lz4" => Some(Self::Lz4),
            _ => None,
        }
    }
}

/// 转换运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub progress: bool,
    pub progress_interval: u64,
    pub compression: CompressionSetting,
    pub chunk_size: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            progress: false,
            progress_interval: 1000,
            compression: CompressionSetting::Zstd,
            chunk_size: None,
        }
    }
}

impl AppConfig {
    /// 从环境变量读取配置（均有默认值）。
    pub fn from_env() -> Result<Self, ConfigError> {
        let progress = read_bool_with_default("V2M_PROGRESS", false);
        let progress_interval = read_u64_with_default("V2M_PROGRESS_INTERVAL", 1000)?;
        if progress_interval == 0 {
            return Err(ConfigError::Invalid(
                "V2M_PROGRESS_INTERVAL".to_string(),
                "0".to_string(),
            ));
        }
        let compression = match env::var("V2M_COMPRESSION") {
            Ok(value) => CompressionSetting::parse(&value)
                .ok_or_else(|| ConfigError::Invalid("V2M_COMPRESSION".to_string(), value))?,
            Err(_) => CompressionSetting::default(),
        };
        let chunk_size = read_optional_u64("V2M_CHUNK_SIZE")?.filter(|value| *value > 0);

        Ok(Self {
            progress,
            progress_interval,
            compression,
            chunk_size,
        })
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        Err(_) => Ok(None),
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
