//! エラー型

use thiserror::Error;

/// 構築時に検出される設定ミス
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("smoothing window must be at least 1")]
    ZeroWindow,

    #[error("deviation threshold must be positive and finite, got {0}")]
    NonPositiveThreshold(f64),

    #[error("flip threshold {flip} must be within 1..={bound}")]
    InvalidHysteresis { bound: i32, flip: i32 },

    #[error("visibility threshold must be within [0, 1], got {0}")]
    InvalidVisibility(f32),

    #[error("straight range is empty or not finite: [{min}, {max}]")]
    InvalidStraightRange { min: f64, max: f64 },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
