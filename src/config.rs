use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub posture: PostureConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PostureConfig {
    /// 移動平均の窓サイズ（フレーム数）
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// ベースラインからの許容偏差（度）
    #[serde(default = "default_threshold_deg")]
    pub threshold_deg: f64,
    /// ヒステリシススコアの上下限 (±)
    #[serde(default = "default_hysteresis_bound")]
    pub hysteresis_bound: i32,
    /// 状態反転に必要なスコアの大きさ
    #[serde(default = "default_flip_threshold")]
    pub flip_threshold: i32,
    /// ランドマーク可視性の閾値（これを超える必要がある）
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f32,
    /// 肩-腰-膝角度による「背筋が伸びている」範囲（度）
    #[serde(default = "default_straight_range_deg")]
    pub straight_range_deg: [f64; 2],
}

fn default_window_size() -> usize { 3 }
fn default_threshold_deg() -> f64 { 6.0 }
fn default_hysteresis_bound() -> i32 { 3 }
fn default_flip_threshold() -> i32 { 1 }
fn default_visibility_threshold() -> f32 { 0.25 }
fn default_straight_range_deg() -> [f64; 2] { [160.0, 185.0] }

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            threshold_deg: default_threshold_deg(),
            hysteresis_bound: default_hysteresis_bound(),
            flip_threshold: default_flip_threshold(),
            visibility_threshold: default_visibility_threshold(),
            straight_range_deg: default_straight_range_deg(),
        }
    }
}

impl PostureConfig {
    /// 値の整合性チェック。パイプライン構築時に呼ばれる
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if !self.threshold_deg.is_finite() || self.threshold_deg <= 0.0 {
            return Err(ConfigError::NonPositiveThreshold(self.threshold_deg));
        }
        if self.flip_threshold < 1 || self.flip_threshold > self.hysteresis_bound {
            return Err(ConfigError::InvalidHysteresis {
                bound: self.hysteresis_bound,
                flip: self.flip_threshold,
            });
        }
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(ConfigError::InvalidVisibility(self.visibility_threshold));
        }
        let [min, max] = self.straight_range_deg;
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigError::InvalidStraightRange { min, max });
        }
        Ok(())
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// ファイルが無い・壊れている場合はデフォルト値
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("{} not found, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("failed to load {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
