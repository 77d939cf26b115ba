use serde::{Deserialize, Serialize};

use crate::config::PostureConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostureState {
    Good,
    #[default]
    Bad,
}

impl PostureState {
    pub fn is_good(self) -> bool {
        self == Self::Good
    }
}

/// 1フレーム分の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierOutput {
    /// 生の角度による即時判定（ライブ表示用）
    pub instant_state: PostureState,
    /// ヒステリシスを通した安定判定（記録・集計用）
    pub stable_state: PostureState,
}

/// ベースラインからの偏差で姿勢を判定するヒステリシス付き状態機械
///
/// 平滑化偏差が閾値未満なら score +1、そうでなければ -1 し、±bound でクランプ。
/// score が +flip 以上で Good、-flip 以下で Bad、その間は前の状態を保持する。
pub struct PostureClassifier {
    threshold_deg: f64,
    bound: i32,
    flip_threshold: i32,
    score: i32,
    state: PostureState,
}

impl PostureClassifier {
    pub fn new(threshold_deg: f64, bound: i32, flip_threshold: i32) -> Result<Self, ConfigError> {
        if !threshold_deg.is_finite() || threshold_deg <= 0.0 {
            return Err(ConfigError::NonPositiveThreshold(threshold_deg));
        }
        if flip_threshold < 1 || flip_threshold > bound {
            return Err(ConfigError::InvalidHysteresis { bound, flip: flip_threshold });
        }
        Ok(Self {
            threshold_deg,
            bound,
            flip_threshold,
            score: 0,
            state: PostureState::Bad,
        })
    }

    pub fn from_config(config: &PostureConfig) -> Result<Self, ConfigError> {
        Self::new(config.threshold_deg, config.hysteresis_bound, config.flip_threshold)
    }

    /// 偏差が閾値未満か
    pub fn is_within(&self, angle: f64, baseline: f64) -> bool {
        (angle - baseline).abs() < self.threshold_deg
    }

    /// 生角度と平滑化角度を基準と比較して状態を更新する
    pub fn update(&mut self, raw_angle: f64, smoothed_angle: f64, baseline: f64) -> ClassifierOutput {
        let instant_good = self.is_within(raw_angle, baseline);
        let stable_good = self.is_within(smoothed_angle, baseline);

        let step = if stable_good { 1 } else { -1 };
        self.score = (self.score + step).clamp(-self.bound, self.bound);

        if self.score >= self.flip_threshold {
            self.state = PostureState::Good;
        } else if self.score <= -self.flip_threshold {
            self.state = PostureState::Bad;
        }

        ClassifierOutput {
            instant_state: if instant_good { PostureState::Good } else { PostureState::Bad },
            stable_state: self.state,
        }
    }

    pub fn state(&self) -> PostureState {
        self.state
    }

    pub(crate) fn score(&self) -> i32 {
        self.score
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.state = PostureState::Bad;
    }
}
