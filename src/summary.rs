//! Session-level aggregation of per-frame results.
//!
//! Folds the stable verdicts and measured angles of one recording into the summary
//! the recorder stores next to the video.

use serde::Serialize;

use crate::config::PostureConfig;
use crate::geometry::{head_forward_angle, is_back_straight_by_angle, tilt_from_vertical};
use crate::pose::LandmarkSet;
use crate::tracker::FrameResult;

/// 頭の前傾がこの角度で減点が最大
const HEAD_PENALTY_FULL_DEG: f64 = 40.0;
/// 胴体の傾きがこの角度で減点が最大
const TORSO_PENALTY_FULL_DEG: f64 = 30.0;
/// 頭角度の分散がこの値で減点が最大
const STABILITY_PENALTY_FULL_VAR: f64 = 100.0;

const HEAD_WEIGHT: f64 = 0.45;
const TORSO_WEIGHT: f64 = 0.35;
const STABILITY_WEIGHT: f64 = 0.20;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total_frames: u64,
    pub pose_coverage: f64,
    /// 安定判定が Good だったフレームの割合（判定済みフレーム中）
    pub good_ratio: Option<f64>,
    pub torso_lean_mean_deg: f64,
    pub head_forward_mean_deg: f64,
    pub head_stability_variance: f64,
    pub straight_back_ratio: Option<f64>,
    pub overall_score: u8,
}

#[derive(Debug, Default, Clone, Copy)]
struct Stats {
    count: u64,
    sum: f64,
    sum_sq: f64,
}

impl Stats {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// 母分散
    fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_sq / self.count as f64 - mean * mean).max(0.0)
    }
}

fn ratio(part: u64, whole: u64) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64)
}

pub struct SessionSummary {
    straight_range: [f64; 2],
    total_frames: u64,
    pose_frames: u64,
    classified_frames: u64,
    good_frames: u64,
    straight_checked: u64,
    straight_frames: u64,
    torso: Stats,
    head: Stats,
}

impl SessionSummary {
    pub fn new(straight_range: [f64; 2]) -> Self {
        Self {
            straight_range,
            total_frames: 0,
            pose_frames: 0,
            classified_frames: 0,
            good_frames: 0,
            straight_checked: 0,
            straight_frames: 0,
            torso: Stats::default(),
            head: Stats::default(),
        }
    }

    pub fn from_config(config: &PostureConfig) -> Self {
        Self::new(config.straight_range_deg)
    }

    /// `result` はこの `landmarks` から生成されたものであること
    ///
    /// 頭・背筋の指標は胴体角度が測れないフレームでも、ポーズが検出されていれば記録する。
    pub fn record(&mut self, landmarks: Option<&LandmarkSet>, result: &FrameResult) {
        self.total_frames += 1;

        if let Some(landmarks) = landmarks {
            if let Some(angle) = head_forward_angle(landmarks) {
                self.head.push(angle);
            }
            if let Some(straight) = is_back_straight_by_angle(landmarks, self.straight_range) {
                self.straight_checked += 1;
                if straight {
                    self.straight_frames += 1;
                }
            }
        }

        let Some(raw_angle) = result.raw_angle else {
            return;
        };
        self.pose_frames += 1;
        self.torso.push(tilt_from_vertical(raw_angle));

        if result.instant_state.is_some() {
            self.classified_frames += 1;
            if result.stable_state.is_good() {
                self.good_frames += 1;
            }
        }
    }

    pub fn report(&self) -> SummaryReport {
        let head_mean = self.head.mean();
        let head_var = self.head.variance();
        let torso_mean = self.torso.mean();

        let head_penalty = (head_mean / HEAD_PENALTY_FULL_DEG).min(1.0);
        let torso_penalty = (torso_mean / TORSO_PENALTY_FULL_DEG).min(1.0);
        let stability_penalty = (head_var / STABILITY_PENALTY_FULL_VAR).min(1.0);
        let penalty = HEAD_WEIGHT * head_penalty
            + TORSO_WEIGHT * torso_penalty
            + STABILITY_WEIGHT * stability_penalty;
        let overall_score = (100.0 * (1.0 - penalty)).trunc().clamp(0.0, 100.0) as u8;

        SummaryReport {
            total_frames: self.total_frames,
            pose_coverage: ratio(self.pose_frames, self.total_frames).unwrap_or(0.0),
            good_ratio: ratio(self.good_frames, self.classified_frames),
            torso_lean_mean_deg: torso_mean,
            head_forward_mean_deg: head_mean,
            head_stability_variance: head_var,
            straight_back_ratio: ratio(self.straight_frames, self.straight_checked),
            overall_score,
        }
    }
}
