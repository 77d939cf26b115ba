//! Per-frame posture pipeline.
//!
//! validate -> torso angle -> moving average -> baseline -> hysteresis classifier.
//! One instance per camera/recording session; it owns all temporal state and does no I/O.

use serde::{Deserialize, Serialize};

use super::baseline::Baseline;
use super::classifier::{PostureClassifier, PostureState};
use super::smooth::{AngleSample, MovingAverage};
use crate::config::PostureConfig;
use crate::error::ConfigError;
use crate::geometry::lean_angle;
use crate::pose::{is_pose_complete, LandmarkSet};

/// 描画側に渡す表示メッセージ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostureMessage {
    ShowFullBody,
    Calibrating,
    BackStraight,
    BackBent,
}

impl PostureMessage {
    pub fn text(self) -> &'static str {
        match self {
            Self::ShowFullBody => "Please have full body in picture",
            Self::Calibrating => "Hold still, calibrating",
            Self::BackStraight => "Back straight",
            Self::BackBent => "Back bent",
        }
    }
}

impl std::fmt::Display for PostureMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// 1フレーム分の出力。毎フレーム新しく作られ、コア側では保持しない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResult {
    pub frame_index: u64,
    pub valid_landmarks: bool,
    pub raw_angle: Option<f64>,
    pub smoothed_angle: Option<f64>,
    pub baseline: Option<f64>,
    pub instant_state: Option<PostureState>,
    pub stable_state: PostureState,
    pub message: PostureMessage,
}

pub struct PosturePipeline {
    visibility_threshold: f32,
    smoother: MovingAverage,
    baseline: Baseline,
    classifier: PostureClassifier,
    frame_index: u64,
}

impl PosturePipeline {
    pub fn new(config: &PostureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            visibility_threshold: config.visibility_threshold,
            smoother: MovingAverage::from_config(config)?,
            baseline: Baseline::new(),
            classifier: PostureClassifier::from_config(config)?,
            frame_index: 0,
        })
    }

    /// 検出器から届いたフレームごとに1回呼ぶ
    ///
    /// ランドマーク不足や退化した幾何のフレームは時系列状態に一切触れずにスキップする。
    pub fn process_frame(&mut self, landmarks: Option<&LandmarkSet>) -> FrameResult {
        let frame_index = self.frame_index;
        self.frame_index += 1;

        let landmarks = match landmarks {
            Some(set) if is_pose_complete(Some(set), self.visibility_threshold) => set,
            _ => {
                tracing::trace!(frame_index, "incomplete pose, skipping");
                return self.incomplete(frame_index);
            }
        };

        // 片側しか映っていなければその側の肩-腰で測る
        let Some(raw_angle) = lean_angle(landmarks) else {
            tracing::trace!(frame_index, "undetermined torso angle, skipping");
            return self.incomplete(frame_index);
        };

        let smoothed_angle = self
            .smoother
            .push_and_average(AngleSample::new(raw_angle, frame_index));

        let was_calibrated = self.baseline.is_set();
        let Some(baseline) =
            self.baseline
                .maybe_calibrate(self.smoother.len(), self.smoother.window(), smoothed_angle)
        else {
            tracing::trace!(frame_index, raw_angle, smoothed_angle, "calibrating");
            return FrameResult {
                frame_index,
                valid_landmarks: true,
                raw_angle: Some(raw_angle),
                smoothed_angle: Some(smoothed_angle),
                baseline: None,
                instant_state: None,
                stable_state: self.classifier.state(),
                message: PostureMessage::Calibrating,
            };
        };
        if !was_calibrated {
            tracing::debug!(frame_index, baseline, "baseline captured");
        }

        let previous = self.classifier.state();
        let output = self.classifier.update(raw_angle, smoothed_angle, baseline);
        if output.stable_state != previous {
            tracing::debug!(frame_index, from = ?previous, to = ?output.stable_state, "posture state changed");
        }
        tracing::trace!(
            frame_index,
            raw_angle,
            smoothed_angle,
            score = self.classifier.score(),
            ?output,
            "frame classified"
        );

        FrameResult {
            frame_index,
            valid_landmarks: true,
            raw_angle: Some(raw_angle),
            smoothed_angle: Some(smoothed_angle),
            baseline: Some(baseline),
            instant_state: Some(output.instant_state),
            stable_state: output.stable_state,
            message: if output.instant_state.is_good() {
                PostureMessage::BackStraight
            } else {
                PostureMessage::BackBent
            },
        }
    }

    /// 時系列状態に触れない「全身を映して」結果
    fn incomplete(&self, frame_index: u64) -> FrameResult {
        FrameResult {
            frame_index,
            valid_landmarks: false,
            raw_angle: None,
            smoothed_angle: None,
            baseline: self.baseline.get(),
            instant_state: None,
            stable_state: self.classifier.state(),
            message: PostureMessage::ShowFullBody,
        }
    }

    pub fn baseline(&self) -> Option<f64> {
        self.baseline.get()
    }

    pub fn state(&self) -> PostureState {
        self.classifier.state()
    }

    pub fn buffered_samples(&self) -> usize {
        self.smoother.len()
    }

    /// 新しいセッション開始時（カメラ再起動など）に呼ぶ
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.baseline.reset();
        self.classifier.reset();
        self.frame_index = 0;
        tracing::debug!("posture session reset");
    }
}
