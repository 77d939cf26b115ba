use std::collections::VecDeque;

use crate::config::PostureConfig;
use crate::error::ConfigError;

/// 1フレーム分の胴体角度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSample {
    pub degrees: f64,
    pub frame_index: u64,
}

impl AngleSample {
    pub fn new(degrees: f64, frame_index: u64) -> Self {
        Self { degrees, frame_index }
    }
}

/// 固定窓の移動平均フィルタ
///
/// 窓を超えたら最古のサンプルを捨てる (FIFO)。
/// 窓は壁時計ではなく実際に届いたフレーム数で数える。
pub struct MovingAverage {
    window: usize,
    samples: VecDeque<AngleSample>,
}

impl MovingAverage {
    pub fn new(window: usize) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(Self {
            window,
            samples: VecDeque::with_capacity(window + 1),
        })
    }

    pub fn from_config(config: &PostureConfig) -> Result<Self, ConfigError> {
        Self::new(config.window_size)
    }

    /// サンプルを追加し、現在の窓の平均を返す
    pub fn push_and_average(&mut self, sample: AngleSample) -> f64 {
        self.samples.push_back(sample);
        if self.samples.len() > self.window {
            self.samples.pop_front();
        }
        self.average()
    }

    fn average(&self) -> f64 {
        let sum: f64 = self.samples.iter().map(|s| s.degrees).sum();
        sum / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.window
    }

    pub fn latest(&self) -> Option<&AngleSample> {
        self.samples.back()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }
}
