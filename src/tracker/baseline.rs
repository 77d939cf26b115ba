/// 基準（ニュートラル）胴体角度
///
/// 平滑化バッファが初めて満杯になったフレームの平均値で固定する。
/// 一度決まったらセッション中は変更しない（ドリフト補正なし）。
/// キャリブレーション中に動いていると基準が偏るが、それは仕様上の制限。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Baseline {
    value: Option<f64>,
}

impl Baseline {
    pub fn new() -> Self {
        Self { value: None }
    }

    /// 未設定かつバッファが窓サイズに達していれば `smoothed` で固定する
    ///
    /// 固定済みの値（または None）を返す。
    pub fn maybe_calibrate(&mut self, buffer_len: usize, window: usize, smoothed: f64) -> Option<f64> {
        if self.value.is_none() && buffer_len == window && smoothed.is_finite() {
            self.value = Some(smoothed);
        }
        self.value
    }

    pub fn get(&self) -> Option<f64> {
        self.value
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}
