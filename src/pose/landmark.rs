use serde::{Deserialize, Serialize};

/// BlazePose / MediaPipe Pose の 33 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    pub const ALL: [LandmarkIndex; Self::COUNT] = {
        use LandmarkIndex::*;
        [
            Nose, LeftEyeInner, LeftEye, LeftEyeOuter, RightEyeInner, RightEye, RightEyeOuter,
            LeftEar, RightEar, MouthLeft, MouthRight,
            LeftShoulder, RightShoulder, LeftElbow, RightElbow, LeftWrist, RightWrist,
            LeftPinky, RightPinky, LeftIndex, RightIndex, LeftThumb, RightThumb,
            LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle,
            LeftHeel, RightHeel, LeftFootIndex, RightFootIndex,
        ]
    };

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// 単一ランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Landmark {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f64,
    /// 正規化されたY座標 (0.0〜1.0、下が正)
    pub y: f64,
    /// 奥行き（モデルが出力する場合のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// 可視性 (0.0〜1.0)。None は「不明」扱い
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f32) -> Self {
        Self { x, y, z: None, visibility: Some(visibility) }
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// 可視性が閾値を超えているか。可視性が無いものは信用しない
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility.map_or(false, |v| v > threshold)
    }

    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// 1フレーム分のランドマーク集合
///
/// 検出器が毎フレーム新しく生成する。コア側では読むだけ。
/// JSON ではインデックス順の配列（欠損は `null`）として表現する。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<Option<Landmark>>", into = "Vec<Option<Landmark>>")]
pub struct LandmarkSet {
    landmarks: [Option<Landmark>; LandmarkIndex::COUNT],
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self { landmarks: [None; LandmarkIndex::COUNT] }
    }

    pub fn get(&self, index: LandmarkIndex) -> Option<&Landmark> {
        self.landmarks[index as usize].as_ref()
    }

    pub fn insert(&mut self, index: LandmarkIndex, landmark: Landmark) {
        self.landmarks[index as usize] = Some(landmark);
    }

    pub fn remove(&mut self, index: LandmarkIndex) -> Option<Landmark> {
        self.landmarks[index as usize].take()
    }

    pub fn with(mut self, index: LandmarkIndex, landmark: Landmark) -> Self {
        self.insert(index, landmark);
        self
    }

    /// 存在するランドマークの数
    pub fn len(&self) -> usize {
        self.landmarks.iter().filter(|l| l.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Option<Landmark>>> for LandmarkSet {
    type Error = String;

    fn try_from(entries: Vec<Option<Landmark>>) -> Result<Self, Self::Error> {
        if entries.len() > LandmarkIndex::COUNT {
            return Err(format!(
                "expected at most {} landmarks, got {}",
                LandmarkIndex::COUNT,
                entries.len()
            ));
        }
        let mut set = Self::new();
        for (slot, entry) in set.landmarks.iter_mut().zip(entries) {
            *slot = entry;
        }
        Ok(set)
    }
}

impl From<LandmarkSet> for Vec<Option<Landmark>> {
    fn from(set: LandmarkSet) -> Self {
        set.landmarks.to_vec()
    }
}
