use super::landmark::{LandmarkIndex, LandmarkSet};

/// 体の左右
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySide {
    Left,
    Right,
}

impl BodySide {
    pub const BOTH: [BodySide; 2] = [BodySide::Left, BodySide::Right];

    pub fn shoulder(self) -> LandmarkIndex {
        match self {
            Self::Left => LandmarkIndex::LeftShoulder,
            Self::Right => LandmarkIndex::RightShoulder,
        }
    }

    pub fn hip(self) -> LandmarkIndex {
        match self {
            Self::Left => LandmarkIndex::LeftHip,
            Self::Right => LandmarkIndex::RightHip,
        }
    }

    pub fn knee(self) -> LandmarkIndex {
        match self {
            Self::Left => LandmarkIndex::LeftKnee,
            Self::Right => LandmarkIndex::RightKnee,
        }
    }

    pub fn ear(self) -> LandmarkIndex {
        match self {
            Self::Left => LandmarkIndex::LeftEar,
            Self::Right => LandmarkIndex::RightEar,
        }
    }

    /// 姿勢判定に必要な片側のランドマーク
    pub fn required(self) -> [LandmarkIndex; 3] {
        [self.hip(), self.shoulder(), self.knee()]
    }
}

/// 片側の必須ランドマークが全て存在し、可視性が閾値を超えているか
pub fn is_side_visible(landmarks: &LandmarkSet, side: BodySide, threshold: f32) -> bool {
    side.required()
        .iter()
        .all(|&index| landmarks.get(index).is_some_and(|lm| lm.is_visible(threshold)))
}

/// 少なくとも片側が完全に見えていれば判定可能とする
///
/// 斜め45度から撮影されて反対側が隠れていても通す。
/// 入力が無い場合はエラーではなく false。
pub fn is_pose_complete(landmarks: Option<&LandmarkSet>, threshold: f32) -> bool {
    let Some(landmarks) = landmarks else {
        return false;
    };
    BodySide::BOTH
        .iter()
        .any(|&side| is_side_visible(landmarks, side, threshold))
}
