//! Pure angle helpers over landmark coordinates.
//!
//! All angles are in degrees. Image coordinates are normalized with y growing downward,
//! so an upright torso (shoulders above hips) reads close to 180° from [`torso_lean_angle`].

use crate::pose::{BodySide, Landmark, LandmarkIndex, LandmarkSet};

pub fn midpoint(a: &Landmark, b: &Landmark) -> [f64; 2] {
    [(a.x + b.x) / 2.0, (a.y + b.y) / 2.0]
}

/// Unsigned angle of the `from -> to` vector measured against the image vertical.
///
/// `None` when the vertical delta is zero or anything is non-finite.
fn vertical_angle(from: [f64; 2], to: [f64; 2]) -> Option<f64> {
    let dx = from[0] - to[0];
    let dy = from[1] - to[1];
    if !dx.is_finite() || !dy.is_finite() || dy == 0.0 {
        return None;
    }
    let angle = dx.atan2(dy).to_degrees().abs();
    angle.is_finite().then_some(angle)
}

/// Torso lean: shoulder midpoint to hip midpoint, relative to vertical, in `[0, 180]`.
pub fn torso_lean_angle(landmarks: &LandmarkSet) -> Option<f64> {
    let left_shoulder = landmarks.get(LandmarkIndex::LeftShoulder)?;
    let right_shoulder = landmarks.get(LandmarkIndex::RightShoulder)?;
    let left_hip = landmarks.get(LandmarkIndex::LeftHip)?;
    let right_hip = landmarks.get(LandmarkIndex::RightHip)?;

    let shoulder_mid = midpoint(left_shoulder, right_shoulder);
    let hip_mid = midpoint(left_hip, right_hip);
    vertical_angle(shoulder_mid, hip_mid)
}

/// Same measurement as [`torso_lean_angle`] using one side's shoulder and hip only.
pub fn side_lean_angle(landmarks: &LandmarkSet, side: BodySide) -> Option<f64> {
    let shoulder = landmarks.get(side.shoulder())?;
    let hip = landmarks.get(side.hip())?;
    vertical_angle(shoulder.xy(), hip.xy())
}

/// Torso lean for a frame that may show only one side.
///
/// With all four torso points present this is [`torso_lean_angle`] (and stays `None` when
/// that is degenerate). When one side is occluded it falls back to the other side's
/// shoulder-hip vector, left first.
pub fn lean_angle(landmarks: &LandmarkSet) -> Option<f64> {
    let has_both_sides = BodySide::BOTH.iter().all(|&side| {
        landmarks.get(side.shoulder()).is_some() && landmarks.get(side.hip()).is_some()
    });
    if has_both_sides {
        return torso_lean_angle(landmarks);
    }
    BodySide::BOTH
        .iter()
        .find_map(|&side| side_lean_angle(landmarks, side))
}

/// Folds a [`vertical_angle`]-style reading onto the distance from the vertical line,
/// so both "straight up" (180°) and "straight down" (0°) read as 0.
pub fn tilt_from_vertical(angle: f64) -> f64 {
    angle.min(180.0 - angle)
}

/// Interior angle at `b` formed by `a-b-c`, in `[0, 180]`.
///
/// Returns `NaN` when either arm has zero length.
pub fn angle_at(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    let ba = [a[0] - b[0], a[1] - b[1]];
    let bc = [c[0] - b[0], c[1] - b[1]];

    let mag_ba = (ba[0] * ba[0] + ba[1] * ba[1]).sqrt();
    let mag_bc = (bc[0] * bc[0] + bc[1] * bc[1]).sqrt();
    if mag_ba == 0.0 || mag_bc == 0.0 {
        return f64::NAN;
    }

    let dot = ba[0] * bc[0] + ba[1] * bc[1];
    // rounding can push the ratio just outside [-1, 1]
    let cos_angle = (dot / (mag_ba * mag_bc)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Shoulder-hip-knee angle on one side. ~180° when the back and thigh are in line.
pub fn hip_flexion_angle(landmarks: &LandmarkSet, side: BodySide) -> Option<f64> {
    let shoulder = landmarks.get(side.shoulder())?;
    let hip = landmarks.get(side.hip())?;
    let knee = landmarks.get(side.knee())?;
    let angle = angle_at(shoulder.xy(), hip.xy(), knee.xy());
    angle.is_finite().then_some(angle)
}

/// Alternate straightness check: shoulder-hip-knee angle within `range` (inclusive).
///
/// Uses the left side when available, otherwise the right. `None` if neither side
/// yields an angle.
pub fn is_back_straight_by_angle(landmarks: &LandmarkSet, range: [f64; 2]) -> Option<bool> {
    let angle = BodySide::BOTH
        .iter()
        .find_map(|&side| hip_flexion_angle(landmarks, side))?;
    Some(angle >= range[0] && angle <= range[1])
}

/// Forward-head angle: ear relative to shoulder, as the deviation from vertical.
///
/// 0° with the ear directly above the shoulder.
pub fn head_forward_angle(landmarks: &LandmarkSet) -> Option<f64> {
    BodySide::BOTH.iter().find_map(|&side| {
        let ear = landmarks.get(side.ear())?;
        let shoulder = landmarks.get(side.shoulder())?;
        vertical_angle(ear.xy(), shoulder.xy()).map(tilt_from_vertical)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn torso(shoulders: [(f64, f64); 2], hips: [(f64, f64); 2]) -> LandmarkSet {
        LandmarkSet::new()
            .with(LandmarkIndex::LeftShoulder, Landmark::new(shoulders[0].0, shoulders[0].1, 0.9))
            .with(LandmarkIndex::RightShoulder, Landmark::new(shoulders[1].0, shoulders[1].1, 0.9))
            .with(LandmarkIndex::LeftHip, Landmark::new(hips[0].0, hips[0].1, 0.9))
            .with(LandmarkIndex::RightHip, Landmark::new(hips[1].0, hips[1].1, 0.9))
    }

    #[test]
    fn test_midpoint() {
        let a = Landmark::new(0.2, 0.4, 1.0);
        let b = Landmark::new(0.6, 0.8, 1.0);
        let m = midpoint(&a, &b);
        assert!(approx_eq(m[0], 0.4, 1e-12));
        assert!(approx_eq(m[1], 0.6, 1e-12));
    }

    #[test]
    fn test_upright_torso_reads_180() {
        let set = torso([(0.4, 0.3), (0.6, 0.3)], [(0.4, 0.7), (0.6, 0.7)]);
        let angle = torso_lean_angle(&set).unwrap();
        assert!(approx_eq(angle, 180.0, 1e-9), "angle={}", angle);
        assert!(approx_eq(tilt_from_vertical(angle), 0.0, 1e-9));
    }

    #[test]
    fn test_leaning_torso() {
        // shoulders shifted by the same amount as the vertical span: 45° lean
        let set = torso([(0.6, 0.3), (0.8, 0.3)], [(0.2, 0.7), (0.4, 0.7)]);
        let angle = torso_lean_angle(&set).unwrap();
        assert!(approx_eq(angle, 135.0, 1e-9), "angle={}", angle);
    }

    #[test]
    fn test_lean_is_unsigned() {
        let forward = torso([(0.6, 0.3), (0.8, 0.3)], [(0.2, 0.7), (0.4, 0.7)]);
        let backward = torso([(0.0, 0.3), (0.2, 0.3)], [(0.4, 0.7), (0.6, 0.7)]);
        let a = torso_lean_angle(&forward).unwrap();
        let b = torso_lean_angle(&backward).unwrap();
        assert!(approx_eq(a, b, 1e-9));
    }

    #[test]
    fn test_degenerate_torso() {
        // shoulder and hip midpoints at the same height
        let set = torso([(0.4, 0.5), (0.6, 0.5)], [(0.3, 0.5), (0.7, 0.5)]);
        assert!(torso_lean_angle(&set).is_none());
    }

    #[test]
    fn test_non_finite_torso() {
        let set = torso([(f64::NAN, 0.3), (0.6, 0.3)], [(0.4, 0.7), (0.6, 0.7)]);
        assert!(torso_lean_angle(&set).is_none());
    }

    #[test]
    fn test_missing_torso_landmark() {
        let mut set = torso([(0.4, 0.3), (0.6, 0.3)], [(0.4, 0.7), (0.6, 0.7)]);
        set.remove(LandmarkIndex::RightHip);
        assert!(torso_lean_angle(&set).is_none());
    }

    #[test]
    fn test_lean_angle_uses_visible_side() {
        // 右側だけ: 肩が腰の真上
        let right_only = LandmarkSet::new()
            .with(LandmarkIndex::RightShoulder, Landmark::new(0.6, 0.3, 0.9))
            .with(LandmarkIndex::RightHip, Landmark::new(0.6, 0.7, 0.9));
        assert!(torso_lean_angle(&right_only).is_none());
        assert!(approx_eq(lean_angle(&right_only).unwrap(), 180.0, 1e-9));
        assert!(approx_eq(
            side_lean_angle(&right_only, BodySide::Right).unwrap(),
            180.0,
            1e-9
        ));
        assert!(side_lean_angle(&right_only, BodySide::Left).is_none());
    }

    #[test]
    fn test_lean_angle_prefers_midpoints() {
        // 左右で傾きが違っても、両側あれば中点で測る
        let set = torso([(0.6, 0.3), (0.8, 0.3)], [(0.2, 0.7), (0.4, 0.7)]);
        assert!(approx_eq(lean_angle(&set).unwrap(), 135.0, 1e-9));
    }

    #[test]
    fn test_lean_angle_degenerate_does_not_fall_back() {
        let set = torso([(0.4, 0.5), (0.6, 0.5)], [(0.3, 0.5), (0.7, 0.5)]);
        assert!(lean_angle(&set).is_none());
        assert!(lean_angle(&LandmarkSet::new()).is_none());
    }

    #[test]
    fn test_angle_at_straight() {
        let angle = angle_at([0.0, 0.0], [0.5, 0.0], [1.0, 0.0]);
        assert!(approx_eq(angle, 180.0, 1e-6));
    }

    #[test]
    fn test_angle_at_right_angle() {
        let angle = angle_at([0.0, 0.0], [0.5, 0.0], [0.5, 0.5]);
        assert!(approx_eq(angle, 90.0, 1e-6));
    }

    #[test]
    fn test_angle_at_folded() {
        let angle = angle_at([1.0, 0.0], [0.0, 0.0], [1.0, 0.0]);
        assert!(approx_eq(angle, 0.0, 1e-6));
    }

    #[test]
    fn test_angle_at_degenerate() {
        assert!(angle_at([0.5, 0.5], [0.5, 0.5], [1.0, 1.0]).is_nan());
    }

    #[test]
    fn test_back_straight_by_angle() {
        let straight = LandmarkSet::new()
            .with(LandmarkIndex::LeftShoulder, Landmark::new(0.5, 0.2, 0.9))
            .with(LandmarkIndex::LeftHip, Landmark::new(0.5, 0.5, 0.9))
            .with(LandmarkIndex::LeftKnee, Landmark::new(0.5, 0.8, 0.9));
        assert_eq!(is_back_straight_by_angle(&straight, [160.0, 185.0]), Some(true));

        // seated: thigh horizontal
        let seated = LandmarkSet::new()
            .with(LandmarkIndex::RightShoulder, Landmark::new(0.5, 0.2, 0.9))
            .with(LandmarkIndex::RightHip, Landmark::new(0.5, 0.5, 0.9))
            .with(LandmarkIndex::RightKnee, Landmark::new(0.8, 0.5, 0.9));
        assert_eq!(is_back_straight_by_angle(&seated, [160.0, 185.0]), Some(false));

        assert_eq!(is_back_straight_by_angle(&LandmarkSet::new(), [160.0, 185.0]), None);
    }

    #[test]
    fn test_head_forward_angle() {
        let upright = LandmarkSet::new()
            .with(LandmarkIndex::LeftEar, Landmark::new(0.5, 0.1, 0.9))
            .with(LandmarkIndex::LeftShoulder, Landmark::new(0.5, 0.3, 0.9));
        assert!(approx_eq(head_forward_angle(&upright).unwrap(), 0.0, 1e-9));

        // right side fallback, ear forward by the vertical gap: 45°
        let forward = LandmarkSet::new()
            .with(LandmarkIndex::RightEar, Landmark::new(0.7, 0.1, 0.9))
            .with(LandmarkIndex::RightShoulder, Landmark::new(0.5, 0.3, 0.9));
        assert!(approx_eq(head_forward_angle(&forward).unwrap(), 45.0, 1e-9));

        assert!(head_forward_angle(&LandmarkSet::new()).is_none());
    }

    fn coord() -> impl Strategy<Value = (f64, f64)> {
        (-0.5f64..1.5, -0.5f64..1.5)
    }

    proptest! {
        #[test]
        fn prop_torso_angle_in_range(
            ls in coord(), rs in coord(), lh in coord(), rh in coord(),
        ) {
            let set = torso([ls, rs], [lh, rh]);
            let shoulder_y = (ls.1 + rs.1) / 2.0;
            let hip_y = (lh.1 + rh.1) / 2.0;
            match torso_lean_angle(&set) {
                Some(angle) => prop_assert!((0.0..=180.0).contains(&angle), "angle={}", angle),
                None => prop_assert_eq!(shoulder_y - hip_y, 0.0),
            }
        }

        #[test]
        fn prop_angle_at_in_range(a in coord(), b in coord(), c in coord()) {
            let angle = angle_at([a.0, a.1], [b.0, b.1], [c.0, c.1]);
            prop_assert!(angle.is_nan() || (0.0..=180.0).contains(&angle));
        }
    }
}
