pub mod landmark;
pub mod validate;

pub use landmark::{Landmark, LandmarkIndex, LandmarkSet};
pub use validate::{is_pose_complete, is_side_visible, BodySide};
