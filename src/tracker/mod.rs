pub mod baseline;
pub mod classifier;
pub mod pipeline;
pub mod smooth;

pub use baseline::Baseline;
pub use classifier::{ClassifierOutput, PostureClassifier, PostureState};
pub use pipeline::{FrameResult, PostureMessage, PosturePipeline};
pub use smooth::{AngleSample, MovingAverage};
