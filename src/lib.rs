pub mod config;
pub mod error;
pub mod geometry;
pub mod pose;
pub mod summary;
pub mod tracker;

pub use error::{ConfigError, Error, Result};
