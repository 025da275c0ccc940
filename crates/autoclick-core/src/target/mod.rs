//! Tracking of the single page the cycle operates on.

pub mod tracker;
pub mod types;

pub use tracker::TargetTracker;
pub use types::{ContextId, Target};
