// File: livewatch-core/src/services/mod.rs

pub mod status_merge;
pub mod reconciler;

pub use reconciler::{Reconciler, SweepReport};
