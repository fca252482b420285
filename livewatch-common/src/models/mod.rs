// File: livewatch-common/src/models/mod.rs
pub mod broadcaster;
pub mod observation;

pub use broadcaster::{Broadcaster, BroadcasterId, StreamStatus};
pub use observation::{LiveStream, ObservationSource, StatusObservation};
