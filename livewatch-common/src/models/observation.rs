// File: livewatch-common/src/models/observation.rs

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::models::broadcaster::{BroadcasterId, StreamStatus};

/// Where a status claim came from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ObservationSource {
    Poll,
    Webhook,
}

impl fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationSource::Poll => write!(f, "poll"),
            ObservationSource::Webhook => write!(f, "webhook"),
        }
    }
}

/// A status claim that has not been committed to the store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusObservation {
    pub broadcaster_id: BroadcasterId,
    pub status: StreamStatus,
    pub display_name: Option<String>,
    pub source: ObservationSource,
}

impl StatusObservation {
    pub fn poll_online(broadcaster_id: BroadcasterId, display_name: impl Into<String>) -> Self {
        Self {
            broadcaster_id,
            status: StreamStatus::Online,
            display_name: Some(display_name.into()),
            source: ObservationSource::Poll,
        }
    }

    /// Absent from the live set. Carries no name so a known one is kept.
    pub fn poll_offline(broadcaster_id: BroadcasterId) -> Self {
        Self {
            broadcaster_id,
            status: StreamStatus::Offline,
            display_name: None,
            source: ObservationSource::Poll,
        }
    }

    pub fn webhook(
        broadcaster_id: BroadcasterId,
        status: StreamStatus,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            broadcaster_id,
            status,
            display_name: Some(display_name.into()),
            source: ObservationSource::Webhook,
        }
    }
}

/// One entry of a "who is live" answer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LiveStream {
    pub id: BroadcasterId,
    pub display_name: String,
}
