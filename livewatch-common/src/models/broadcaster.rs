// File: livewatch-common/src/models/broadcaster.rs

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Platform-issued numeric broadcaster id. Never generated locally.
pub type BroadcasterId = i64;

/// Persisted live state. There is deliberately no "unknown" value:
/// a broadcaster that was never observed live counts as offline.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    Online,
    #[default]
    Offline,
}

impl StreamStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, StreamStatus::Online)
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamStatus::Online => write!(f, "online"),
            StreamStatus::Offline => write!(f, "offline"),
        }
    }
}

impl FromStr for StreamStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(StreamStatus::Online),
            "offline" => Ok(StreamStatus::Offline),
            _ => Err(format!("Unknown stream status: {}", s)),
        }
    }
}

/// A tracked broadcaster as held by the store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Broadcaster {
    pub id: BroadcasterId,
    pub display_name: String,
    pub status: StreamStatus,
}

impl Broadcaster {
    /// A freshly tracked broadcaster: offline, no display name yet.
    pub fn new(id: BroadcasterId) -> Self {
        Self {
            id,
            display_name: String::new(),
            status: StreamStatus::Offline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("ONLINE".parse::<StreamStatus>(), Ok(StreamStatus::Online));
        assert_eq!("offline".parse::<StreamStatus>(), Ok(StreamStatus::Offline));
        assert!("unknown".parse::<StreamStatus>().is_err());
    }

    #[test]
    fn new_broadcaster_starts_offline() {
        let b = Broadcaster::new(42);
        assert_eq!(b.status, StreamStatus::Offline);
        assert!(b.display_name.is_empty());
        assert_eq!(StreamStatus::default(), StreamStatus::Offline);
    }

    #[test]
    fn status_display_matches_storage_form() {
        assert_eq!(StreamStatus::Online.to_string(), "online");
        assert_eq!(StreamStatus::Offline.to_string(), "offline");
    }
}
