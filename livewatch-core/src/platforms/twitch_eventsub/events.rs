// File: livewatch-core/src/platforms/twitch_eventsub/events.rs

use std::fmt;
use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, Utc};
use livewatch_common::models::{BroadcasterId, StreamStatus};

/// Header carrying the EventSub message type on every webhook request.
pub const MESSAGE_TYPE_HEADER: &str = "Twitch-Eventsub-Message-Type";

/// The closed set of message types we distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    Verification,
    Notification,
    Revocation,
    Unknown(String),
}

impl MessageType {
    pub fn from_header(value: &str) -> Self {
        match value {
            "webhook_callback_verification" => MessageType::Verification,
            "notification" => MessageType::Notification,
            "revocation" => MessageType::Revocation,
            other => MessageType::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Verification => write!(f, "webhook_callback_verification"),
            MessageType::Notification => write!(f, "notification"),
            MessageType::Revocation => write!(f, "revocation"),
            MessageType::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// Twitch sends ids as JSON strings; accept plain numbers too.
fn de_broadcaster_id<'de, D>(deserializer: D) -> Result<BroadcasterId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(BroadcasterId),
        Str(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Num(n) => Ok(n),
        RawId::Str(s) => s
            .trim()
            .parse::<BroadcasterId>()
            .map_err(|e| serde::de::Error::custom(format!("invalid broadcaster id '{}': {}", s, e))),
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Condition {
    #[serde(default)]
    pub broadcaster_user_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Condition {
    /// The broadcaster the subscription targets, whichever key carries it.
    pub fn target(&self) -> Option<&str> {
        self.broadcaster_user_id.as_deref().or(self.user_id.as_deref())
    }
}

/// Subscription metadata included with every webhook body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionData {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub sub_type: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub cost: u32,

    #[serde(default)]
    pub condition: Condition,

    #[serde(default)]
    pub transport: serde_json::Value,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a `webhook_callback_verification` request. The challenge is
/// echoed once and never stored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeRequest {
    pub subscription: SubscriptionData,
    #[serde(default)]
    pub challenge: Option<String>,
}

/// Body of a `notification` request before the event is decoded:
/// { "subscription": { ... }, "event": { ... } }
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationEnvelope {
    pub subscription: SubscriptionData,
    pub event: serde_json::Value,
}

/// Body of a `revocation` request.
#[derive(Debug, Clone, Deserialize)]
pub struct RevocationEnvelope {
    pub subscription: SubscriptionData,
}

/// Matches the "stream.online" notification payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamOnline {
    #[serde(default)]
    pub id: String,
    #[serde(deserialize_with = "de_broadcaster_id")]
    pub broadcaster_user_id: BroadcasterId,
    #[serde(default)]
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

/// Matches the "stream.offline" notification payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamOffline {
    #[serde(deserialize_with = "de_broadcaster_id")]
    pub broadcaster_user_id: BroadcasterId,
    #[serde(default)]
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
}

/// Subscription types we decode. Anything else is accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    StreamOnline,
    StreamOffline,
}

impl EventKind {
    pub fn from_subscription_type(sub_type: &str) -> Option<Self> {
        match sub_type {
            "stream.online" => Some(EventKind::StreamOnline),
            "stream.offline" => Some(EventKind::StreamOffline),
            _ => None,
        }
    }
}

/// A decoded event, one variant per [`EventKind`].
#[derive(Debug, Clone)]
pub enum EventSubEvent {
    StreamOnline(StreamOnline),
    StreamOffline(StreamOffline),
}

impl EventSubEvent {
    pub fn broadcaster_id(&self) -> BroadcasterId {
        match self {
            EventSubEvent::StreamOnline(e) => e.broadcaster_user_id,
            EventSubEvent::StreamOffline(e) => e.broadcaster_user_id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            EventSubEvent::StreamOnline(e) => &e.broadcaster_user_name,
            EventSubEvent::StreamOffline(e) => &e.broadcaster_user_name,
        }
    }

    pub fn status(&self) -> StreamStatus {
        match self {
            EventSubEvent::StreamOnline(_) => StreamStatus::Online,
            EventSubEvent::StreamOffline(_) => StreamStatus::Offline,
        }
    }
}

/// Decodes `event_json` into the payload shape of `kind`.
pub fn decode_event(
    kind: EventKind,
    event_json: &serde_json::Value,
) -> Result<EventSubEvent, serde_json::Error> {
    match kind {
        EventKind::StreamOnline => {
            StreamOnline::deserialize(event_json).map(EventSubEvent::StreamOnline)
        }
        EventKind::StreamOffline => {
            StreamOffline::deserialize(event_json).map(EventSubEvent::StreamOffline)
        }
    }
}
