// File: livewatch-core/src/platforms/twitch_eventsub/mod.rs

pub mod events;
pub mod webhook;

pub use events::{EventKind, EventSubEvent, MessageType};
pub use webhook::{webhook_router, WebhookGateway, WebhookReply};
