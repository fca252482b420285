// File: src/platforms/mod.rs

use async_trait::async_trait;
use livewatch_common::models::{BroadcasterId, LiveStream};
use crate::Error;

/// "Who among these is live right now?"
///
/// An error means the whole batch is unknown; callers must not read it as
/// "nobody is live".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiveQuery: Send + Sync {
    async fn query_live(&self, ids: &[BroadcasterId]) -> Result<Vec<LiveStream>, Error>;
}

pub mod twitch;
pub mod twitch_eventsub;
