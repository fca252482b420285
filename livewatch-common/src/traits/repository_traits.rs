use async_trait::async_trait;
use crate::error::Error;
use crate::models::broadcaster::{Broadcaster, BroadcasterId};

/// Durable broadcaster records. Each `upsert` must be atomic per record;
/// nothing above this trait takes locks.
#[async_trait]
pub trait BroadcasterRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Broadcaster>, Error>;
    async fn get_by_id(&self, id: BroadcasterId) -> Result<Option<Broadcaster>, Error>;
    async fn upsert(&self, broadcaster: &Broadcaster) -> Result<(), Error>;
    async fn remove(&self, id: BroadcasterId) -> Result<bool, Error>;
}
