// File: livewatch-core/src/test_utils/helpers.rs

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use parking_lot::Mutex;

use livewatch_common::models::{Broadcaster, BroadcasterId};
use livewatch_common::traits::repository_traits::BroadcasterRepository;
use crate::Error;
use crate::db::Database;

/// A store kept in memory. Counts writes so tests can assert on them.
#[derive(Default)]
pub struct InMemoryBroadcasterRepository {
    records: Mutex<BTreeMap<BroadcasterId, Broadcaster>>,
    writes: AtomicUsize,
}

impl InMemoryBroadcasterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store without counting the seed as writes.
    pub fn with(broadcasters: Vec<Broadcaster>) -> Self {
        let records = broadcasters.into_iter().map(|b| (b.id, b)).collect();
        Self {
            records: Mutex::new(records),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `upsert` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Broadcaster> {
        self.records.lock().values().cloned().collect()
    }
}

#[async_trait]
impl BroadcasterRepository for InMemoryBroadcasterRepository {
    async fn list_all(&self) -> Result<Vec<Broadcaster>, Error> {
        Ok(self.snapshot())
    }

    async fn get_by_id(&self, id: BroadcasterId) -> Result<Option<Broadcaster>, Error> {
        Ok(self.records.lock().get(&id).cloned())
    }

    async fn upsert(&self, broadcaster: &Broadcaster) -> Result<(), Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.records.lock().insert(broadcaster.id, broadcaster.clone());
        Ok(())
    }

    async fn remove(&self, id: BroadcasterId) -> Result<bool, Error> {
        Ok(self.records.lock().remove(&id).is_some())
    }
}

/// A store whose writes always fail; reads behave like the in-memory store.
pub struct FailingWritesRepository {
    inner: InMemoryBroadcasterRepository,
}

impl FailingWritesRepository {
    pub fn with(broadcasters: Vec<Broadcaster>) -> Self {
        Self { inner: InMemoryBroadcasterRepository::with(broadcasters) }
    }
}

#[async_trait]
impl BroadcasterRepository for FailingWritesRepository {
    async fn list_all(&self) -> Result<Vec<Broadcaster>, Error> {
        self.inner.list_all().await
    }

    async fn get_by_id(&self, id: BroadcasterId) -> Result<Option<Broadcaster>, Error> {
        self.inner.get_by_id(id).await
    }

    async fn upsert(&self, broadcaster: &Broadcaster) -> Result<(), Error> {
        Err(Error::Platform(format!("write rejected for broadcaster {}", broadcaster.id)))
    }

    async fn remove(&self, id: BroadcasterId) -> Result<bool, Error> {
        self.inner.remove(id).await
    }
}

/// Connects to the test database named by `TEST_DATABASE_URL`
/// (default `postgres://livewatch@localhost/livewatch_test`), migrates it
/// and empties the broadcasters table.
pub async fn setup_test_database() -> Result<Database, Error> {
    let url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://livewatch@localhost/livewatch_test".to_string());

    let db = Database::new(&url).await?;
    db.migrate().await?;
    sqlx::query("TRUNCATE TABLE broadcasters")
        .execute(db.pool())
        .await?;
    Ok(db)
}
