// File: livewatch-core/src/services/reconciler.rs

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use livewatch_common::models::{Broadcaster, BroadcasterId, StatusObservation};
use livewatch_common::traits::repository_traits::BroadcasterRepository;

use crate::platforms::LiveQuery;
use crate::services::status_merge;
use crate::Error;

/// Counters from a single sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Broadcasters in the store when the sweep started.
    pub tracked: usize,
    /// Visited through the live branch.
    pub online: usize,
    /// Visited through the offline branch.
    pub offline: usize,
    /// Records actually rewritten.
    pub written: usize,
    /// Records whose write failed.
    pub failed: usize,
}

/// Periodic poll-and-merge. Holds no status between sweeps; every sweep
/// re-reads the full broadcaster set.
pub struct Reconciler {
    repo: Arc<dyn BroadcasterRepository>,
    live_query: Arc<dyn LiveQuery>,
}

impl Reconciler {
    pub fn new(repo: Arc<dyn BroadcasterRepository>, live_query: Arc<dyn LiveQuery>) -> Self {
        Self { repo, live_query }
    }

    /// Runs one full resync.
    ///
    /// If the live query fails nothing is written and the error is returned;
    /// the next tick starts over from scratch.
    pub async fn sweep(&self) -> Result<SweepReport, Error> {
        info!("Check all broadcaster status");

        let mut remaining: BTreeMap<BroadcasterId, Broadcaster> = self
            .repo
            .list_all()
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let mut report = SweepReport {
            tracked: remaining.len(),
            ..SweepReport::default()
        };

        if remaining.is_empty() {
            debug!("No tracked broadcasters, skipping live query");
            return Ok(report);
        }

        let ids: Vec<BroadcasterId> = remaining.keys().copied().collect();
        let live = match self.live_query.query_live(&ids).await {
            Ok(live) => live,
            Err(e) => {
                error!("Live query failed for {} broadcaster(s): {}", ids.len(), e);
                return Err(e);
            }
        };

        for stream in live {
            // Each broadcaster leaves the working set on its first match, so a
            // duplicated or untracked id in the answer is never applied twice.
            let Some(current) = remaining.remove(&stream.id) else {
                debug!("Live stream {} is not tracked or already visited", stream.id);
                continue;
            };
            report.online += 1;
            let observation = StatusObservation::poll_online(current.id, stream.display_name);
            self.commit(&current, &observation, &mut report).await;
        }

        for current in remaining.into_values() {
            report.offline += 1;
            let observation = StatusObservation::poll_offline(current.id);
            self.commit(&current, &observation, &mut report).await;
        }

        info!(
            "Updated all broadcaster status: tracked={}, online={}, offline={}, written={}, failed={}",
            report.tracked, report.online, report.offline, report.written, report.failed
        );
        Ok(report)
    }

    async fn commit(
        &self,
        current: &Broadcaster,
        observation: &StatusObservation,
        report: &mut SweepReport,
    ) {
        match status_merge::commit(self.repo.as_ref(), current, observation).await {
            Ok(true) => report.written += 1,
            Ok(false) => {}
            Err(e) => {
                warn!("Failed to store status for broadcaster {}: {}", current.id, e);
                report.failed += 1;
            }
        }
    }
}
