//! The single writer policy for broadcaster status.
//!
//! Both the periodic sweep and the webhook gateway funnel their observations
//! through [`commit`]. There is no ordering check between sources: whichever
//! observation is committed last wins. A stale poll racing a fresher webhook
//! event can overwrite it, and nothing here detects that.

use tracing::debug;
use livewatch_common::models::{Broadcaster, StatusObservation, StreamStatus};
use livewatch_common::traits::repository_traits::BroadcasterRepository;
use crate::Error;

/// Result of merging one observation into the current record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub status: StreamStatus,
    pub display_name: String,
    pub should_write: bool,
}

impl MergeOutcome {
    pub fn into_broadcaster(self, current: &Broadcaster) -> Broadcaster {
        Broadcaster {
            id: current.id,
            display_name: self.display_name,
            status: self.status,
        }
    }
}

/// Pure merge step. A non-empty display name on the observation replaces the
/// stored one; an absent or empty name never blanks it out.
pub fn apply(current: &Broadcaster, observation: &StatusObservation) -> MergeOutcome {
    let display_name = match observation.display_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => current.display_name.clone(),
    };

    let should_write =
        observation.status != current.status || display_name != current.display_name;

    MergeOutcome {
        status: observation.status,
        display_name,
        should_write,
    }
}

/// Applies `observation` to `current` and writes the result if anything changed.
/// Returns whether a write happened.
pub async fn commit(
    repo: &dyn BroadcasterRepository,
    current: &Broadcaster,
    observation: &StatusObservation,
) -> Result<bool, Error> {
    let outcome = apply(current, observation);
    if !outcome.should_write {
        return Ok(false);
    }

    debug!(
        "Broadcaster {} status {} -> {} (source={})",
        current.id, current.status, outcome.status, observation.source
    );
    let updated = outcome.into_broadcaster(current);
    repo.upsert(&updated).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use livewatch_common::models::ObservationSource;
    use crate::test_utils::helpers::InMemoryBroadcasterRepository;

    fn broadcaster(id: i64, name: &str, status: StreamStatus) -> Broadcaster {
        Broadcaster { id, display_name: name.to_string(), status }
    }

    #[test]
    fn same_status_and_name_is_a_noop() {
        let current = broadcaster(1, "Alice", StreamStatus::Online);
        let obs = StatusObservation::poll_online(1, "Alice");
        let outcome = apply(&current, &obs);
        assert!(!outcome.should_write);
        assert_eq!(outcome.status, StreamStatus::Online);
    }

    #[test]
    fn name_change_alone_triggers_write() {
        let current = broadcaster(1, "alice", StreamStatus::Online);
        let obs = StatusObservation::poll_online(1, "Alice");
        let outcome = apply(&current, &obs);
        assert!(outcome.should_write);
        assert_eq!(outcome.display_name, "Alice");
    }

    #[test]
    fn offline_poll_keeps_known_name() {
        let current = broadcaster(1, "Alice", StreamStatus::Online);
        let outcome = apply(&current, &StatusObservation::poll_offline(1));
        assert!(outcome.should_write);
        assert_eq!(outcome.status, StreamStatus::Offline);
        assert_eq!(outcome.display_name, "Alice");
    }

    #[test]
    fn empty_name_does_not_blank_out() {
        let current = broadcaster(1, "Alice", StreamStatus::Offline);
        let obs = StatusObservation {
            broadcaster_id: 1,
            status: StreamStatus::Offline,
            display_name: Some(String::new()),
            source: ObservationSource::Webhook,
        };
        let outcome = apply(&current, &obs);
        assert!(!outcome.should_write);
        assert_eq!(outcome.display_name, "Alice");
    }

    #[tokio::test]
    async fn duplicate_observation_writes_once() -> Result<(), Error> {
        let repo = InMemoryBroadcasterRepository::with(vec![Broadcaster::new(7)]);
        let obs = StatusObservation::webhook(7, StreamStatus::Online, "Seven");

        for _ in 0..2 {
            let current = repo.get_by_id(7).await?.expect("tracked");
            commit(&repo, &current, &obs).await?;
        }

        assert_eq!(repo.write_count(), 1);
        let stored = repo.get_by_id(7).await?.expect("tracked");
        assert_eq!(stored.status, StreamStatus::Online);
        assert_eq!(stored.display_name, "Seven");
        Ok(())
    }

    #[tokio::test]
    async fn last_writer_wins_regardless_of_source() -> Result<(), Error> {
        let repo = InMemoryBroadcasterRepository::with(vec![Broadcaster::new(3)]);

        let current = repo.get_by_id(3).await?.expect("tracked");
        commit(&repo, &current, &StatusObservation::poll_online(3, "Three")).await?;

        let current = repo.get_by_id(3).await?.expect("tracked");
        commit(
            &repo,
            &current,
            &StatusObservation::webhook(3, StreamStatus::Offline, "Three"),
        )
            .await?;

        let stored = repo.get_by_id(3).await?.expect("tracked");
        assert_eq!(stored.status, StreamStatus::Offline);
        assert_eq!(repo.write_count(), 2);
        Ok(())
    }
}
