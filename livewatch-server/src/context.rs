//! livewatch-server/src/context.rs
//!
//! Everything the commands share: the database, the store and the
//! pieces built on top of it.

use std::sync::Arc;
use tracing::info;

use livewatch_common::models::{Broadcaster, BroadcasterId};
use livewatch_common::traits::repository_traits::BroadcasterRepository;
use livewatch_core::config::{SweepConfig, TwitchConfig};
use livewatch_core::db::Database;
use livewatch_core::platforms::twitch::TwitchHelixClient;
use livewatch_core::platforms::twitch_eventsub::WebhookGateway;
use livewatch_core::repositories::PostgresBroadcasterRepository;
use livewatch_core::services::Reconciler;
use livewatch_core::Error;

use crate::Args;

pub struct ServerContext {
    pub repo: Arc<dyn BroadcasterRepository>,
    pub sweep_config: SweepConfig,
    twitch_config: Option<TwitchConfig>,
}

impl ServerContext {
    /// Connects to Postgres and applies migrations.
    pub async fn connect(args: &Args) -> Result<Self, Error> {
        let db = Database::new(&args.db_url).await?;
        db.migrate().await?;
        info!("Database ready");

        let repo: Arc<dyn BroadcasterRepository> =
            Arc::new(PostgresBroadcasterRepository::new(db.pool().clone()));

        let twitch_config = match (&args.twitch_client_id, &args.twitch_client_secret) {
            (Some(id), Some(secret)) => Some(TwitchConfig {
                client_id: id.clone(),
                client_secret: secret.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            repo,
            sweep_config: SweepConfig::from_secs(args.sweep_period_secs, args.sweep_initial_delay_secs),
            twitch_config,
        })
    }

    /// Requires Twitch app credentials.
    pub fn reconciler(&self) -> Result<Reconciler, Error> {
        let config = self.twitch_config.clone().ok_or_else(|| {
            Error::Config("TWITCH_CLIENT_ID and TWITCH_CLIENT_SECRET must both be set".into())
        })?;
        let live_query = Arc::new(TwitchHelixClient::new(config));
        Ok(Reconciler::new(self.repo.clone(), live_query))
    }

    pub fn webhook_gateway(&self) -> WebhookGateway {
        WebhookGateway::new(self.repo.clone())
    }

    /// Adds a broadcaster as offline. Returns false if it was already tracked.
    pub async fn track(&self, id: BroadcasterId) -> Result<bool, Error> {
        if id <= 0 {
            return Err(Error::Parse(format!("broadcaster id must be positive, got {}", id)));
        }
        if self.repo.get_by_id(id).await?.is_some() {
            return Ok(false);
        }
        self.repo.upsert(&Broadcaster::new(id)).await?;
        Ok(true)
    }
}
