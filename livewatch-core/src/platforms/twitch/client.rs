// File: livewatch-core/src/platforms/twitch/client.rs

use std::sync::Arc;
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use livewatch_common::models::{BroadcasterId, LiveStream};

use crate::config::TwitchConfig;
use crate::platforms::LiveQuery;
use crate::Error;
use super::requests::stream::{parse_streams, streams_url, HELIX_BASE_URL, MAX_IDS_PER_REQUEST};
use super::requests::token::{fetch_app_access_token, AppAccessToken, TWITCH_TOKEN_URL};

/// A small wrapper client for the Helix "Get Streams" endpoint, authenticated
/// with an app access token that is fetched and cached on demand.
pub struct TwitchHelixClient {
    http: Arc<ReqwestClient>,
    config: TwitchConfig,
    helix_base: String,
    token_url: String,
    token: Mutex<Option<AppAccessToken>>,
}

impl TwitchHelixClient {
    pub fn new(config: TwitchConfig) -> Self {
        Self::with_endpoints(config, HELIX_BASE_URL, TWITCH_TOKEN_URL)
    }

    /// Points the client at other hosts, e.g. the Twitch CLI mock API.
    pub fn with_endpoints(config: TwitchConfig, helix_base: &str, token_url: &str) -> Self {
        Self {
            http: Arc::new(ReqwestClient::new()),
            config,
            helix_base: helix_base.to_string(),
            token_url: token_url.to_string(),
            token: Mutex::new(None),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    /// Returns a cached token, fetching a new one if none is cached or it is
    /// about to expire.
    async fn bearer_token(&self) -> Result<String, Error> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let token = fetch_app_access_token(
            &self.http,
            &self.token_url,
            &self.config.client_id,
            &self.config.client_secret,
        )
            .await?;
        let access = token.access_token.clone();
        *guard = Some(token);
        Ok(access)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    /// One "Get Streams" call for at most [`MAX_IDS_PER_REQUEST`] ids. A 401
    /// drops the cached token and retries once.
    async fn fetch_chunk(&self, ids: &[BroadcasterId]) -> Result<Vec<LiveStream>, Error> {
        let url = streams_url(&self.helix_base, ids);

        for attempt in 0..2 {
            let bearer = self.bearer_token().await?;
            let resp = self
                .http
                .get(&url)
                .header("Client-Id", self.client_id())
                .header("Authorization", format!("Bearer {}", bearer))
                .send()
                .await
                .map_err(|e| Error::Platform(format!("get streams network error: {}", e)))?;

            if resp.status() == StatusCode::UNAUTHORIZED && attempt == 0 {
                warn!("Helix rejected the app access token; fetching a new one");
                self.invalidate_token().await;
                continue;
            }

            if !resp.status().is_success() {
                let status = resp.status();
                let body_text = resp.text().await.unwrap_or_default();
                return Err(Error::Platform(format!(
                    "get streams: HTTP {} => {}",
                    status, body_text
                )));
            }

            let body = resp.text().await?;
            return parse_streams(&body);
        }

        Err(Error::Platform("get streams: unauthorized after token refresh".into()))
    }
}

#[async_trait]
impl LiveQuery for TwitchHelixClient {
    async fn query_live(&self, ids: &[BroadcasterId]) -> Result<Vec<LiveStream>, Error> {
        let mut live = Vec::new();
        for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
            let mut found = self.fetch_chunk(chunk).await?;
            debug!("Helix reported {} of {} broadcaster(s) live", found.len(), chunk.len());
            live.append(&mut found);
        }
        Ok(live)
    }
}
