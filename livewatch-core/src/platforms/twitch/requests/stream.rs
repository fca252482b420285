// ========================================================
// File: livewatch-core/src/platforms/twitch/requests/stream.rs
// ========================================================
use serde::Deserialize;
use livewatch_common::models::{BroadcasterId, LiveStream};

use crate::Error;

pub const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// "Get Streams" accepts at most this many `user_id` parameters.
pub const MAX_IDS_PER_REQUEST: usize = 100;

/// Response from "Get Streams" endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamsResponse {
    pub data: Vec<StreamData>,
}

/// Single stream data record. Only the fields we use are required.
#[derive(Debug, Deserialize)]
pub struct StreamData {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    #[serde(rename = "type", default)]
    pub type_field: String, // e.g., "live"
}

impl StreamData {
    pub fn into_live_stream(self) -> Result<LiveStream, Error> {
        let id = self
            .user_id
            .parse::<BroadcasterId>()
            .map_err(|e| Error::Parse(format!("bad user_id '{}': {}", self.user_id, e)))?;
        let display_name = if self.user_name.is_empty() { self.user_login } else { self.user_name };
        Ok(LiveStream { id, display_name })
    }
}

/// Builds the "Get Streams" URL for one chunk of ids.
pub fn streams_url(base: &str, ids: &[BroadcasterId]) -> String {
    let mut url = format!("{}/streams?first={}", base.trim_end_matches('/'), MAX_IDS_PER_REQUEST);
    for id in ids {
        url.push_str("&user_id=");
        url.push_str(&id.to_string());
    }
    url
}

/// Parses a "Get Streams" body into live streams, skipping entries whose
/// `type` is present and not "live".
pub fn parse_streams(body: &str) -> Result<Vec<LiveStream>, Error> {
    let parsed: StreamsResponse = serde_json::from_str(body)
        .map_err(|e| Error::Platform(format!("streams parse error: {}", e)))?;

    parsed
        .data
        .into_iter()
        .filter(|s| s.type_field.is_empty() || s.type_field == "live")
        .map(StreamData::into_live_stream)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_lists_every_id() {
        let url = streams_url("https://api.twitch.tv/helix/", &[1, 22]);
        assert_eq!(
            url,
            "https://api.twitch.tv/helix/streams?first=100&user_id=1&user_id=22"
        );
    }

    #[test]
    fn parses_live_entries() -> Result<(), Error> {
        let body = r#"{
            "data": [
                {"id": "9", "user_id": "141981764", "user_login": "twitchdev",
                 "user_name": "TwitchDev", "type": "live", "title": "hi"},
                {"id": "10", "user_id": "5", "user_login": "rerun",
                 "user_name": "", "type": ""}
            ],
            "pagination": {}
        }"#;
        let streams = parse_streams(body)?;
        assert_eq!(
            streams,
            vec![
                LiveStream { id: 141981764, display_name: "TwitchDev".into() },
                LiveStream { id: 5, display_name: "rerun".into() },
            ]
        );
        Ok(())
    }

    #[test]
    fn rejects_non_numeric_user_id() {
        let body = r#"{"data":[{"user_id":"abc","user_login":"x","user_name":"X"}]}"#;
        assert!(parse_streams(body).is_err());
    }
}
