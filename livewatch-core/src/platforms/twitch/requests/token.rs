// App access token via the OAuth client-credentials grant.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::Error;

pub const TWITCH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Tokens are treated as expired this long before Twitch says so.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct AppAccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AppAccessToken {
    pub fn is_fresh(&self) -> bool {
        self.expires_at - Utc::now() > Duration::seconds(EXPIRY_MARGIN_SECS)
    }
}

pub async fn fetch_app_access_token(
    http: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AppAccessToken, Error> {
    let resp = http
        .post(token_url)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ])
        .send()
        .await
        .map_err(|e| Error::Platform(format!("token request network error: {}", e)))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body_text = resp.text().await.unwrap_or_default();
        return Err(Error::Platform(format!(
            "token request: HTTP {} => {}",
            status, body_text
        )));
    }

    let body = resp.text().await?;
    let parsed: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| Error::Platform(format!("token response parse error: {}", e)))?;

    debug!("Obtained app access token, expires in {} s", parsed.expires_in);
    Ok(AppAccessToken {
        access_token: parsed.access_token,
        expires_at: Utc::now() + Duration::seconds(parsed.expires_in),
    })
}
