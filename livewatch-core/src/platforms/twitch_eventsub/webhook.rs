// File: livewatch-core/src/platforms/twitch_eventsub/webhook.rs
//
// Inbound EventSub webhook endpoint: POST /webhook/{broadcaster_id}.
// Every request is handled on its own; nothing is kept between requests
// except what is in the store.

use std::sync::Arc;
use axum::{
    Router,
    routing::post,
    extract::{Path, State},
    body::Bytes,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use livewatch_common::models::StatusObservation;
use livewatch_common::traits::repository_traits::BroadcasterRepository;

use crate::services::status_merge;
use super::events::{
    decode_event, ChallengeRequest, EventKind, EventSubEvent, MessageType, NotificationEnvelope,
    RevocationEnvelope, MESSAGE_TYPE_HEADER,
};

/// What the gateway wants sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookReply {
    /// 200 with the challenge as the raw body.
    Challenge(String),
    /// 200 with an empty body.
    Accepted,
    /// 400 with an empty body.
    BadRequest,
    /// 500; the platform will redeliver.
    StoreFailure,
}

impl IntoResponse for WebhookReply {
    fn into_response(self) -> Response {
        match self {
            WebhookReply::Challenge(challenge) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain")],
                challenge,
            )
                .into_response(),
            WebhookReply::Accepted => StatusCode::OK.into_response(),
            WebhookReply::BadRequest => StatusCode::BAD_REQUEST.into_response(),
            WebhookReply::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Verifies subscriptions and applies stream online/offline events.
pub struct WebhookGateway {
    repo: Arc<dyn BroadcasterRepository>,
}

impl WebhookGateway {
    pub fn new(repo: Arc<dyn BroadcasterRepository>) -> Self {
        Self { repo }
    }

    /// Dispatches on the message type header. Never panics on bad input.
    pub async fn handle(&self, message_type: Option<&str>, body: &[u8]) -> WebhookReply {
        let Some(raw_type) = message_type else {
            info!("Webhook request without {} header", MESSAGE_TYPE_HEADER);
            return WebhookReply::BadRequest;
        };

        match MessageType::from_header(raw_type) {
            MessageType::Verification => self.verify(body),
            MessageType::Notification => self.notification(body).await,
            MessageType::Revocation => {
                match serde_json::from_slice::<RevocationEnvelope>(body) {
                    Ok(rev) => warn!(
                        "Webhook revoked! type={} status={} id={}; need to recheck all webhooks",
                        rev.subscription.sub_type, rev.subscription.status, rev.subscription.id
                    ),
                    Err(_) => warn!("Webhook revoked! Need to recheck all webhooks"),
                }
                // TODO: answer 200 once revocations trigger a resubscribe.
                WebhookReply::BadRequest
            }
            MessageType::Unknown(other) => {
                info!("Unknown message type: {}", other);
                WebhookReply::BadRequest
            }
        }
    }

    fn verify(&self, body: &[u8]) -> WebhookReply {
        let request: ChallengeRequest = match serde_json::from_slice(body) {
            Ok(r) => r,
            Err(e) => {
                error!("Cannot parse json webhook verification: {}", e);
                return WebhookReply::BadRequest;
            }
        };

        match request.challenge {
            Some(challenge) if !challenge.is_empty() => {
                info!(
                    "Accept webhook challenge for broadcaster id {} for type {}",
                    request.subscription.condition.target().unwrap_or("<none>"),
                    request.subscription.sub_type
                );
                WebhookReply::Challenge(challenge)
            }
            _ => WebhookReply::BadRequest,
        }
    }

    async fn notification(&self, body: &[u8]) -> WebhookReply {
        let envelope: NotificationEnvelope = match serde_json::from_slice(body) {
            Ok(e) => e,
            Err(e) => {
                error!("Cannot parse json webhook notification: {}", e);
                return WebhookReply::BadRequest;
            }
        };

        let Some(kind) = EventKind::from_subscription_type(&envelope.subscription.sub_type) else {
            debug!("Ignoring notification of type {}", envelope.subscription.sub_type);
            return WebhookReply::Accepted;
        };

        let event = match decode_event(kind, &envelope.event) {
            Ok(event) => event,
            Err(e) => {
                error!("Cannot parse webhook notification content: {}", e);
                return WebhookReply::BadRequest;
            }
        };

        self.apply(event).await
    }

    async fn apply(&self, event: EventSubEvent) -> WebhookReply {
        let id = event.broadcaster_id();
        match &event {
            EventSubEvent::StreamOnline(_) => info!("Broadcaster {}({}) went online", event.display_name(), id),
            EventSubEvent::StreamOffline(_) => info!("Broadcaster {}({}) went offline", event.display_name(), id),
        }

        let current = match self.repo.get_by_id(id).await {
            Ok(Some(b)) => b,
            Ok(None) => {
                debug!("Broadcaster {} is not tracked; ignoring event", id);
                return WebhookReply::Accepted;
            }
            Err(e) => {
                error!("Failed to load broadcaster {}: {}", id, e);
                return WebhookReply::StoreFailure;
            }
        };

        let observation = StatusObservation::webhook(id, event.status(), event.display_name());
        match status_merge::commit(self.repo.as_ref(), &current, &observation).await {
            Ok(_) => WebhookReply::Accepted,
            Err(e) => {
                error!("Failed to store status for broadcaster {}: {}", id, e);
                WebhookReply::StoreFailure
            }
        }
    }
}

/// Builds the router serving `POST /webhook/{broadcaster_id}`.
pub fn webhook_router(gateway: Arc<WebhookGateway>) -> Router {
    Router::new()
        .route("/webhook/{broadcaster_id}", post(handle_webhook))
        .with_state(gateway)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

fn is_positive_integer(segment: &str) -> bool {
    !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && segment.bytes().any(|b| b != b'0')
}

async fn handle_webhook(
    State(gateway): State<Arc<WebhookGateway>>,
    Path(broadcaster_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Only positive integers are routed. The id is not checked against the body.
    if !is_positive_integer(&broadcaster_id) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let message_type = headers
        .get(MESSAGE_TYPE_HEADER)
        .and_then(|v| v.to_str().ok());

    debug!(
        "Webhook request on /webhook/{} type={}",
        broadcaster_id,
        message_type.unwrap_or("<missing>")
    );
    gateway.handle(message_type, &body).await.into_response()
}
