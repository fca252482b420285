// tests/helix_client_tests.rs
//
// TwitchHelixClient against a local mock of the token and Helix endpoints.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use livewatch_common::models::BroadcasterId;
use livewatch_core::config::TwitchConfig;
use livewatch_core::platforms::LiveQuery;
use livewatch_core::platforms::twitch::TwitchHelixClient;

fn client_for(server: &MockServer) -> TwitchHelixClient {
    let config = TwitchConfig {
        client_id: "test-client".into(),
        client_secret: "test-secret".into(),
    };
    TwitchHelixClient::with_endpoints(
        config,
        &format!("{}/helix", server.uri()),
        &format!("{}/oauth2/token", server.uri()),
    )
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "app-token",
            "expires_in": 3600,
            "token_type": "bearer"
        })))
        .mount(server)
        .await;
}

fn streams_body(live: &[BroadcasterId]) -> serde_json::Value {
    let data: Vec<_> = live
        .iter()
        .map(|id| {
            json!({
                "user_id": id.to_string(),
                "user_login": format!("streamer{}", id),
                "user_name": format!("Streamer{}", id),
                "type": "live"
            })
        })
        .collect();
    json!({ "data": data, "pagination": {} })
}

async fn requests_to(server: &MockServer, request_path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == request_path)
        .collect()
}

#[tokio::test]
async fn ids_are_split_into_chunks_of_one_hundred() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/helix/streams"))
        .and(query_param("user_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body(&[7])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/helix/streams"))
        .and(query_param("user_id", "120"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body(&[120])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ids: Vec<BroadcasterId> = (1..=150).collect();
    let mut live = client.query_live(&ids).await.expect("query succeeds");
    live.sort_by_key(|s| s.id);

    assert_eq!(live.len(), 2);
    assert_eq!(live[0].id, 7);
    assert_eq!(live[0].display_name, "Streamer7");
    assert_eq!(live[1].id, 120);

    let stream_calls = requests_to(&server, "/helix/streams").await;
    assert_eq!(stream_calls.len(), 2);
    let per_call: Vec<usize> = stream_calls
        .iter()
        .map(|r| r.url.query_pairs().filter(|(k, _)| k == "user_id").count())
        .collect();
    assert_eq!(per_call, vec![100, 50]);

    // One token serves both chunks.
    assert_eq!(requests_to(&server, "/oauth2/token").await.len(), 1);
}

#[tokio::test]
async fn requests_carry_client_id_and_bearer_token() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/helix/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body(&[])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let live = client.query_live(&[1, 2]).await.expect("query succeeds");
    assert!(live.is_empty());

    let calls = requests_to(&server, "/helix/streams").await;
    assert_eq!(calls.len(), 1);
    let headers = &calls[0].headers;
    assert_eq!(headers.get("Client-Id").unwrap().to_str().unwrap(), "test-client");
    assert_eq!(headers.get("Authorization").unwrap().to_str().unwrap(), "Bearer app-token");
}

#[tokio::test]
async fn unauthorized_refreshes_token_and_retries_once() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/helix/streams"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/helix/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body(&[3])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let live = client.query_live(&[1, 2, 3]).await.expect("retry succeeds");

    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, 3);
    assert_eq!(requests_to(&server, "/helix/streams").await.len(), 2);
    assert_eq!(requests_to(&server, "/oauth2/token").await.len(), 2);
}

#[tokio::test]
async fn repeated_unauthorized_fails_after_one_retry() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/helix/streams"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.query_live(&[1]).await;

    assert!(result.is_err());
    assert_eq!(requests_to(&server, "/helix/streams").await.len(), 2);
}

#[tokio::test]
async fn failing_chunk_fails_whole_query() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/helix/streams"))
        .and(query_param("user_id", "150"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream broke"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/helix/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body(&[5])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ids: Vec<BroadcasterId> = (1..=150).collect();
    let result = client.query_live(&ids).await;

    // The first chunk reported a live stream, but a partial answer is no answer.
    assert!(result.is_err(), "expected failure, got {:?}", result);
    assert_eq!(requests_to(&server, "/helix/streams").await.len(), 2);
}

#[tokio::test]
async fn token_failure_fails_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid client"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.query_live(&[1]).await.is_err());
    assert!(requests_to(&server, "/helix/streams").await.is_empty());
}
