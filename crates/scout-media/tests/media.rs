//! Integration tests for `MediaAdapter` using wiremock HTTP mocks for both
//! object storage and the vision model.

use std::sync::Arc;

use scout_core::{AdapterError, MediaEnrichment};
use scout_media::{MediaAdapter, StorageClient};
use scout_oracle::{ChatClient, ClientPool, ParitySelector};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG: [u8; 4] = [0x89, 0x50, 0x4e, 0x47];

fn adapter(storage_uri: &str, oracle_uri: &str) -> MediaAdapter {
    let storage = StorageClient::new(storage_uri, "service-key", 30, "scout-test")
        .expect("storage client");
    let pool = ClientPool::new(
        vec![ChatClient::with_base_url("vision-key", 30, "scout-test", oracle_uri)
            .expect("chat client")],
        Arc::new(ParitySelector),
    )
    .expect("pool");
    MediaAdapter::new(storage, Arc::new(pool), "vision-model", "influencers")
}

#[tokio::test]
async fn fetch_avatar_returns_raw_bytes() {
    let storage = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/object/influencers/alice_avatar.png"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG.to_vec()))
        .expect(1)
        .mount(&storage)
        .await;

    let media = adapter(&storage.uri(), "http://127.0.0.1:9");
    let bytes = media.fetch_avatar("alice").await.expect("avatar");

    assert_eq!(bytes, PNG.to_vec());
}

#[tokio::test]
async fn missing_asset_is_asset_not_found() {
    let storage = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/object/influencers/ghost_avatar.png"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "statusCode": "404",
            "error": "not_found",
            "message": "Object not found"
        })))
        .mount(&storage)
        .await;

    let media = adapter(&storage.uri(), "http://127.0.0.1:9");
    let err = media.fetch_avatar("ghost").await.unwrap_err();

    assert_eq!(
        err,
        AdapterError::AssetNotFound {
            collection: "influencers".to_string(),
            key: "ghost_avatar.png".to_string(),
        }
    );
}

#[tokio::test]
async fn storage_server_error_is_store_unavailable() {
    let storage = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&storage)
        .await;

    let media = adapter(&storage.uri(), "http://127.0.0.1:9");
    let err = media
        .fetch_binary_asset("influencers", "alice.png")
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::StoreUnavailable(_)));
}

#[tokio::test]
async fn describe_feed_image_pairs_description_with_screenshot() {
    let storage = MockServer::start().await;
    let oracle = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/object/influencers/alice.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG.to_vec()))
        .expect(1)
        .mount(&storage)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer vision-key"))
        .and(body_string_contains("screenshot of a social media influencer's feed"))
        .and(body_string_contains("data:image/png;base64,iVBORw=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Warm, minimalist skincare shots." } }
            ]
        })))
        .expect(1)
        .mount(&oracle)
        .await;

    let media = adapter(&storage.uri(), &oracle.uri());
    let summary = media.describe_feed_image("alice").await.expect("summary");

    assert_eq!(summary.description, "Warm, minimalist skincare shots.");
    assert_eq!(summary.image, PNG.to_vec());
}

#[tokio::test]
async fn describe_feed_image_without_screenshot_skips_vision_call() {
    let storage = MockServer::start().await;
    let oracle = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&storage)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&oracle)
        .await;

    let media = adapter(&storage.uri(), &oracle.uri());
    let err = media.describe_feed_image("alice").await.unwrap_err();

    assert!(matches!(err, AdapterError::AssetNotFound { .. }));
}

#[tokio::test]
async fn vision_failure_is_upstream_error() {
    let storage = MockServer::start().await;
    let oracle = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG.to_vec()))
        .mount(&storage)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&oracle)
        .await;

    let media = adapter(&storage.uri(), &oracle.uri());
    let err = media.describe_feed_image("alice").await.unwrap_err();

    assert!(matches!(err, AdapterError::RankingUpstream(_)));
}
