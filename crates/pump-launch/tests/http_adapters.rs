//! HTTP adapters against a local mock server.

use std::time::Duration;

use chain_sol::Pubkey;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pump_launch::*;

const WALLET: &str = "3P8DRyUSauz4yDfNrANMog1xHa2FL1n4Pr5puQSVQFNL";

fn config_for(server: &MockServer) -> DeployConfig {
    DeployConfig::builder()
        .rpc_url(server.uri())
        .metadata_url(format!("{}/api/ipfs", server.uri()))
        .request_timeout(Duration::from_secs(5))
        .build()
}

fn metadata() -> TokenMetadata {
    TokenMetadata {
        name: "Doge Coin".into(),
        symbol: "DOGE".into(),
        description: "such wow".into(),
        image_url: None,
        socials: SocialLinks::default(),
    }
}

// ─── JSON-RPC ──────────────────────────────────────────────────────

#[tokio::test]
async fn get_balance_reads_context_value() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": "getBalance",
            "params": [WALLET, { "commitment": "confirmed" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "context": { "slot": 1 }, "value": 50_000_000u64 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rpc = HttpRpcClient::new(&config_for(&server)).unwrap();
    let wallet: Pubkey = WALLET.parse().unwrap();
    let balance = rpc.get_balance(&wallet, Commitment::Confirmed).await.unwrap();
    assert_eq!(balance, 50_000_000);
}

#[tokio::test]
async fn latest_blockhash_is_decoded_from_base58() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "getLatestBlockhash",
            "params": [{ "commitment": "finalized" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "context": { "slot": 1 },
                "value": { "blockhash": WALLET, "lastValidBlockHeight": 3090 }
            }
        })))
        .mount(&server)
        .await;

    let rpc = HttpRpcClient::new(&config_for(&server)).unwrap();
    let latest = rpc.get_latest_blockhash(Commitment::Finalized).await.unwrap();

    let expected: Pubkey = WALLET.parse().unwrap();
    assert_eq!(latest.blockhash, expected.to_bytes());
    assert_eq!(latest.last_valid_block_height, 3090);
}

#[tokio::test]
async fn send_transaction_posts_base64_with_preflight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "sendTransaction",
            "params": ["AQID", { "encoding": "base64", "preflightCommitment": "confirmed" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW"
        })))
        .mount(&server)
        .await;

    let rpc = HttpRpcClient::new(&config_for(&server)).unwrap();
    let signature = rpc
        .send_transaction(&[1, 2, 3], Commitment::Confirmed)
        .await
        .unwrap();
    assert!(signature.starts_with("5VERv8"));
}

#[tokio::test]
async fn send_transaction_rpc_error_is_submission_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32002, "message": "Blockhash not found" }
        })))
        .mount(&server)
        .await;

    let rpc = HttpRpcClient::new(&config_for(&server)).unwrap();
    let err = rpc
        .send_transaction(&[1, 2, 3], Commitment::Confirmed)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "SUBMISSION_FAILED");
    assert!(err.is_retryable_from_scratch());
    assert!(err.to_string().contains("Blockhash not found"));
}

#[tokio::test]
async fn send_transaction_timeout_leaves_outcome_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "sendTransaction" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": "sig" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = DeployConfig::builder()
        .rpc_url(server.uri())
        .request_timeout(Duration::from_millis(200))
        .build();
    let rpc = HttpRpcClient::new(&config).unwrap();
    let err = rpc
        .send_transaction(&[1, 2, 3], Commitment::Confirmed)
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::SubmissionOutcomeUnknown(_)));
    assert_eq!(err.code(), "SUBMISSION_OUTCOME_UNKNOWN");
    assert!(!err.is_retryable_from_scratch());
}

#[tokio::test]
async fn send_transaction_http_error_leaves_outcome_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let rpc = HttpRpcClient::new(&config_for(&server)).unwrap();
    let err = rpc
        .send_transaction(&[1, 2, 3], Commitment::Confirmed)
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::SubmissionOutcomeUnknown(_)));
    assert!(!err.is_retryable_from_scratch());
}

#[tokio::test]
async fn http_error_status_is_rpc_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let rpc = HttpRpcClient::new(&config_for(&server)).unwrap();
    let err = rpc
        .get_latest_blockhash(Commitment::Finalized)
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Rpc(_)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn signature_status_unknown_and_known() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "getSignatureStatuses",
            "params": [["unknown"], { "searchTransactionHistory": false }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "context": { "slot": 5 }, "value": [null] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "getSignatureStatuses",
            "params": [["known"], { "searchTransactionHistory": true }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "context": { "slot": 5 },
                "value": [{
                    "slot": 4,
                    "confirmations": null,
                    "err": null,
                    "confirmationStatus": "finalized"
                }]
            }
        })))
        .mount(&server)
        .await;

    let rpc = HttpRpcClient::new(&config_for(&server)).unwrap();

    assert!(rpc.get_signature_status("unknown", false).await.unwrap().is_none());

    let status = rpc.get_signature_status("known", true).await.unwrap().unwrap();
    assert_eq!(status.slot, 4);
    assert!(status.has_reached(Commitment::Confirmed));
}

// ─── Metadata upload ───────────────────────────────────────────────

#[tokio::test]
async fn publish_sends_form_fields_and_returns_uri() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ipfs"))
        .and(body_string_contains("name=\"symbol\""))
        .and(body_string_contains("name=\"showName\""))
        .and(body_string_contains("name=\"twitter\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadataUri": "https://ipfs.io/ipfs/QmMeta"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = HttpMetadataPublisher::new(&config_for(&server)).unwrap();
    let mut meta = metadata();
    meta.socials.twitter = Some("https://x.com/doge".into());

    let uri = publisher.publish(&meta).await.unwrap();
    assert_eq!(uri, "https://ipfs.io/ipfs/QmMeta");
}

#[tokio::test]
async fn publish_attaches_fetched_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(b"fake-jpeg-bytes".to_vec()),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ipfs"))
        .and(body_string_contains("filename=\"image.png\""))
        .and(body_string_contains("image/jpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadataUri": "https://ipfs.io/ipfs/QmWithImage"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = HttpMetadataPublisher::new(&config_for(&server)).unwrap();
    let mut meta = metadata();
    meta.image_url = Some(format!("{}/logo", server.uri()));

    let uri = publisher.publish(&meta).await.unwrap();
    assert_eq!(uri, "https://ipfs.io/ipfs/QmWithImage");
}

#[tokio::test]
async fn failed_image_fetch_still_uploads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ipfs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadataUri": "https://ipfs.io/ipfs/QmNoImage"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = HttpMetadataPublisher::new(&config_for(&server)).unwrap();
    let mut meta = metadata();
    meta.image_url = Some(format!("{}/missing.png", server.uri()));

    let uri = publisher.publish(&meta).await.unwrap();
    assert_eq!(uri, "https://ipfs.io/ipfs/QmNoImage");
}

#[tokio::test]
async fn oversized_image_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/huge.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![b'x'; 64]),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ipfs"))
        .and(body_string_contains("filename=\"image.png\""))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ipfs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadataUri": "https://ipfs.io/ipfs/QmNoImage"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = DeployConfig::builder()
        .metadata_url(format!("{}/api/ipfs", server.uri()))
        .max_image_bytes(16)
        .build();
    let publisher = HttpMetadataPublisher::new(&config).unwrap();
    let mut meta = metadata();
    meta.image_url = Some(format!("{}/huge.png", server.uri()));

    let uri = publisher.publish(&meta).await.unwrap();
    assert_eq!(uri, "https://ipfs.io/ipfs/QmNoImage");
}

#[tokio::test]
async fn unparseable_image_content_type_falls_back_to_png() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "not a mime type")
                .set_body_bytes(b"fake-png-bytes".to_vec()),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ipfs"))
        .and(body_string_contains("filename=\"image.png\""))
        .and(body_string_contains("image/png"))
        .and(body_string_contains("fake-png-bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadataUri": "https://ipfs.io/ipfs/QmPng"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = HttpMetadataPublisher::new(&config_for(&server)).unwrap();
    let mut meta = metadata();
    meta.image_url = Some(format!("{}/logo", server.uri()));

    let uri = publisher.publish(&meta).await.unwrap();
    assert_eq!(uri, "https://ipfs.io/ipfs/QmPng");
}

#[tokio::test]
async fn upload_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ipfs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let publisher = HttpMetadataPublisher::new(&config_for(&server)).unwrap();
    let err = publisher.publish(&metadata()).await.unwrap_err();

    assert!(matches!(err, DeployError::MetadataUploadFailed { status: 500 }));
    assert_eq!(err.to_string(), "metadata upload failed: HTTP 500");
}

#[tokio::test]
async fn response_without_uri_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ipfs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let publisher = HttpMetadataPublisher::new(&config_for(&server)).unwrap();
    let err = publisher.publish(&metadata()).await.unwrap_err();

    assert!(matches!(err, DeployError::MetadataDecode(_)));
}
