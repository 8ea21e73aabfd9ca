#![allow(clippy::unwrap_used)]
// Integration tests for `DeviceClient` using wiremock and a local WebSocket server.

use futures_util::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opdi_api::models::{ApConfigUpdate, ConnectRequest, ProfileCreate};
use opdi_api::{DeviceClient, Error, endpoints};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DeviceClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Polling ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_status_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(endpoints::STA_STATUS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "STA_CONNECTED",
            "ip": "10.0.0.5",
            "gw": "10.0.0.1",
            "rssi": -40
        })))
        .mount(&server)
        .await;

    let body = client.get_json(endpoints::STA_STATUS).await.unwrap();
    assert_eq!(body["ip"], "10.0.0.5");
}

#[tokio::test]
async fn test_http_error_is_classified() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(endpoints::SCAN))
        .respond_with(ResponseTemplate::new(500).set_body_string("scan busy"))
        .mount(&server)
        .await;

    let result = client.get_json(endpoints::SCAN).await;
    match result {
        Err(Error::HttpStatus { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "scan busy");
        }
        other => panic!("expected HttpStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(endpoints::METRICS))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"attempts\":"))
        .mount(&server)
        .await;

    let result = client.get_json(endpoints::METRICS).await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DeviceClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://{addr}")).unwrap(),
    );
    let result = client.get_json(endpoints::STA_STATUS).await;
    assert!(
        matches!(result, Err(Error::Network(_))),
        "expected Network error, got: {result:?}"
    );
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_profile_posts_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(endpoints::STA_PROFILES))
        .and(body_json(json!({ "ssid": "HomeNet", "psk": "hunter22", "hidden": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .add_profile(&ProfileCreate {
            ssid: "HomeNet".into(),
            psk: Some("hunter22".into()),
            hidden: false,
        })
        .await
        .unwrap();
    assert_eq!(resp, json!({ "ok": true }));
}

#[tokio::test]
async fn test_delete_profile_strips_ellipsis() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/net/sta/profiles/a1b2c3d4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_profile("a1b2c3d4...").await.unwrap();
}

#[tokio::test]
async fn test_delete_unknown_profile_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client.delete_profile("deadbeef").await.unwrap_err();
    assert!(
        matches!(err, Error::HttpStatus { status: 404, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_connect_without_ssid_sends_empty_object() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(endpoints::STA_CONNECT))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.connect(&ConnectRequest::default()).await.unwrap();
}

#[tokio::test]
async fn test_set_ap_config_returns_applied_values() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(endpoints::AP_CONFIG))
        .and(body_json(json!({ "ssid": "Guest", "channel": 11 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "ssid": "Guest", "channel": 11
        })))
        .mount(&server)
        .await;

    let resp = client
        .set_ap_config(&ApConfigUpdate {
            ssid: Some("Guest".into()),
            channel: Some(11),
        })
        .await
        .unwrap();
    assert_eq!(resp["channel"], 11);
}

#[tokio::test]
async fn test_empty_command_response_is_null() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(endpoints::STA_CONNECT))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let resp = client.connect(&ConnectRequest::default()).await.unwrap();
    assert!(resp.is_null());
}

#[tokio::test]
async fn test_camera_snapshot_bytes() {
    let (server, client) = setup().await;
    let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    Mock::given(method("GET"))
        .and(path(endpoints::CAM_SNAPSHOT))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(jpeg.clone()),
        )
        .mount(&server)
        .await;

    let bytes = client.camera_snapshot().await.unwrap();
    assert_eq!(bytes.as_ref(), jpeg.as_slice());
}

// ── Event stream ────────────────────────────────────────────────────

#[tokio::test]
async fn test_stream_yields_text_frames_then_ends_on_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        ws.send(Message::text(r#"{"type":"net","sub":"ap_active"}"#))
            .await
            .unwrap();
        ws.send(Message::text("wifi: legacy text line")).await.unwrap();
        ws.close(None).await.unwrap();
    });

    let client = DeviceClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://{addr}")).unwrap(),
    );
    let frames: Vec<_> = client.open_stream().await.unwrap().collect().await;

    assert_eq!(frames.len(), 2);
    assert_eq!(
        frames[0].as_deref().unwrap(),
        r#"{"type":"net","sub":"ap_active"}"#
    );
    assert_eq!(frames[1].as_deref().unwrap(), "wifi: legacy text line");
    server.await.unwrap();
}

#[tokio::test]
async fn test_stream_handshake_failure() {
    let (_server, client) = setup().await;

    // wiremock answers the upgrade with a plain 404
    let result = client.open_stream().await;
    assert!(
        matches!(result, Err(Error::WebSocketConnect(_))),
        "expected WebSocketConnect error"
    );
}
