//! End-to-end gateway tests against a mocked HTTP bridge.

use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_service::{CredentialHeaders, Gateway, GatewayConfig, ServiceError};
use mockall::mock;
use provider_onedrive::PageItem;

mock! {
    HttpClient {}

    #[async_trait::async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

fn gateway_with(mock_http: MockHttpClient) -> Gateway {
    let config = GatewayConfig::builder()
        .graph_api_uri("https://graph.example.com/v1.0/")
        .auth_api_uri("https://login.example.com/oauth2/v2.0/")
        .client_id("client-123")
        .build()
        .unwrap();

    Gateway::new(config, Arc::new(mock_http))
}

fn headers() -> CredentialHeaders {
    CredentialHeaders {
        household_id: Some("Sonos_hh1".to_string()),
        token: "plain-access-token".to_string(),
        key: "refresh-token".to_string(),
    }
}

fn json_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

const ROOT_PAGE: &str = r#"{
    "value": [
        {"id": "t1", "name": "song.mp3", "file": {"mimeType": "audio/mpeg"},
         "audio": {"title": "Song", "artist": "Band", "duration": 200000, "track": 3}},
        {"id": "d1", "name": "Albums", "folder": {"childCount": 12}}
    ]
}"#;

#[tokio::test]
async fn get_metadata_without_credentials_is_session_invalid() {
    let gateway = gateway_with(MockHttpClient::new());

    let result = gateway.get_metadata("root", 10, 0, None, false).await;

    match result {
        Err(err) => assert_eq!(err.fault_code(), "Client.SessionIdInvalid"),
        Ok(_) => panic!("expected session error"),
    }
}

#[tokio::test]
async fn get_metadata_search_shortcut_skips_the_provider() {
    // No expectations set: any HTTP call would fail the test
    let gateway = gateway_with(MockHttpClient::new());

    let page = gateway
        .get_metadata("search", 10, 0, Some(&headers()), false)
        .await
        .unwrap();

    assert_eq!(page.count, 1);
    assert_eq!(page.total, 1);
    match &page.items[0] {
        PageItem::Collection(entry) => {
            assert_eq!(entry.id, "files");
            assert_eq!(entry.title, "Files");
            assert_eq!(entry.item_type, "search");
            assert!(!entry.can_play);
        }
        other => panic!("expected collection entry, got {:?}", other),
    }
}

#[tokio::test]
async fn get_metadata_lists_root_with_bearer_token() {
    let mut mock_http = MockHttpClient::new();
    mock_http.expect_execute().times(1).returning(|request| {
        assert!(request.url.contains("/me/drive/root/children"));
        assert_eq!(
            request.headers.get("Authorization"),
            Some(&"Bearer plain-access-token".to_string())
        );
        Ok(json_response(200, ROOT_PAGE))
    });

    let gateway = gateway_with(mock_http);
    let page = gateway
        .get_metadata("root", 10, 0, Some(&headers()), false)
        .await
        .unwrap();

    assert_eq!(page.index, 0);
    assert_eq!(page.count, 2);
    assert!(matches!(&page.items[0], PageItem::Track(m) if m.id == "audio:t1"));
    assert!(matches!(&page.items[1], PageItem::Collection(c) if c.id == "folder:d1"));
}

#[tokio::test]
async fn compact_tokens_are_expanded_before_the_provider_call() {
    let jwt = format!(
        "{}.{}.signature",
        STANDARD_NO_PAD.encode(r#"{"alg":"RS256"}"#),
        STANDARD_NO_PAD.encode(r#"{"sub":"user"}"#)
    );
    let compact = format!("{}###{}###signature", r#"{"alg":"RS256"}"#, r#"{"sub":"user"}"#);

    let expected = format!("Bearer {jwt}");
    let mut mock_http = MockHttpClient::new();
    mock_http.expect_execute().times(1).returning(move |request| {
        assert_eq!(request.headers.get("Authorization"), Some(&expected));
        Ok(json_response(200, r#"{"value": []}"#))
    });

    let gateway = gateway_with(mock_http);
    let compact_headers = CredentialHeaders {
        household_id: Some("Sonos_hh1".to_string()),
        token: compact,
        key: "refresh-token".to_string(),
    };

    gateway
        .get_metadata("root", 10, 0, Some(&compact_headers), false)
        .await
        .unwrap();
}

#[tokio::test]
async fn get_media_uri_strips_audio_prefix() {
    let mut mock_http = MockHttpClient::new();
    mock_http.expect_execute().times(1).returning(|request| {
        assert!(request.url.contains("/me/drive/items/t1"));
        assert!(!request.url.contains("audio:"));
        Ok(json_response(
            200,
            r#"{"id": "t1", "name": "song.mp3", "file": {"mimeType": "audio/mpeg"},
                "audio": {}, "@microsoft.graph.downloadUrl": "https://dl.example/song.mp3"}"#,
        ))
    });

    let gateway = gateway_with(mock_http);
    let uri = gateway
        .get_media_uri("audio:t1", Some(&headers()))
        .await
        .unwrap();

    assert_eq!(uri, "https://dl.example/song.mp3");
}

#[tokio::test]
async fn get_media_uri_without_download_link_is_not_found() {
    let mut mock_http = MockHttpClient::new();
    mock_http.expect_execute().times(1).returning(|_| {
        Ok(json_response(
            200,
            r#"{"id": "t1", "name": "song.mp3", "file": {}, "audio": {}}"#,
        ))
    });

    let gateway = gateway_with(mock_http);
    let result = gateway.get_media_uri("audio:t1", Some(&headers())).await;

    match result {
        Err(err) => assert_eq!(err.fault_code(), "Client.ItemNotFound"),
        Ok(uri) => panic!("expected not-found, got {uri}"),
    }
}

#[tokio::test]
async fn get_media_metadata_keeps_raw_item_id() {
    let mut mock_http = MockHttpClient::new();
    mock_http.expect_execute().times(1).returning(|_| {
        Ok(json_response(
            200,
            r#"{"id": "t1", "name": "song.mp3", "file": {"mimeType": "audio/mpeg"},
                "audio": {"title": "Song", "artist": "Band", "duration": 215999, "track": 3}}"#,
        ))
    });

    let gateway = gateway_with(mock_http);
    let metadata = gateway
        .get_media_metadata("t1", Some(&headers()))
        .await
        .unwrap();

    assert_eq!(metadata.id, "t1");
    assert_eq!(metadata.item_type, "track");
    assert_eq!(metadata.display_type, "audio");
    assert_eq!(metadata.title, "Song");
    assert_eq!(metadata.artist.as_deref(), Some("Band"));
    assert_eq!(metadata.duration_seconds, 215);
    assert_eq!(metadata.track_number, 3);
}

#[tokio::test]
async fn expired_token_maps_to_refresh_required_fault() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .returning(|_| Ok(json_response(401, r#"{"error": "InvalidAuthenticationToken"}"#)));

    let gateway = gateway_with(mock_http);
    let result = gateway.get_last_update(Some(&headers())).await;

    match result {
        Err(err) => assert_eq!(err.fault_code(), "Client.TokenRefreshRequired"),
        Ok(_) => panic!("expected refresh-required error"),
    }
}

#[tokio::test]
async fn get_device_link_code_round_trip() {
    let mut mock_http = MockHttpClient::new();
    mock_http.expect_execute().times(1).returning(|request| {
        assert!(request.url.ends_with("devicecode"));
        Ok(json_response(
            200,
            r#"{"user_code": "ABCD1234", "verification_uri": "https://example.com/link",
                "device_code": "opaque-device-code"}"#,
        ))
    });

    let gateway = gateway_with(mock_http);
    let code = gateway
        .get_device_link_code("Sonos_hh1", false)
        .await
        .unwrap();

    assert_eq!(code.link_code, "ABCD1234");
    assert_eq!(code.link_device_id, "opaque-device-code");
    assert!(code.show_link_code);
}

#[tokio::test]
async fn pending_link_maps_to_retry_fault() {
    let mut mock_http = MockHttpClient::new();
    mock_http.expect_execute().times(1).returning(|_| {
        Ok(json_response(
            400,
            r#"{"error": "authorization_pending", "error_description": "waiting"}"#,
        ))
    });

    let gateway = gateway_with(mock_http);
    let result = gateway.get_device_auth_token("Sonos_hh1", "dc").await;

    match result {
        Err(err) => assert_eq!(err.fault_code(), "Client.NOT_LINKED_RETRY"),
        Ok(_) => panic!("expected pending error"),
    }
}

#[tokio::test]
async fn refresh_auth_token_returns_bundle_without_household() {
    let mut mock_http = MockHttpClient::new();
    mock_http.expect_execute().times(1).returning(|request| {
        assert!(request.url.ends_with("token"));
        let body = String::from_utf8(request.body.clone().unwrap().to_vec()).unwrap();
        assert!(body.contains("grant_type=refresh_token"));
        assert!(body.contains("refresh_token=refresh-token"));
        Ok(json_response(
            200,
            r#"{"access_token": "fresh-access", "refresh_token": "fresh-refresh"}"#,
        ))
    });

    let gateway = gateway_with(mock_http);
    let bundle = gateway
        .refresh_auth_token(Some(&headers()), false)
        .await
        .unwrap();

    assert_eq!(bundle.household_id, None);
    assert_eq!(bundle.access_token, "fresh-access");
    assert_eq!(bundle.refresh_token, "fresh-refresh");
}

#[tokio::test]
async fn refresh_auth_token_requires_credentials() {
    let gateway = gateway_with(MockHttpClient::new());

    let result = gateway.refresh_auth_token(None, false).await;
    assert!(matches!(result, Err(ServiceError::SessionInvalid)));
}
