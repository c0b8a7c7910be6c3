//! Feed client tests against a mock alerts endpoint.

use std::time::Duration;

use serde_json::json;
use stormwatch_config::FeedConfig;
use stormwatch_feed::{AlertSource, FeedClient, FeedError, GEO_JSON};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALERTS_PATH: &str = "/alerts/active";

fn client_for(server: &MockServer) -> FeedClient {
    let config = FeedConfig {
        url: format!("{}{}", server.uri(), ALERTS_PATH),
        user_agent: "stormwatch-test (ops@example.com)".to_string(),
        timeout_secs: 1,
    };
    FeedClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_active_decodes_features() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ALERTS_PATH))
        .and(header("accept", GEO_JSON))
        .and(header("user-agent", "stormwatch-test (ops@example.com)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "id": "A",
                    "properties": {
                        "event": "Tornado Watch",
                        "areaDesc": "Harris, TX; Travis, TX",
                        "sent": "2024-05-01T14:01:00-05:00",
                        "expires": "2024-05-01T20:00:00-05:00",
                        "parameters": {}
                    }
                },
                {
                    "id": "B",
                    "properties": {
                        "event": "Tornado Warning",
                        "areaDesc": "Dallas, TX",
                        "sent": "2024-05-01T14:05:00-05:00",
                        "expires": "2024-05-01T14:45:00-05:00",
                        "parameters": {
                            "tornadoDetection": ["OBSERVED"],
                            "tornadoDamageThreat": ["CONSIDERABLE"]
                        }
                    }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let alerts = client_for(&server).fetch_active().await.unwrap();

    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].id, "A");
    assert_eq!(alerts[0].event_name, "Tornado Watch");
    assert_eq!(alerts[1].event, "Tornado Warning");
    assert_eq!(alerts[1].event_name, "PDS Tornado Warning");
}

#[tokio::test]
async fn test_missing_features_is_empty_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ALERTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "FeatureCollection",
            "title": "Current watches, warnings, and advisories"
        })))
        .mount(&server)
        .await;

    let alerts = client_for(&server).fetch_active().await.unwrap();
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn test_malformed_feature_does_not_fail_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ALERTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [
                { "id": "broken" },
                { "id": "ok", "properties": { "event": "Flash Flood Warning", "areaDesc": "Bexar, TX" } }
            ]
        })))
        .mount(&server)
        .await;

    let alerts = client_for(&server).fetch_active().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "ok");
}

#[tokio::test]
async fn test_service_unavailable_is_transient_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ALERTS_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_active().await.unwrap_err();
    match &err {
        FeedError::Status { status, body } => {
            assert_eq!(*status, 503);
            assert_eq!(body, "Service Unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_forbidden_is_not_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ALERTS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("missing User-Agent"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_active().await.unwrap_err();
    assert!(!err.is_transient());
    assert_eq!(err.short_message(), "HTTP 403");
}

#[tokio::test]
async fn test_html_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ALERTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_active().await.unwrap_err();
    assert!(matches!(err, FeedError::Decode(_)));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ALERTS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "features": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_active().await.unwrap_err();
    assert!(matches!(err, FeedError::Timeout(1)), "got {err:?}");
    assert!(err.is_transient());
}
