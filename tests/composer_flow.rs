use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use travel_guide_api::{
    composer::{Composer, ComposerView, FileSelection, HttpGatewayClient, SubmissionState},
    config::Config,
    routes::{create_router, AppState},
};

/// Serves the gateway on an ephemeral port and returns its base URL
async fn spawn_gateway(gemini: &MockServer, api_key: Option<&str>) -> String {
    let config = Config {
        gemini_api_key: api_key.map(str::to_string),
        gemini_api_url: gemini.uri(),
        gemini_model: "gemini-2.0-flash".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        max_body_bytes: 80 * 1024 * 1024,
    };
    let app = create_router(Arc::new(AppState::from_config(&config)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_round_trip_renders_cards() {
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": r#"{"recommendations":[{"title":"T","explanation":"E","activity":"A"}]}"#
                    }]
                }
            }]
        })))
        .expect(1)
        .mount(&gemini)
        .await;

    let client = HttpGatewayClient::new(spawn_gateway(&gemini, Some("test-key")).await);

    let mut composer = Composer::new();
    composer.set_city("Vilnius");
    composer
        .add_files(vec![FileSelection::new("me.jpg", "image/jpeg", b"abc".to_vec())])
        .await
        .unwrap();
    composer.submit(&client).await.unwrap();

    match composer.view() {
        ComposerView::Itinerary { heading, cards } => {
            assert_eq!(heading, "Your Personalized Vilnius Itinerary");
            assert_eq!(cards.len(), 1);
            assert_eq!(cards[0].title, "T");
            assert_eq!(cards[0].explanation, "E");
            assert_eq!(cards[0].activity, "A");
        }
        other => panic!("unexpected view: {other:?}"),
    }

    let received = gemini.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(
        sent["contents"][0]["parts"][1]["inlineData"],
        json!({ "mimeType": "image/jpeg", "data": "YWJj" })
    );
}

#[tokio::test]
async fn test_upstream_failure_surfaces_gateway_message() {
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&gemini)
        .await;

    let client = HttpGatewayClient::new(spawn_gateway(&gemini, Some("test-key")).await);

    let mut composer = Composer::new();
    composer.set_profile("Loves jazz clubs");
    composer.submit(&client).await.unwrap();

    assert_eq!(
        composer.state(),
        &SubmissionState::Failed("Failed to get recommendations.".to_string())
    );
}

#[tokio::test]
async fn test_missing_key_surfaces_configuration_message() {
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&gemini)
        .await;

    let client = HttpGatewayClient::new(spawn_gateway(&gemini, None).await);

    let mut composer = Composer::new();
    composer.set_profile("Loves jazz clubs");
    composer.submit(&client).await.unwrap();

    assert_eq!(
        composer.view(),
        ComposerView::Error("API key is not configured on the server.".to_string())
    );
}

#[tokio::test]
async fn test_unreachable_gateway_clears_loading() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpGatewayClient::new(format!("http://{}", addr));

    let mut composer = Composer::new();
    composer.set_profile("Anything");
    composer.submit(&client).await.unwrap();

    assert!(!composer.is_loading());
    assert!(matches!(composer.view(), ComposerView::Error(message) if !message.is_empty()));
}
