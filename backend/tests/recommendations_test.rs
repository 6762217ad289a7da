//! Integration tests for the recommendation gateway endpoint

mod common;

use axum::http::StatusCode;
use common::{complete_request_json, StubGateway, TestApp};
use rstest::rstest;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/api/v1/recommendations";

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_returns_recommendations() {
    let gateway = Arc::new(StubGateway::replying("Walk 30 minutes a day."));
    let app = TestApp::with_gateway(gateway.clone());

    let (status, body) = app.post(ENDPOINT, &complete_request_json()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({ "recommendations": "Walk 30 minutes a day." }));
    assert_eq!(gateway.call_count(), 1);

    let calls = gateway.calls.lock().unwrap();
    assert_eq!(calls[0].bmr, 1780.0);
    assert_eq!(calls[0].preferences, "vegetarian");
}

#[rstest]
#[case("bmi", "BMI")]
#[case("bodyFatPercentage", "Body Fat %")]
#[case("idealWeight", "Ideal Weight")]
#[case("bmr", "BMR")]
#[case("dailyCalorieNeeds", "Daily Calorie Needs")]
#[tokio::test]
async fn test_missing_field_is_named(#[case] field: &str, #[case] label: &str) {
    let gateway = Arc::new(StubGateway::replying("unused"));
    let app = TestApp::with_gateway(gateway.clone());

    let mut request = parse(&complete_request_json());
    request.as_object_mut().unwrap().remove(field);

    let (status, body) = app.post(ENDPOINT, &request.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = parse(&body);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains(label));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_out_of_range_value_rejected() {
    let gateway = Arc::new(StubGateway::replying("unused"));
    let app = TestApp::with_gateway(gateway.clone());

    let mut request = parse(&complete_request_json());
    request["bmr"] = json!(-5.0);

    let (status, body) = app.post(ENDPOINT, &request.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(parse(&body)["error"].is_string());
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_returns_error_body() {
    let app = TestApp::with_gateway(Arc::new(StubGateway::replying("unused")));

    let (status, body) = app.post(ENDPOINT, "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_upstream_failure_surfaces_once() {
    let gateway = Arc::new(StubGateway::failing("model crashed"));
    let app = TestApp::with_gateway(gateway.clone());

    let (status, body) = app.post(ENDPOINT, &complete_request_json()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body = parse(&body);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert!(body["error"].as_str().unwrap().contains("model crashed"));
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn test_disabled_upstream_returns_503() {
    let app = TestApp::with_ollama("http://127.0.0.1:9", false);

    let (status, body) = app.post(ENDPOINT, &complete_request_json()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(parse(&body)["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_end_to_end_with_ollama() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "test-model", "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "test-model",
            "response": "Add two strength sessions per week.",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = TestApp::with_ollama(&server.uri(), true);
    let (status, body) = app.post(ENDPOINT, &complete_request_json()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse(&body)["recommendations"],
        "Add two strength sessions per week."
    );
}

#[tokio::test]
async fn test_ollama_error_status_maps_to_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "model 'test-model' not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = TestApp::with_ollama(&server.uri(), true);
    let (status, body) = app.post(ENDPOINT, &complete_request_json()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(parse(&body)["code"], "UPSTREAM_ERROR");
}
