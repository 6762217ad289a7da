//! Common test utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use health_calculators_backend::{
    config::{AiConfig, AppConfig, ServerConfig},
    routes,
    services::{OllamaGateway, RecommendationGateway},
    state::AppState,
};
use health_calculators_shared::{GatewayError, RecommendationSnapshot};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Gateway returning a canned reply and recording what it was asked
pub struct StubGateway {
    reply: Result<String, String>,
    pub calls: Mutex<Vec<RecommendationSnapshot>>,
}

impl StubGateway {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RecommendationGateway for StubGateway {
    async fn recommend(&self, snapshot: &RecommendationSnapshot) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(snapshot.clone());
        self.reply.clone().map_err(GatewayError::Upstream)
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
}

impl TestApp {
    /// Router backed by the given gateway
    pub fn with_gateway(gateway: Arc<dyn RecommendationGateway>) -> Self {
        let state = AppState::new(test_config(false, "http://127.0.0.1:9"), gateway, metrics_handle());
        Self {
            app: routes::create_router(state),
        }
    }

    /// Router backed by a real Ollama gateway pointed at `url`
    pub fn with_ollama(url: &str, enabled: bool) -> Self {
        let config = test_config(enabled, url);
        let gateway = Arc::new(OllamaGateway::new(config.ai.clone()).unwrap());
        let state = AppState::new(config, gateway, metrics_handle());
        Self {
            app: routes::create_router(state),
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

/// A recorder that is never installed globally, so tests stay independent
fn metrics_handle() -> metrics_exporter_prometheus::PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

fn test_config(enabled: bool, ollama_url: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        ai: AiConfig {
            enabled,
            ollama_url: ollama_url.to_string(),
            model: "test-model".to_string(),
            timeout_secs: 5,
        },
    }
}

/// A complete, valid request body
pub fn complete_request_json() -> String {
    serde_json::json!({
        "bmi": 22.86,
        "bodyFatPercentage": 16.4,
        "idealWeight": "65.6 - 80.2 kg",
        "bmr": 1780.0,
        "dailyCalorieNeeds": 2759.0,
        "preferences": "vegetarian"
    })
    .to_string()
}
