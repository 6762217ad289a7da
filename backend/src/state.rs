//! Application state management
//!
//! Shared state passed to all request handlers via Axum's state extraction.
//! Every field is behind an `Arc` or is a cheap handle, so cloning per
//! request costs a few reference-count increments.

use crate::config::AppConfig;
use crate::services::RecommendationGateway;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Upstream used for recommendations
    pub gateway: Arc<dyn RecommendationGateway>,
    /// Renders the Prometheus exposition for `/metrics`
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        config: AppConfig,
        gateway: Arc<dyn RecommendationGateway>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
            metrics,
        }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the recommendation gateway
    #[inline]
    pub fn gateway(&self) -> &dyn RecommendationGateway {
        self.gateway.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::OllamaGateway;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_state_clone_shares_gateway() {
        let config = AppConfig::default();
        let gateway = Arc::new(OllamaGateway::new(config.ai.clone()).unwrap());
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let state = AppState::new(config, gateway, handle);

        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.gateway, &cloned.gateway));
        assert!(!cloned.gateway().is_enabled());
    }
}
