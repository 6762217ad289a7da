//! Health Calculators Backend Library
//!
//! Hosts the recommendation gateway, health probes and metrics. Exposed as a
//! library so integration tests can build the router directly.

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
