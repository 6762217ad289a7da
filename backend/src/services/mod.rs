//! Business logic services

pub mod recommendations;

pub use recommendations::{OllamaGateway, RecommendationGateway};
