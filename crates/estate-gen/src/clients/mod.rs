//! Client registry
//!
//! Maps client names to concrete implementations.

pub mod gemini;
pub mod mock;

use crate::client::GenerationClient;
use crate::config::EstateConfig;
use estate_core::{EstateError, Result};

/// Create a generation client by name with configuration
pub fn create_client(name: &str, config: &EstateConfig) -> Result<Box<dyn GenerationClient>> {
    match name {
        "mock" => Ok(Box::new(mock::MockClient::new())),
        "gemini" => Ok(Box::new(gemini::GeminiClient::from_config(config)?)),
        _ => Err(EstateError::ConfigError(format!(
            "Unknown provider '{}'. Available: mock, gemini",
            name
        ))),
    }
}

/// List all available client names
pub fn available_clients() -> Vec<&'static str> {
    vec!["mock", "gemini"]
}
