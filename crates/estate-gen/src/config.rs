//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `ESTATE_{PROVIDER}_API_KEY`
//! 2. Project-local: `.estate/config.toml`
//! 3. Global: `~/.estate/config.toml`

use crate::prompts;
use estate_core::{EstateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Provider-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Model identifiers for the four generation operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_text_model")]
    pub text: String,
    #[serde(default = "default_image_model")]
    pub image: String,
    #[serde(default = "default_tts_model")]
    pub tts: String,
    #[serde(default = "default_video_model")]
    pub video: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            text: default_text_model(),
            image: default_image_model(),
            tts: default_tts_model(),
            video: default_video_model(),
        }
    }
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}
fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}
fn default_video_model() -> String {
    "veo-3.1-fast-generate-preview".to_string()
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_provider_name")]
    pub provider: String,
    #[serde(default = "default_resolution")]
    pub resolution: String,
    #[serde(default = "default_thumbnail_style")]
    pub thumbnail_style: String,
    #[serde(default)]
    pub models: ModelConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider_name(),
            resolution: default_resolution(),
            thumbnail_style: default_thumbnail_style(),
            models: ModelConfig::default(),
        }
    }
}

fn default_provider_name() -> String {
    "gemini".to_string()
}
fn default_resolution() -> String {
    prompts::DEFAULT_VIDEO_RESOLUTION.to_string()
}
fn default_thumbnail_style() -> String {
    prompts::DEFAULT_THUMBNAIL_STYLE.to_string()
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstateConfigFile {
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone)]
pub struct EstateConfig {
    pub providers: HashMap<String, ProviderConfig>,
    pub generation: GenerationConfig,
}

impl EstateConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = EstateConfigFile::default();

        // Layer 1: Global config (~/.estate/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        // Layer 2: Project-local config (.estate/config.toml)
        let local_path = PathBuf::from(".estate/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        // Layer 3: Environment variable overrides
        Self::apply_env_overrides(&mut config);

        Ok(EstateConfig {
            providers: config.providers,
            generation: config.generation,
        })
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config);
        Ok(EstateConfig {
            providers: config.providers,
            generation: config.generation,
        })
    }

    /// Get API key for a provider
    pub fn api_key(&self, provider_name: &str) -> Option<&str> {
        self.providers
            .get(provider_name)
            .and_then(|p| p.api_key.as_deref())
    }

    /// Get API URL override for a provider
    pub fn api_url(&self, provider_name: &str) -> Option<&str> {
        self.providers
            .get(provider_name)
            .and_then(|p| p.api_url.as_deref())
    }

    /// Check if a provider is enabled
    pub fn is_enabled(&self, provider_name: &str) -> bool {
        self.providers
            .get(provider_name)
            .map(|p| p.enabled)
            .unwrap_or(true)
    }

    /// Default client name
    pub fn default_provider(&self) -> &str {
        &self.generation.provider
    }

    /// Default video resolution
    pub fn resolution(&self) -> &str {
        &self.generation.resolution
    }

    /// Default thumbnail style
    pub fn thumbnail_style(&self) -> &str {
        &self.generation.thumbnail_style
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".estate").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<EstateConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: EstateConfigFile = toml::from_str(&content).map_err(|e| {
            EstateError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn merge_into(base: &mut EstateConfigFile, overlay: EstateConfigFile) {
        for (name, provider) in overlay.providers {
            let entry = base.providers.entry(name).or_default();
            if provider.api_key.is_some() {
                entry.api_key = provider.api_key;
            }
            if provider.api_url.is_some() {
                entry.api_url = provider.api_url;
            }
            entry.enabled = provider.enabled;
        }

        if overlay.generation.provider != default_provider_name() {
            base.generation.provider = overlay.generation.provider;
        }
        if overlay.generation.resolution != default_resolution() {
            base.generation.resolution = overlay.generation.resolution;
        }
        if overlay.generation.thumbnail_style != default_thumbnail_style() {
            base.generation.thumbnail_style = overlay.generation.thumbnail_style;
        }
        if overlay.generation.models != ModelConfig::default() {
            base.generation.models = overlay.generation.models;
        }
    }

    fn apply_env_overrides(config: &mut EstateConfigFile) {
        let provider_names = ["gemini"];
        for name in &provider_names {
            let env_key = format!("ESTATE_{}_API_KEY", name.to_uppercase());
            if let Ok(key) = std::env::var(&env_key) {
                let entry = config.providers.entry(name.to_string()).or_default();
                entry.api_key = Some(key);
            }
        }
    }
}

/// The credential acquisition boundary.
///
/// The pipeline only asks whether a credential is present; how one is
/// obtained is the host's concern.
pub trait CredentialGate {
    fn has_credential(&self) -> bool;
    /// Prompt the host to supply a credential
    fn request_credential(&self);
}

/// Credential gate backed by resolved configuration
pub struct ConfigCredentials {
    provider: String,
    present: bool,
}

impl ConfigCredentials {
    pub fn from_config(config: &EstateConfig, provider_name: &str) -> Self {
        Self {
            provider: provider_name.to_string(),
            present: config
                .api_key(provider_name)
                .map(|k| !k.is_empty())
                .unwrap_or(false),
        }
    }
}

impl CredentialGate for ConfigCredentials {
    fn has_credential(&self) -> bool {
        self.present
    }

    fn request_credential(&self) {
        eprintln!(
            "No API key for '{}'. Set ESTATE_{}_API_KEY or add it to .estate/config.toml",
            self.provider,
            self.provider.to_uppercase()
        );
    }
}

/// Gate for clients that need no credential (mock)
pub struct AlwaysGranted;

impl CredentialGate for AlwaysGranted {
    fn has_credential(&self) -> bool {
        true
    }

    fn request_credential(&self) {}
}
