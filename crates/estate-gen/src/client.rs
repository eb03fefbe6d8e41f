//! Generation client trait and status types

use estate_core::Result;

/// Status returned by a client health check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientStatus {
    Available,
    Unavailable(String),
    NoApiKey,
}

/// Trait implemented by each generation backend (Gemini, Mock).
///
/// Four independent request/response operations, one per asset kind. Note the
/// deliberate asymmetry: `generate_script` soft-falls-back to a placeholder
/// when the model returns no text, while the three media operations fail hard
/// on missing output.
pub trait GenerationClient: Send {
    /// Client name (e.g. "gemini", "mock")
    fn name(&self) -> &str;

    /// Check if the client is usable (API key present, service reachable)
    fn health_check(&self) -> Result<ClientStatus>;

    /// Generate the voiceover script for a topic
    fn generate_script(&self, topic: &str) -> Result<String>;

    /// Synthesize speech for a script; returns an audio data URI
    fn generate_voiceover(&self, script: &str) -> Result<String>;

    /// Render the listing thumbnail; returns an image data URI
    fn generate_thumbnail(&self, topic: &str, style: &str) -> Result<String>;

    /// Produce the virtual-tour video (submit + poll); returns a fetchable URI
    fn generate_video(&self, topic: &str, resolution: &str) -> Result<String>;
}
