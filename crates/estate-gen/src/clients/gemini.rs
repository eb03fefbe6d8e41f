//! Gemini generation client
//!
//! Drives the four generation operations against the Generative Language API.
//! Text, speech and image generation are single `generateContent` calls;
//! video generation is long-running, so it submits an operation and polls on
//! a fixed interval, bounded by `MAX_POLL_ATTEMPTS`.

use crate::client::{ClientStatus, GenerationClient};
use crate::config::{EstateConfig, ModelConfig};
use crate::prompts;
use estate_core::{EstateError, Result};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const POLL_INTERVAL_SECS: u64 = 5;
const MAX_POLL_ATTEMPTS: u32 = 120;

/// Gemini client for script, voiceover, thumbnail and video generation
pub struct GeminiClient {
    api_key: String,
    api_url: String,
    models: ModelConfig,
    poll_interval: Duration,
}

impl GeminiClient {
    /// Create a new GeminiClient from config.
    ///
    /// Fails before any network interaction if no API key is resolved.
    pub fn from_config(config: &EstateConfig) -> Result<Self> {
        let api_key = config
            .api_key("gemini")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                EstateError::CredentialMissing(
                    "Gemini API key not configured. Set ESTATE_GEMINI_API_KEY or add to .estate/config.toml".to_string(),
                )
            })?
            .to_string();

        let api_url = config
            .api_url("gemini")
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            api_url,
            models: config.generation.models.clone(),
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
        })
    }

    fn generate_content_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url, model, self.api_key
        )
    }

    fn post_json(&self, url: &str, payload: &Value) -> Result<Value> {
        let agent = build_agent();
        let response = agent
            .post(url)
            .header("Content-Type", "application/json")
            .send_json(payload);

        match response {
            Ok(mut ok) => {
                let body: Value = ok.body_mut().read_json().map_err(|e| {
                    EstateError::GenerationError(format!("Failed to parse Gemini response: {}", e))
                })?;
                check_error_envelope(&body)?;
                Ok(body)
            }
            Err(e) => Err(EstateError::GenerationError(format!(
                "Gemini API request failed: {}",
                e
            ))),
        }
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        let agent = build_agent();
        let response = agent.get(url).call();

        match response {
            Ok(mut ok) => {
                let body: Value = ok.body_mut().read_json().map_err(|e| {
                    EstateError::GenerationError(format!("Failed to parse poll response: {}", e))
                })?;
                check_error_envelope(&body)?;
                Ok(body)
            }
            Err(e) => Err(EstateError::GenerationError(format!(
                "Gemini poll failed: {}",
                e
            ))),
        }
    }
}

impl GenerationClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn health_check(&self) -> Result<ClientStatus> {
        if self.api_key.is_empty() {
            return Ok(ClientStatus::NoApiKey);
        }
        Ok(ClientStatus::Available)
    }

    fn generate_script(&self, topic: &str) -> Result<String> {
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompts::script_prompt(topic) }] }],
            "systemInstruction": { "parts": [{ "text": prompts::SCRIPT_SYSTEM_INSTRUCTION }] },
            "generationConfig": { "temperature": 0.7 }
        });

        let response = self.post_json(&self.generate_content_url(&self.models.text), &payload)?;
        Ok(extract_script_text(&response))
    }

    fn generate_voiceover(&self, script: &str) -> Result<String> {
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": script }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": prompts::VOICE_NAME }
                    }
                }
            }
        });

        let response = self.post_json(&self.generate_content_url(&self.models.tts), &payload)?;
        extract_inline_audio(&response)
    }

    fn generate_thumbnail(&self, topic: &str, style: &str) -> Result<String> {
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompts::thumbnail_prompt(topic, style) }] }],
            "generationConfig": {
                "imageConfig": { "aspectRatio": prompts::ASPECT_RATIO_IMAGE }
            }
        });

        let response = self.post_json(&self.generate_content_url(&self.models.image), &payload)?;
        extract_inline_image(&response)
    }

    fn generate_video(&self, topic: &str, resolution: &str) -> Result<String> {
        let submit_url = format!(
            "{}/models/{}:predictLongRunning?key={}",
            self.api_url, self.models.video, self.api_key
        );
        let payload = serde_json::json!({
            "instances": [{ "prompt": prompts::video_prompt(topic) }],
            "parameters": {
                "numberOfVideos": 1,
                "resolution": resolution,
                "aspectRatio": prompts::ASPECT_RATIO_VIDEO
            }
        });

        let submitted = self.post_json(&submit_url, &payload)?;
        let operation = extract_operation_name(&submitted)?;

        let poll_url = format!("{}/{}?key={}", self.api_url, operation, self.api_key);
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            if attempts > MAX_POLL_ATTEMPTS {
                return Err(EstateError::PollTimeout {
                    attempts: MAX_POLL_ATTEMPTS,
                });
            }

            std::thread::sleep(self.poll_interval);

            match extract_video_poll(&self.get_json(&poll_url)?)? {
                VideoPoll::Pending => continue,
                VideoPoll::Complete(uri) => {
                    let uri = uri.ok_or_else(|| {
                        EstateError::GenerationError(
                            "No video URI in completion response".to_string(),
                        )
                    })?;
                    // Veo URIs require the key for client-side retrieval
                    return Ok(format!("{}&key={}", uri, self.api_key));
                }
                VideoPoll::Failed(msg) => {
                    return Err(EstateError::GenerationError(format!(
                        "Video generation failed: {}",
                        msg
                    )));
                }
            }
        }
    }
}

/// Progress of a long-running video operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoPoll {
    Pending,
    Complete(Option<String>),
    Failed(String),
}

fn build_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .build();
    config.into()
}

fn check_error_envelope(body: &Value) -> Result<()> {
    if let Some(error) = body.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");
        return Err(EstateError::GenerationError(format!(
            "Gemini API error: {}",
            message
        )));
    }
    Ok(())
}

fn candidate_parts(body: &Value) -> Option<&Vec<Value>> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()
}

/// First text part, or the fallback placeholder when the model returned none.
/// The soft fallback is deliberate: only the script path degrades gracefully.
fn extract_script_text(body: &Value) -> String {
    candidate_parts(body)
        .and_then(|parts| parts.iter().find_map(|p| p.get("text")?.as_str()))
        .map(|s| s.to_string())
        .unwrap_or_else(|| prompts::SCRIPT_FALLBACK.to_string())
}

fn extract_inline_audio(body: &Value) -> Result<String> {
    candidate_parts(body)
        .and_then(|parts| parts.first())
        .and_then(|p| p.get("inlineData"))
        .and_then(|d| d.get("data"))
        .and_then(|d| d.as_str())
        .map(|data| format!("data:audio/wav;base64,{}", data))
        .ok_or_else(|| EstateError::GenerationError("No audio generated".to_string()))
}

fn extract_inline_image(body: &Value) -> Result<String> {
    candidate_parts(body)
        .and_then(|parts| {
            parts
                .iter()
                .find_map(|p| p.get("inlineData")?.get("data")?.as_str())
        })
        .map(|data| format!("data:image/png;base64,{}", data))
        .ok_or_else(|| EstateError::GenerationError("No image data returned".to_string()))
}

fn extract_operation_name(body: &Value) -> Result<String> {
    body.get("name")
        .and_then(|n| n.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            EstateError::GenerationError(format!(
                "Unexpected video submit response: {}",
                serde_json::to_string_pretty(body).unwrap_or_default()
            ))
        })
}

fn extract_video_poll(body: &Value) -> Result<VideoPoll> {
    if let Some(error) = body.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        return Ok(VideoPoll::Failed(message));
    }

    if !body.get("done").and_then(|d| d.as_bool()).unwrap_or(false) {
        return Ok(VideoPoll::Pending);
    }

    let response = body.get("response");
    let uri = response
        .and_then(|r| r.get("generateVideoResponse"))
        .and_then(|r| r.get("generatedSamples"))
        .and_then(|s| s.get(0))
        .and_then(|s| s.get("video"))
        .and_then(|v| v.get("uri"))
        .and_then(|u| u.as_str())
        .or_else(|| {
            response
                .and_then(|r| r.get("generatedVideos"))
                .and_then(|s| s.get(0))
                .and_then(|s| s.get("video"))
                .and_then(|v| v.get("uri"))
                .and_then(|u| u.as_str())
        })
        .map(|s| s.to_string());

    Ok(VideoPoll::Complete(uri))
}

/// Parse a `generateContent` script response for testing
pub fn parse_script_text(json: &str) -> Result<String> {
    let body: Value = serde_json::from_str(json)
        .map_err(|e| EstateError::GenerationError(format!("Invalid JSON: {}", e)))?;
    Ok(extract_script_text(&body))
}

/// Parse a TTS response for testing
pub fn parse_inline_audio(json: &str) -> Result<String> {
    let body: Value = serde_json::from_str(json)
        .map_err(|e| EstateError::GenerationError(format!("Invalid JSON: {}", e)))?;
    extract_inline_audio(&body)
}

/// Parse an image response for testing
pub fn parse_inline_image(json: &str) -> Result<String> {
    let body: Value = serde_json::from_str(json)
        .map_err(|e| EstateError::GenerationError(format!("Invalid JSON: {}", e)))?;
    extract_inline_image(&body)
}

/// Parse a video submit response for testing
pub fn parse_operation_name(json: &str) -> Result<String> {
    let body: Value = serde_json::from_str(json)
        .map_err(|e| EstateError::GenerationError(format!("Invalid JSON: {}", e)))?;
    extract_operation_name(&body)
}

/// Parse a video poll response for testing
pub fn parse_video_poll(json: &str) -> Result<VideoPoll> {
    let body: Value = serde_json::from_str(json)
        .map_err(|e| EstateError::GenerationError(format!("Invalid JSON: {}", e)))?;
    extract_video_poll(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_text() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "Chào mừng đến với căn hộ mẫu." }] }
            }]
        }"#;
        assert_eq!(parse_script_text(json).unwrap(), "Chào mừng đến với căn hộ mẫu.");
    }

    #[test]
    fn test_parse_script_text_soft_fallback() {
        // Missing text is not an error for the script path
        let json = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"AAAA"}}]}}]}"#;
        assert_eq!(parse_script_text(json).unwrap(), prompts::SCRIPT_FALLBACK);

        let empty = r#"{}"#;
        assert_eq!(parse_script_text(empty).unwrap(), prompts::SCRIPT_FALLBACK);
    }

    #[test]
    fn test_parse_inline_audio() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "mimeType": "audio/pcm", "data": "UklGRg==" } }] }
            }]
        }"#;
        let uri = parse_inline_audio(json).unwrap();
        assert_eq!(uri, "data:audio/wav;base64,UklGRg==");
    }

    #[test]
    fn test_parse_inline_audio_missing() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"no audio"}]}}]}"#;
        assert!(parse_inline_audio(json).is_err());
    }

    #[test]
    fn test_parse_inline_image_scans_parts() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is your render:" },
                    { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
                ] }
            }]
        }"#;
        let uri = parse_inline_image(json).unwrap();
        assert_eq!(uri, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_parse_inline_image_missing() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"refused"}]}}]}"#;
        assert!(parse_inline_image(json).is_err());
    }

    #[test]
    fn test_parse_operation_name() {
        let json = r#"{"name":"models/veo-3.1/operations/abc123"}"#;
        assert_eq!(
            parse_operation_name(json).unwrap(),
            "models/veo-3.1/operations/abc123"
        );
        assert!(parse_operation_name(r#"{"unexpected":true}"#).is_err());
    }

    #[test]
    fn test_parse_video_poll_pending() {
        let json = r#"{"name":"operations/abc","done":false}"#;
        assert_eq!(parse_video_poll(json).unwrap(), VideoPoll::Pending);

        // Absent "done" also counts as pending
        let json = r#"{"name":"operations/abc"}"#;
        assert_eq!(parse_video_poll(json).unwrap(), VideoPoll::Pending);
    }

    #[test]
    fn test_parse_video_poll_complete() {
        let json = r#"{
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [{ "video": { "uri": "https://example.com/video?alt=media" } }]
                }
            }
        }"#;
        assert_eq!(
            parse_video_poll(json).unwrap(),
            VideoPoll::Complete(Some("https://example.com/video?alt=media".to_string()))
        );
    }

    #[test]
    fn test_parse_video_poll_complete_sdk_shape() {
        let json = r#"{
            "done": true,
            "response": {
                "generatedVideos": [{ "video": { "uri": "https://example.com/tour?alt=media" } }]
            }
        }"#;
        assert_eq!(
            parse_video_poll(json).unwrap(),
            VideoPoll::Complete(Some("https://example.com/tour?alt=media".to_string()))
        );
    }

    #[test]
    fn test_parse_video_poll_complete_without_uri() {
        let json = r#"{"done":true,"response":{}}"#;
        assert_eq!(parse_video_poll(json).unwrap(), VideoPoll::Complete(None));
    }

    #[test]
    fn test_parse_video_poll_failed() {
        let json = r#"{"done":true,"error":{"code":400,"message":"Prompt rejected"}}"#;
        assert_eq!(
            parse_video_poll(json).unwrap(),
            VideoPoll::Failed("Prompt rejected".to_string())
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = EstateConfig {
            providers: std::collections::HashMap::new(),
            generation: Default::default(),
        };
        let result = GeminiClient::from_config(&config);
        assert!(matches!(result, Err(EstateError::CredentialMissing(_))));
    }
}
