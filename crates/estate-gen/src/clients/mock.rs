//! Mock client for testing and offline runs
//!
//! Produces a canned script, a solid-color PNG data URI, a silence WAV data
//! URI and a synthetic video URI without any network calls.

use crate::client::{ClientStatus, GenerationClient};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use estate_core::{EstateError, Result};

/// A mock client that generates placeholder assets locally
#[derive(Default)]
pub struct MockClient;

impl MockClient {
    pub fn new() -> Self {
        Self
    }
}

impl GenerationClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    fn health_check(&self) -> Result<ClientStatus> {
        Ok(ClientStatus::Available)
    }

    fn generate_script(&self, topic: &str) -> Result<String> {
        Ok(format!(
            "Bạn đã bao giờ mơ về một không gian sống đẳng cấp? {} chính là câu trả lời. \
             Vị trí đắc địa, thiết kế tinh tế, tiềm năng đầu tư vượt trội. \
             Liên hệ ngay để không bỏ lỡ cơ hội sở hữu.",
            topic
        ))
    }

    fn generate_voiceover(&self, _script: &str) -> Result<String> {
        let wav = silence_wav(8_000, 1);
        Ok(format!("data:audio/wav;base64,{}", BASE64.encode(wav)))
    }

    fn generate_thumbnail(&self, topic: &str, style: &str) -> Result<String> {
        let png = solid_png(&format!("{}/{}", topic, style), 16, 16)?;
        Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
    }

    fn generate_video(&self, topic: &str, resolution: &str) -> Result<String> {
        Ok(format!(
            "https://mock.estate.local/tours/{}.mp4?resolution={}",
            slug(topic),
            resolution
        ))
    }
}

/// Derive a short file-name-safe slug from a topic
fn slug(topic: &str) -> String {
    topic
        .split_whitespace()
        .take(3)
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != '_', "")
}

/// Encode a solid-color PNG, color derived from the seed string
fn solid_png(seed: &str, width: u32, height: u32) -> Result<Vec<u8>> {
    let hash_val = seed
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    let r = ((hash_val >> 16) & 0xFF) as u8;
    let g = ((hash_val >> 8) & 0xFF) as u8;
    let b = (hash_val & 0xFF) as u8;

    let mut img_data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..(width * height) {
        img_data.extend_from_slice(&[r, g, b, 255]);
    }

    let img = image::RgbaImage::from_raw(width, height, img_data)
        .ok_or_else(|| EstateError::GenerationError("Failed to create image buffer".to_string()))?;

    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| EstateError::GenerationError(format!("Failed to encode PNG: {}", e)))?;
    Ok(buf.into_inner())
}

/// Build a one-second silence WAV in memory
fn silence_wav(sample_rate: u32, num_channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let num_samples = sample_rate;
    let data_size = num_samples * (bits_per_sample / 8) as u32 * num_channels as u32;

    let mut wav = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    let block_align = num_channels * (bits_per_sample / 8);
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk (zeros)
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.resize(wav.len() + data_size as usize, 0);

    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_health() {
        let client = MockClient::new();
        assert_eq!(client.health_check().unwrap(), ClientStatus::Available);
    }

    #[test]
    fn test_mock_script_mentions_topic() {
        let client = MockClient::new();
        let script = client.generate_script("Penthouse Saigon Pearl").unwrap();
        assert!(script.contains("Penthouse Saigon Pearl"));
    }

    #[test]
    fn test_mock_voiceover_is_wav_data_uri() {
        let client = MockClient::new();
        let uri = client.generate_voiceover("any script").unwrap();
        let encoded = uri.strip_prefix("data:audio/wav;base64,").unwrap();
        let bytes = BASE64.decode(encoded).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }

    #[test]
    fn test_mock_thumbnail_is_png_data_uri() {
        let client = MockClient::new();
        let uri = client.generate_thumbnail("Villa Thu Duc", "Modern").unwrap();
        let encoded = uri.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = BASE64.decode(encoded).unwrap();
        assert_eq!(&bytes[..8], &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_mock_thumbnail_varies_with_style() {
        let client = MockClient::new();
        let a = client.generate_thumbnail("Villa Thu Duc", "Modern").unwrap();
        let b = client.generate_thumbnail("Villa Thu Duc", "Rustic").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_mock_video_uri() {
        let client = MockClient::new();
        let uri = client
            .generate_video("Penthouse Saigon Pearl Tower", "1080p")
            .unwrap();
        assert_eq!(
            uri,
            "https://mock.estate.local/tours/penthouse_saigon_pearl.mp4?resolution=1080p"
        );
    }
}
