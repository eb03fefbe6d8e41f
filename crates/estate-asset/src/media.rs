//! Out-of-band media attachment
//!
//! Files the user supplies alongside a run (reference photos, pre-cut video,
//! recorded narration) are wrapped into the same `Asset` shape the pipeline
//! produces, already resolved as success. They bypass the pipeline entirely
//! and are never retried or validated against its invariants.

use crate::types::{Asset, AssetKind};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use estate_core::{EstateError, Result};
use std::path::Path;

/// Map a file extension to the asset kind and MIME type it attaches as
fn kind_for_extension(ext: &str) -> Option<(AssetKind, &'static str)> {
    match ext {
        "png" => Some((AssetKind::Thumbnail, "image/png")),
        "jpg" | "jpeg" => Some((AssetKind::Thumbnail, "image/jpeg")),
        "webp" => Some((AssetKind::Thumbnail, "image/webp")),
        "gif" => Some((AssetKind::Thumbnail, "image/gif")),
        "mp4" => Some((AssetKind::Video, "video/mp4")),
        "webm" => Some((AssetKind::Video, "video/webm")),
        "mov" => Some((AssetKind::Video, "video/quicktime")),
        "mp3" => Some((AssetKind::Audio, "audio/mpeg")),
        "wav" => Some((AssetKind::Audio, "audio/wav")),
        "ogg" => Some((AssetKind::Audio, "audio/ogg")),
        "m4a" => Some((AssetKind::Audio, "audio/mp4")),
        _ => None,
    }
}

/// Attach a media file as a resolved asset with a base64 data URI payload.
///
/// Unrecognized media kinds are rejected with `UnsupportedMedia`; callers log
/// and discard those without touching any pipeline state.
pub fn attach_media(path: &Path) -> Result<Asset> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string();

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let (kind, mime) = kind_for_extension(&ext)
        .ok_or_else(|| EstateError::UnsupportedMedia(file_name.clone()))?;

    let bytes = std::fs::read(path)?;
    let payload = format!("data:{};base64,{}", mime, BASE64.encode(&bytes));

    Ok(Asset::success(kind, payload).with_metadata("source", file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetStatus;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("estate_media_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_attach_image() {
        let dir = temp_dir();
        let path = dir.join("facade.png");
        std::fs::write(&path, [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let asset = attach_media(&path).unwrap();
        assert_eq!(asset.kind, AssetKind::Thumbnail);
        assert_eq!(asset.status, AssetStatus::Success);
        assert!(asset.payload.starts_with("data:image/png;base64,"));
        assert_eq!(
            asset.metadata.get("source").map(String::as_str),
            Some("facade.png")
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_attach_audio_case_insensitive_extension() {
        let dir = temp_dir();
        let path = dir.join("narration.WAV");
        std::fs::write(&path, b"RIFF").unwrap();

        let asset = attach_media(&path).unwrap();
        assert_eq!(asset.kind, AssetKind::Audio);
        assert!(asset.payload.starts_with("data:audio/wav;base64,"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_attach_video() {
        let dir = temp_dir();
        let path = dir.join("tour.mp4");
        std::fs::write(&path, b"\x00\x00\x00\x18ftyp").unwrap();

        let asset = attach_media(&path).unwrap();
        assert_eq!(asset.kind, AssetKind::Video);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_attach_unsupported_kind() {
        let dir = temp_dir();
        let path = dir.join("floorplan.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let result = attach_media(&path);
        assert!(matches!(result, Err(EstateError::UnsupportedMedia(ref name)) if name == "floorplan.pdf"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_payload_roundtrips_through_base64() {
        let dir = temp_dir();
        let path = dir.join("clip.mp3");
        let original = b"ID3\x03\x00fake-mp3-bytes".to_vec();
        std::fs::write(&path, &original).unwrap();

        let asset = attach_media(&path).unwrap();
        let encoded = asset.payload.split(',').nth(1).unwrap();
        assert_eq!(BASE64.decode(encoded).unwrap(), original);

        std::fs::remove_dir_all(&dir).ok();
    }
}
