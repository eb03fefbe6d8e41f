//! Asset and session type definitions

use estate_core::ContentHash;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The kind of asset a pipeline stage produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Script,
    Thumbnail,
    Video,
    Audio,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Script => write!(f, "script"),
            AssetKind::Thumbnail => write!(f, "thumbnail"),
            AssetKind::Video => write!(f, "video"),
            AssetKind::Audio => write!(f, "audio"),
        }
    }
}

/// Resolution state of an asset. Transitions once, pending -> success|error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Pending,
    Success,
    Error,
}

/// One produced artifact: inline script text, or a data/remote URI for media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique asset ID (UUID), assigned at creation
    pub id: String,
    pub kind: AssetKind,
    /// Inline text (script) or a data/remote URI; empty for error placeholders
    pub payload: String,
    pub status: AssetStatus,
    /// Free-form annotations (originating topic, payload fingerprint, ...)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Asset {
    /// Create a resolved asset with a payload fingerprint in its metadata
    pub fn success(kind: AssetKind, payload: impl Into<String>) -> Self {
        let payload = payload.into();
        let mut metadata = HashMap::new();
        if !payload.is_empty() {
            metadata.insert(
                "fingerprint".to_string(),
                ContentHash::from_payload(&payload).to_prefixed_hex(),
            );
        }
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            payload,
            status: AssetStatus::Success,
            metadata,
        }
    }

    /// Create the empty-payload placeholder recorded for an isolated stage failure
    pub fn error_placeholder(kind: AssetKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            payload: String::new(),
            status: AssetStatus::Error,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// One end-to-end pipeline run and its resulting assets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID (UUID), assigned at run start
    pub id: String,
    /// The user-supplied subject, immutable for the session's lifetime
    pub topic: String,
    /// Epoch milliseconds, fixed when the session is assembled for archiving
    pub created_at: u64,
    /// Generation order: script, audio, thumbnail, video
    pub assets: Vec<Asset>,
}

impl Session {
    /// Assemble a session with a fresh ID
    pub fn new(topic: &str, assets: Vec<Asset>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), topic, assets)
    }

    /// Assemble a session under an ID allocated at run start
    pub fn with_id(id: String, topic: &str, assets: Vec<Asset>) -> Self {
        Self {
            id,
            topic: topic.to_string(),
            created_at: now_millis(),
            assets,
        }
    }

    /// Kinds in generation order, for display and assertions
    pub fn asset_kinds(&self) -> Vec<AssetKind> {
        self.assets.iter().map(|a| a.kind).collect()
    }
}

/// Current time as epoch milliseconds
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_asset_carries_fingerprint() {
        let asset = Asset::success(AssetKind::Script, "Chao mung den voi can ho mau.");
        assert_eq!(asset.status, AssetStatus::Success);
        assert!(!asset.id.is_empty());
        assert!(asset
            .metadata
            .get("fingerprint")
            .unwrap()
            .starts_with("sha256:"));
    }

    #[test]
    fn test_error_placeholder_is_empty() {
        let asset = Asset::error_placeholder(AssetKind::Audio);
        assert_eq!(asset.status, AssetStatus::Error);
        assert!(asset.payload.is_empty());
        assert!(asset.metadata.is_empty());
    }

    #[test]
    fn test_with_metadata() {
        let asset = Asset::success(AssetKind::Thumbnail, "data:image/png;base64,AAAA")
            .with_metadata("topic", "Penthouse Saigon Pearl");
        assert_eq!(
            asset.metadata.get("topic").map(String::as_str),
            Some("Penthouse Saigon Pearl")
        );
    }

    #[test]
    fn test_session_assembly() {
        let assets = vec![
            Asset::success(AssetKind::Script, "script"),
            Asset::error_placeholder(AssetKind::Audio),
        ];
        let session = Session::new("Villa Thu Duc", assets);
        assert_eq!(session.topic, "Villa Thu Duc");
        assert!(session.created_at > 0);
        assert_eq!(
            session.asset_kinds(),
            vec![AssetKind::Script, AssetKind::Audio]
        );
    }

    #[test]
    fn test_session_toml_roundtrip() {
        let session = Session::new(
            "Penthouse Saigon Pearl",
            vec![Asset::success(AssetKind::Script, "loi thoai")],
        );
        let toml_str = toml::to_string_pretty(&session).unwrap();
        let parsed: Session = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.id, session.id);
        assert_eq!(parsed.topic, session.topic);
        assert_eq!(parsed.assets.len(), 1);
        assert_eq!(parsed.assets[0].kind, AssetKind::Script);
    }

    #[test]
    fn test_kind_serde_names() {
        let value = toml::Value::try_from(AssetKind::Thumbnail).unwrap();
        assert!(matches!(value, toml::Value::String(ref s) if s == "thumbnail"));
        assert_eq!(AssetKind::Video.to_string(), "video");
    }
}
