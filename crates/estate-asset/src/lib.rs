//! Estate Asset - session data model and local archive
//!
//! This crate defines the assets a pipeline run produces, the session that
//! groups them, the append-only TOML archive for completed sessions, and
//! out-of-band media attachment.

mod media;
mod store;
mod types;

pub use media::attach_media;
pub use store::SessionStore;
pub use types::{now_millis, Asset, AssetKind, AssetStatus, Session};
