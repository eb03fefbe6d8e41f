//! Session archive
//!
//! Completed sessions are persisted as `.session.toml` files in
//! `.estate/history/` so they survive process restarts. The archive is
//! append-only: a session identity is written once and never overwritten.

use crate::types::Session;
use estate_core::{EstateError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File-based archive of completed sessions
pub struct SessionStore {
    root: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct SessionFile {
    session: Session,
}

impl SessionStore {
    /// Create a session store at the given root directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Default archive location
    pub fn default_store() -> Self {
        Self::new(".estate/history")
    }

    /// Archive a completed session. Refuses to overwrite an existing identity.
    pub fn save(&self, session: &Session) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(&session.id);

        if path.exists() {
            return Err(EstateError::StorageError(format!(
                "Session already archived: {}",
                session.id
            )));
        }

        let wrapper = SessionFile {
            session: session.clone(),
        };
        let content = toml::to_string_pretty(&wrapper).map_err(|e| {
            EstateError::StorageError(format!("Failed to serialize session: {}", e))
        })?;

        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Load a session by ID
    pub fn load(&self, session_id: &str) -> Result<Session> {
        let path = self.path_for(session_id);
        if !path.exists() {
            return Err(EstateError::StorageError(format!(
                "Session not found: {}",
                session_id
            )));
        }

        let content = std::fs::read_to_string(&path)?;
        let file: SessionFile = toml::from_str(&content).map_err(|e| {
            EstateError::StorageError(format!("Failed to parse session file: {}", e))
        })?;
        Ok(file.session)
    }

    /// List all archived sessions, newest first by creation time.
    ///
    /// Safe to call before anything has been saved; unparseable files are
    /// skipped rather than failing the whole listing.
    pub fn list_all(&self) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();

        if !self.root.exists() {
            return Ok(sessions);
        }

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(".session.toml"))
                .unwrap_or(false)
            {
                let content = std::fs::read_to_string(&path)?;
                if let Ok(file) = toml::from_str::<SessionFile>(&content) {
                    sessions.push(file.session);
                }
            }
        }

        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(sessions)
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        self.root.join(format!("{}.session.toml", session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Asset, AssetKind};

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("estate_store_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_session(topic: &str, created_at: u64) -> Session {
        let mut session = Session::new(topic, vec![Asset::success(AssetKind::Script, "loi thoai")]);
        session.created_at = created_at;
        session
    }

    #[test]
    fn test_save_and_load() {
        let dir = temp_dir();
        let store = SessionStore::new(&dir);

        let session = sample_session("Penthouse Saigon Pearl", 1_000);
        store.save(&session).unwrap();

        let loaded = store.load(&session.id).unwrap();
        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.topic, "Penthouse Saigon Pearl");
        assert_eq!(loaded.assets.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let dir = temp_dir();
        let store = SessionStore::new(&dir);

        let session = sample_session("Villa Thu Duc", 1_000);
        store.save(&session).unwrap();
        let result = store.save(&session);
        assert!(matches!(result, Err(EstateError::StorageError(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_list_all_empty_before_any_save() {
        let dir = temp_dir().join("never_created");
        let store = SessionStore::new(&dir);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_all_newest_first() {
        let dir = temp_dir();
        let store = SessionStore::new(&dir);

        store.save(&sample_session("first", 1_000)).unwrap();
        store.save(&sample_session("second", 2_000)).unwrap();
        store.save(&sample_session("third", 3_000)).unwrap();

        let sessions = store.list_all().unwrap();
        let topics: Vec<&str> = sessions.iter().map(|s| s.topic.as_str()).collect();
        assert_eq!(topics, vec!["third", "second", "first"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_list_all_idempotent() {
        let dir = temp_dir();
        let store = SessionStore::new(&dir);

        store.save(&sample_session("only", 1_000)).unwrap();

        let first = store.list_all().unwrap();
        let second = store.list_all().unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].id, second[0].id);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_list_all_skips_foreign_files() {
        let dir = temp_dir();
        let store = SessionStore::new(&dir);

        store.save(&sample_session("kept", 1_000)).unwrap();
        std::fs::write(dir.join("junk.session.toml"), "not = [valid").unwrap();
        std::fs::write(dir.join("README.txt"), "unrelated").unwrap();

        let sessions = store.list_all().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].topic, "kept");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_not_found() {
        let dir = temp_dir();
        let store = SessionStore::new(&dir);
        assert!(store.load("nonexistent-id").is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
