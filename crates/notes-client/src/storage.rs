//! Persisted session slot.
//!
//! The session survives restarts as one record (token, serialized user,
//! username). Login, signup and logout overwrite or clear the record as a
//! whole; profile refreshes and updates are the only partial writes.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use notes_core::User;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

/// Everything persisted about the current session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl PersistedSession {
    /// A fresh record for a newly authenticated user.
    pub fn for_user(user: User, token: String) -> Self {
        Self {
            token: Some(token),
            username: Some(user.username.clone()),
            user: Some(user),
        }
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none() && self.username.is_none()
    }
}

/// Backing store for the persisted session slot.
pub trait SessionStorage: Send + Sync + fmt::Debug {
    /// Read the whole record. A missing record is an empty one.
    fn load(&self) -> ClientResult<PersistedSession>;

    /// Overwrite the whole record.
    fn save(&self, session: &PersistedSession) -> ClientResult<()>;

    /// Remove everything.
    fn clear(&self) -> ClientResult<()>;

    /// Current bearer token; unreadable storage counts as no token.
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(session) => session.token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session");
                None
            }
        }
    }
}

/// Storage handle shared by the HTTP client, session manager and observer.
pub type SharedStorage = Arc<dyn SessionStorage>;

// ============================================================================
// In-memory storage
// ============================================================================

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<PersistedSession>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `session`.
    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            slot: Mutex::new(session),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> ClientResult<PersistedSession> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &PersistedSession) -> ClientResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = session.clone();
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = PersistedSession::default();
        Ok(())
    }
}

// ============================================================================
// File storage
// ============================================================================

/// JSON file on disk holding the session record.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> ClientResult<PersistedSession> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(PersistedSession::default()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(PersistedSession::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &PersistedSession) -> ClientResult<()> {
        if session.is_empty() {
            return self.clear();
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Replace the record atomically.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_user;

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_empty());

        let record = PersistedSession::for_user(sample_user("u-1", "ada"), "tok".to_string());
        storage.save(&record).unwrap();
        assert_eq!(storage.load().unwrap(), record);
        assert_eq!(storage.token().as_deref(), Some("tok"));

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        assert!(storage.load().unwrap().is_empty());
        assert_eq!(storage.token(), None);
        storage.clear().unwrap();
    }

    #[test]
    fn file_storage_roundtrip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let storage = FileStorage::new(&path);

        let record = PersistedSession::for_user(sample_user("u-1", "ada"), "tok".to_string());
        storage.save(&record).unwrap();
        assert!(path.exists());

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.load().unwrap(), record);

        reopened.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn file_storage_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.load().is_err());
        assert_eq!(storage.token(), None);
    }
}
