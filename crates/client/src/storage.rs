//! Durable client-side session storage.
//!
//! The session is kept as two string entries, mirroring browser local
//! storage: `token` (the bearer credential) and `user` (the serialized
//! [`Identity`]). Both are written together and removed together; if either
//! is missing on restore there is no session.
//!
//! Only [`SessionStore`](crate::store::SessionStore) writes these entries.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use wellnest_core::session::{Identity, Session};

/// Storage key of the bearer token entry.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the serialized identity entry.
pub const USER_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Session storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string key/value store that can update several keys in one step.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set every entry in one write; readers never see a partial update.
    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError>;

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// Session helpers
// ---------------------------------------------------------------------------

/// Read the stored session.
///
/// Returns `Ok(None)` when either entry is absent or the entries do not form
/// a valid session; only storage-level failures are errors.
pub fn read_session(storage: &dyn SessionStorage) -> Result<Option<Session>, StorageError> {
    let (Some(token), Some(user)) = (storage.get(TOKEN_KEY)?, storage.get(USER_KEY)?) else {
        return Ok(None);
    };

    let identity: Identity = match serde_json::from_str(&user) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(error = %e, "Stored identity is malformed, ignoring it");
            return Ok(None);
        }
    };

    let session = Session::from_parts(identity, token);
    if let Err(e) = session.validate() {
        tracing::warn!(error = %e, "Stored session is incomplete, ignoring it");
        return Ok(None);
    }
    Ok(Some(session))
}

pub fn write_session(storage: &dyn SessionStorage, session: &Session) -> Result<(), StorageError> {
    let user = serde_json::to_string(&session.identity())?;
    storage.set_all(&[(TOKEN_KEY, session.token.clone()), (USER_KEY, user)])
}

pub fn clear_session(storage: &dyn SessionStorage) -> Result<(), StorageError> {
    storage.remove_all(&[TOKEN_KEY, USER_KEY])
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// Process-local storage. Clones share the same entries, which lets a test
/// hand one clone to a store and keep another to simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut map = self.entries();
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.entries();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

/// Entries kept as one JSON object in a file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// original, so a crash mid-write leaves the previous contents intact.
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

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Load for a write. A corrupt file is replaced rather than blocking
    /// every future login.
    fn load_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.load() {
            Err(StorageError::Corrupt { source, .. }) => {
                tracing::warn!(path = %self.path.display(), error = %source, "Replacing corrupt session file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(map)?;
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        restrict_permissions(&tmp).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.load() {
            Ok(mut map) => Ok(map.remove(key)),
            // A corrupt file holds no usable session.
            Err(StorageError::Corrupt { source, .. }) => {
                tracing::warn!(path = %self.path.display(), error = %source, "Session file is corrupt");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut map = self.load_for_update()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        self.save(&map)
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.load_for_update()?;
        for key in keys {
            map.remove(*key);
        }
        if map.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.io_error(e)),
            };
        }
        self.save(&map)
    }
}

#[cfg(test)]
mod tests {
    use wellnest_core::roles::Role;

    use super::*;

    fn sample() -> Session {
        Session {
            user_id: "u-7".into(),
            username: "trainer_tom".into(),
            full_name: "Tom Trainer".into(),
            email: "tom@example.com".into(),
            role: Role::Trainer,
            token: "jwt-tom".into(),
        }
    }

    #[test]
    fn memory_roundtrip_and_clear() {
        let storage = MemoryStorage::new();
        assert!(read_session(&storage).unwrap().is_none());

        write_session(&storage, &sample()).unwrap();
        assert_eq!(read_session(&storage).unwrap(), Some(sample()));

        clear_session(&storage).unwrap();
        assert!(read_session(&storage).unwrap().is_none());
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn missing_token_means_no_session() {
        let storage = MemoryStorage::new();
        write_session(&storage, &sample()).unwrap();
        storage.remove_all(&[TOKEN_KEY]).unwrap();
        assert!(read_session(&storage).unwrap().is_none());
    }

    #[test]
    fn malformed_identity_means_no_session() {
        let storage = MemoryStorage::new();
        storage
            .set_all(&[(TOKEN_KEY, "t".into()), (USER_KEY, "{not json".into())])
            .unwrap();
        assert!(read_session(&storage).unwrap().is_none());

        storage
            .set_all(&[(USER_KEY, r#"{"userId":"u","username":"x","fullName":"X","email":"x@y.z","role":"ROLE_PIRATE"}"#.into())])
            .unwrap();
        assert!(read_session(&storage).unwrap().is_none());
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        write_session(&FileStorage::new(&path), &sample()).unwrap();
        let reopened = FileStorage::new(&path);
        assert_eq!(read_session(&reopened).unwrap(), Some(sample()));

        clear_session(&reopened).unwrap();
        assert!(!path.exists());
        assert!(read_session(&FileStorage::new(&path)).unwrap().is_none());
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "garbage").unwrap();

        let storage = FileStorage::new(&path);
        assert!(read_session(&storage).unwrap().is_none());

        write_session(&storage, &sample()).unwrap();
        assert_eq!(read_session(&storage).unwrap(), Some(sample()));
    }

    #[test]
    fn clearing_a_missing_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        clear_session(&storage).unwrap();
        clear_session(&storage).unwrap();
    }
}
