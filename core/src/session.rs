//! Persisted session state.
//!
//! # Design
//! A session is two string-valued keys, `token` and `user`. They are only
//! ever written or removed together through `Storage::write_batch`, and a
//! read that finds one without the other treats the record as absent and
//! clears it. Callers therefore never see a token without a user or the
//! reverse.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::error::StorageError;
use crate::types::Session;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// String key/value storage that survives process restarts (or not, for
/// `MemoryStorage`).
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Apply every write or none. `None` removes the key.
    fn write_batch(&self, writes: &[(&str, Option<&str>)]) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn write_batch(&self, writes: &[(&str, Option<&str>)]) -> Result<(), StorageError> {
        (**self).write_batch(writes)
    }
}

/// In-memory storage for tests and hosts without a disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write_batch(&self, writes: &[(&str, Option<&str>)]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        apply(&mut entries, writes);
        Ok(())
    }
}

/// A JSON object on disk. Each batch rewrites the whole file through a
/// temp file and a rename.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt(e.to_string()))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn write_batch(&self, writes: &[(&str, Option<&str>)]) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        // A corrupt file is replaced rather than blocking logout forever.
        let mut entries = self.read_all().unwrap_or_default();
        apply(&mut entries, writes);

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn apply(entries: &mut HashMap<String, String>, writes: &[(&str, Option<&str>)]) {
    for (key, value) in writes {
        match value {
            Some(value) => {
                entries.insert((*key).to_string(), (*value).to_string());
            }
            None => {
                entries.remove(*key);
            }
        }
    }
}

/// Reads and writes the `token`/`user` pair.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Hydrate the persisted session.
    ///
    /// A half-written or unparsable record is cleared and reported as
    /// absent.
    pub fn load(&self) -> Result<Option<Session>, StorageError> {
        let token = self.storage.get(TOKEN_KEY)?;
        let user = self.storage.get(USER_KEY)?;
        match (token, user) {
            (None, None) => Ok(None),
            (Some(token), Some(user)) => match serde_json::from_str(&user) {
                Ok(user) => Ok(Some(Session { token, user })),
                Err(e) => {
                    warn!(error = %e, "stored user record is unreadable, clearing session");
                    self.clear()?;
                    Ok(None)
                }
            },
            (token, _) => {
                warn!(
                    has_token = token.is_some(),
                    "stored session is incomplete, clearing it"
                );
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        self.storage.write_batch(&[
            (TOKEN_KEY, Some(session.token.as_str())),
            (USER_KEY, Some(user.as_str())),
        ])
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage
            .write_batch(&[(TOKEN_KEY, None), (USER_KEY, None)])
    }
}
