//! # Device Credential Store
//!
//! Persists the bearer credential issued by device registration, plus the
//! human-readable name it was registered under.
//!
//! ## Keys
//!
//! | Key                      | Value                                  |
//! |--------------------------|----------------------------------------|
//! | `device_token`           | global credential (single active one)  |
//! | `device_name`            | name used at registration              |
//! | `tournament_token_<id>`  | per-tournament credential              |
//!
//! The store is a thin layer over a [`KeyValueStore`]. Two backends are
//! provided: [`MemoryStore`] for tests and embedded use, and [`FileStore`],
//! a JSON object on disk written atomically via rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use zeroize::Zeroizing;

use crate::error::CredentialStoreError;

const DEVICE_TOKEN_KEY: &str = "device_token";
const DEVICE_NAME_KEY: &str = "device_name";
const TOURNAMENT_TOKEN_PREFIX: &str = "tournament_token_";

/// Name shown for a device that holds a credential but never recorded a name.
pub const UNNAMED_DEVICE: &str = "Registered Device";

/// File name used by [`FileStore::in_dir`].
pub const CREDENTIALS_FILE: &str = "credentials.json";

fn tournament_key(tournament_id: u64) -> String {
    format!("{TOURNAMENT_TOKEN_PREFIX}{tournament_id}")
}

// ─── Key-value backends ──────────────────────────────────────────────

/// String key-value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Value under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError>;
    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), CredentialStoreError>;
    /// Every key currently stored.
    fn keys(&self) -> Result<Vec<String>, CredentialStoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CredentialStoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, CredentialStoreError> {
        (**self).keys()
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CredentialStoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CredentialStoreError> {
        Ok(self.entries.lock().keys().cloned().collect())
    }
}

/// JSON file store.
///
/// Every operation reads the file, and every mutation rewrites it through a
/// temporary file and a rename. A missing file is an empty store. The lock
/// serializes writers within the process.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store backed by `credentials.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CREDENTIALS_FILE))
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> CredentialStoreError {
        CredentialStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, CredentialStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_err(e)),
        };
        serde_json::from_str(&content).map_err(|source| CredentialStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|source| {
            CredentialStoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        restrict_permissions(&tmp).map_err(|e| self.io_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))
    }

    fn update(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), CredentialStoreError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        f(&mut entries);
        self.persist(&entries)
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

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), CredentialStoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn keys(&self) -> Result<Vec<String>, CredentialStoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.into_keys().collect())
    }
}

// ─── Credential store ────────────────────────────────────────────────

/// Device credential persistence over any [`KeyValueStore`].
#[derive(Debug)]
pub struct CredentialStore<S> {
    backend: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    /// Wrap a backend.
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Save the global credential together with its registration name.
    ///
    /// Saving without a name forgets any name from an earlier registration.
    /// If the name cannot be written the previous credential is restored.
    pub fn save_token(&self, token: &str, name: Option<&str>) -> Result<(), CredentialStoreError> {
        let previous = self.backend.get(DEVICE_TOKEN_KEY)?;
        self.backend.set(DEVICE_TOKEN_KEY, token)?;
        let named = match name {
            Some(name) => self.backend.set(DEVICE_NAME_KEY, name),
            None => self.backend.remove(DEVICE_NAME_KEY),
        };
        if let Err(e) = named {
            let restored = match previous.as_deref() {
                Some(previous) => self.backend.set(DEVICE_TOKEN_KEY, previous),
                None => self.backend.remove(DEVICE_TOKEN_KEY),
            };
            if let Err(restore) = restored {
                tracing::warn!(error = %restore, "could not restore previous device credential");
            }
            return Err(e);
        }
        tracing::info!(named = name.is_some(), "device credential saved");
        Ok(())
    }

    /// The global credential, if registered.
    pub fn get_token(&self) -> Result<Option<Zeroizing<String>>, CredentialStoreError> {
        Ok(self.backend.get(DEVICE_TOKEN_KEY)?.map(Zeroizing::new))
    }

    /// The name recorded at registration, if any.
    pub fn get_device_name(&self) -> Result<Option<String>, CredentialStoreError> {
        self.backend.get(DEVICE_NAME_KEY)
    }

    /// Name to show for this device: the registration name, a placeholder
    /// for a credential saved without one, or `None` when unregistered.
    pub fn display_name(&self) -> Result<Option<String>, CredentialStoreError> {
        match (self.get_device_name()?, self.get_token()?) {
            (Some(name), _) => Ok(Some(name)),
            (None, Some(_)) => Ok(Some(UNNAMED_DEVICE.to_string())),
            (None, None) => Ok(None),
        }
    }

    /// Forget the global credential and its name.
    pub fn remove_token(&self) -> Result<(), CredentialStoreError> {
        self.backend.remove(DEVICE_TOKEN_KEY)?;
        self.backend.remove(DEVICE_NAME_KEY)?;
        tracing::info!("device credential removed");
        Ok(())
    }

    /// Save a credential scoped to one tournament.
    pub fn save_tournament_token(
        &self,
        tournament_id: u64,
        token: &str,
    ) -> Result<(), CredentialStoreError> {
        self.backend.set(&tournament_key(tournament_id), token)
    }

    /// Credential scoped to one tournament, if any.
    pub fn get_tournament_token(
        &self,
        tournament_id: u64,
    ) -> Result<Option<Zeroizing<String>>, CredentialStoreError> {
        Ok(self
            .backend
            .get(&tournament_key(tournament_id))?
            .map(Zeroizing::new))
    }

    /// Forget the credential scoped to one tournament.
    pub fn remove_tournament_token(&self, tournament_id: u64) -> Result<(), CredentialStoreError> {
        self.backend.remove(&tournament_key(tournament_id))
    }

    /// Forget every credential this store manages. Unrelated keys are kept.
    pub fn clear_all(&self) -> Result<(), CredentialStoreError> {
        for key in self.backend.keys()? {
            if key == DEVICE_TOKEN_KEY
                || key == DEVICE_NAME_KEY
                || key.starts_with(TOURNAMENT_TOKEN_PREFIX)
            {
                self.backend.remove(&key)?;
            }
        }
        tracing::info!("all credentials cleared");
        Ok(())
    }

    /// The backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> CredentialStore<MemoryStore> {
        CredentialStore::new(MemoryStore::new())
    }

    #[test]
    fn test_save_then_get_returns_token() {
        let store = memory();
        store.save_token("tok-123", None).unwrap();
        assert_eq!(store.get_token().unwrap().as_deref().map(String::as_str), Some("tok-123"));
    }

    #[test]
    fn test_remove_then_get_returns_none() {
        let store = memory();
        store.save_token("tok-123", Some("Piste 4")).unwrap();
        store.remove_token().unwrap();
        assert!(store.get_token().unwrap().is_none());
        assert!(store.get_device_name().unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let store = memory();
        store.save_token("old", None).unwrap();
        store.save_token("new", None).unwrap();
        assert_eq!(store.get_token().unwrap().as_deref().map(String::as_str), Some("new"));
    }

    #[test]
    fn test_display_name_fallback() {
        let store = memory();
        assert_eq!(store.display_name().unwrap(), None);

        store.save_token("tok", None).unwrap();
        assert_eq!(store.display_name().unwrap().as_deref(), Some(UNNAMED_DEVICE));

        store.save_token("tok", Some("Referee Ana")).unwrap();
        assert_eq!(store.display_name().unwrap().as_deref(), Some("Referee Ana"));
    }

    #[test]
    fn test_save_without_name_forgets_previous_name() {
        let store = memory();
        store.save_token("tok-1", Some("Piste 4")).unwrap();
        store.save_token("tok-2", None).unwrap();
        assert!(store.get_device_name().unwrap().is_none());
        assert_eq!(store.display_name().unwrap().as_deref(), Some(UNNAMED_DEVICE));
    }

    /// Memory store whose name writes fail.
    #[derive(Default)]
    struct NameWriteFails {
        inner: MemoryStore,
    }

    impl KeyValueStore for NameWriteFails {
        fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
            if key == DEVICE_NAME_KEY {
                return Err(CredentialStoreError::Io {
                    path: PathBuf::from("memory"),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), CredentialStoreError> {
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>, CredentialStoreError> {
            self.inner.keys()
        }
    }

    #[test]
    fn test_failed_name_write_leaves_no_partial_credential() {
        let store = CredentialStore::new(NameWriteFails::default());
        assert!(store.save_token("tok-1", Some("Piste 4")).is_err());
        assert!(store.get_token().unwrap().is_none());

        store.save_token("tok-1", None).unwrap();
        assert!(store.save_token("tok-2", Some("Piste 5")).is_err());
        assert_eq!(store.get_token().unwrap().as_deref().map(String::as_str), Some("tok-1"));
        assert!(store.get_device_name().unwrap().is_none());
    }

    #[test]
    fn test_removing_absent_token_is_fine() {
        memory().remove_token().unwrap();
    }

    #[test]
    fn test_tournament_tokens_are_independent() {
        let store = memory();
        store.save_tournament_token(1, "t1").unwrap();
        store.save_tournament_token(2, "t2").unwrap();
        store.remove_tournament_token(1).unwrap();
        assert!(store.get_tournament_token(1).unwrap().is_none());
        assert_eq!(
            store.get_tournament_token(2).unwrap().as_deref().map(String::as_str),
            Some("t2")
        );
        assert!(store.backend().get("tournament_token_2").unwrap().is_some());
    }

    #[test]
    fn test_clear_all_keeps_unrelated_keys() {
        let store = memory();
        store.save_token("tok", Some("name")).unwrap();
        store.save_tournament_token(9, "t9").unwrap();
        store.backend().set("other_setting", "value").unwrap();

        store.clear_all().unwrap();

        assert!(store.get_token().unwrap().is_none());
        assert!(store.get_tournament_token(9).unwrap().is_none());
        assert_eq!(
            store.backend().get("other_setting").unwrap().as_deref(),
            Some("value")
        );
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = CredentialStore::new(FileStore::in_dir(dir.path()));
            store.save_token("tok-file", Some("Piste 2")).unwrap();
        }
        let store = CredentialStore::new(FileStore::in_dir(dir.path()));
        assert_eq!(
            store.get_token().unwrap().as_deref().map(String::as_str),
            Some("tok-file")
        );
        assert_eq!(store.get_device_name().unwrap().as_deref(), Some("Piste 2"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(FileStore::in_dir(dir.path().join("nested")));
        assert!(store.get_token().unwrap().is_none());
    }

    #[test]
    fn test_file_store_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CREDENTIALS_FILE);
        std::fs::write(&path, "not json").unwrap();
        let store = CredentialStore::new(FileStore::new(&path));
        assert!(matches!(
            store.get_token(),
            Err(CredentialStoreError::Corrupt { .. })
        ));
    }
}
