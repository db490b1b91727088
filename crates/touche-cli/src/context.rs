//! Settings shared by every subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use touche_client::{ClientConfig, CredentialStore, FileStore, KeyValueStore};
use touche_session::SharedCredentials;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TOUCHE_DATA_DIR";

/// Resolved global options.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Directory holding `credentials.json`.
    pub data_dir: PathBuf,
    /// HTTP settings for the tournament client.
    pub client: ClientConfig,
}

impl CliContext {
    /// Resolve the data directory, falling back to `$HOME/.touche`, then to
    /// `.touche` in the working directory.
    pub fn new(data_dir: Option<PathBuf>, timeout_secs: u64) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        Self {
            data_dir,
            client: ClientConfig::with_timeout(timeout_secs),
        }
    }

    /// Credential store backed by the data directory.
    pub fn credentials(&self) -> SharedCredentials {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::in_dir(&self.data_dir));
        CredentialStore::new(store)
    }
}

fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".touche"),
        None => PathBuf::from(".touche"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_dir_wins() {
        let ctx = CliContext::new(Some(PathBuf::from("/tmp/x")), 5);
        assert_eq!(ctx.data_dir, PathBuf::from("/tmp/x"));
        assert_eq!(ctx.client.timeout_secs, 5);
    }

    #[test]
    fn default_data_dir_ends_in_touche() {
        let ctx = CliContext::new(None, 30);
        assert!(ctx.data_dir.ends_with(".touche"));
    }

    #[test]
    fn credentials_live_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = CliContext::new(Some(dir.path().to_path_buf()), 30);
        ctx.credentials().save_token("tok", Some("Piste 1")).unwrap();
        assert!(dir.path().join("credentials.json").exists());
    }
}
