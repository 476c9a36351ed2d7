use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::session::domain::credential_store::{CredentialError, CredentialStore};
use crate::shared::constants::{APP_DIR_NAME, CREDENTIAL_ENV_VARS, CREDENTIAL_FILE_NAME};

/// Reads the API key from the environment, falling back to a file in the
/// user's config directory. `save` writes the file.
///
/// Resolution order:
/// 1. A key saved through this store since it was created
/// 2. The first non-empty environment variable in `env_vars`
/// 3. The credential file, trimmed
pub struct FileCredentialStore {
    path: PathBuf,
    env_vars: Vec<String>,
    selected: RwLock<Option<String>>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_vars: CREDENTIAL_ENV_VARS.iter().map(|v| v.to_string()).collect(),
            selected: RwLock::new(None),
        }
    }

    /// Store at the platform config location, e.g.
    /// `~/.config/MaskGuard/credential` on Linux.
    pub fn default_location() -> Result<Self, CredentialError> {
        dirs::config_dir()
            .map(|d| Self::new(d.join(APP_DIR_NAME).join(CREDENTIAL_FILE_NAME)))
            .ok_or(CredentialError::NoConfigDir)
    }

    pub fn with_env_vars(mut self, vars: &[&str]) -> Self {
        self.env_vars = vars.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn from_selection(&self) -> Option<String> {
        self.selected
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn from_env(&self) -> Option<String> {
        self.env_vars
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
    }

    fn from_file(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let key = contents.trim();
        (!key.is_empty()).then(|| key.to_string())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        self.from_selection()
            .or_else(|| self.from_env())
            .or_else(|| self.from_file())
    }

    fn save(&self, key: &str) -> Result<(), CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CredentialError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(&self.path, key).map_err(|e| CredentialError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        *self.selected.write().unwrap_or_else(|e| e.into_inner()) = Some(key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> FileCredentialStore {
        FileCredentialStore::new(tmp.path().join("nested").join("credential")).with_env_vars(&[])
    }

    #[test]
    fn test_load_without_file_is_none() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(store_in(&tmp).load(), None);
    }

    #[test]
    fn test_save_creates_parent_and_roundtrips_trimmed() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.save("  abc123 \n").unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_save_rejects_blank_key() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(matches!(store.save("   "), Err(CredentialError::Empty)));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_blank_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "\n").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_env_var_wins_over_file_from_a_previous_run() {
        let tmp = TempDir::new().unwrap();
        let var = "MASKGUARD_TEST_CREDENTIAL_STARTUP";
        std::env::set_var(var, "from-env");
        let path = tmp.path().join("credential");
        fs::write(&path, "from-file").unwrap();
        let store = FileCredentialStore::new(&path).with_env_vars(&[var]);

        assert_eq!(store.load().as_deref(), Some("from-env"));
        std::env::remove_var(var);
        assert_eq!(store.load().as_deref(), Some("from-file"));
    }

    #[test]
    fn test_saved_key_wins_over_env_var() {
        let tmp = TempDir::new().unwrap();
        let var = "MASKGUARD_TEST_CREDENTIAL_RESELECT";
        std::env::set_var(var, "stale-env-key");
        let store = store_in(&tmp).with_env_vars(&[var]);
        assert_eq!(store.load().as_deref(), Some("stale-env-key"));

        store.save("fresh-user-key").unwrap();
        assert_eq!(store.load().as_deref(), Some("fresh-user-key"));
        std::env::remove_var(var);
    }

    #[test]
    fn test_rejected_save_keeps_previous_key() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.save("first").unwrap();
        assert!(store.save("  ").is_err());
        assert_eq!(store.load().as_deref(), Some("first"));
    }

    #[test]
    fn test_default_location_is_under_app_dir() {
        if let Ok(store) = FileCredentialStore::default_location() {
            let path = store.path().to_string_lossy().to_string();
            assert!(path.contains(APP_DIR_NAME));
            assert!(path.ends_with(CREDENTIAL_FILE_NAME));
        }
    }
}
