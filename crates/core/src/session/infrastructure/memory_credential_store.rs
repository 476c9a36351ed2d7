use std::sync::Mutex;

use crate::session::domain::credential_store::{CredentialError, CredentialStore};

/// Process-local credential holder. Nothing touches disk.
#[derive(Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new(key: Option<&str>) -> Self {
        Self {
            key: Mutex::new(key.map(str::to_string)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.key.lock().ok().and_then(|k| k.clone())
    }

    fn save(&self, key: &str) -> Result<(), CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        if let Ok(mut slot) = self.key.lock() {
            *slot = Some(key.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_replaces_key() {
        let store = MemoryCredentialStore::new(Some("old"));
        store.save("new").unwrap();
        assert_eq!(store.load().as_deref(), Some("new"));
    }

    #[test]
    fn test_empty_by_default() {
        assert_eq!(MemoryCredentialStore::default().load(), None);
    }
}
