use std::sync::Arc;

use crate::session::domain::credential_store::{CredentialError, CredentialStore};
use crate::session::engine_session::EngineSession;

/// Decides whether the live demo is reachable.
///
/// Opens the [`EngineSession`] after a one-time startup check finds a stored
/// credential, or after the user explicitly selects one. The classifier may
/// close it again at any time.
pub struct CredentialGate {
    store: Arc<dyn CredentialStore>,
    session: Arc<EngineSession>,
}

impl CredentialGate {
    pub fn new(store: Arc<dyn CredentialStore>, session: Arc<EngineSession>) -> Self {
        Self { store, session }
    }

    /// Activates the session if a credential is already available.
    pub fn check_on_startup(&self) -> bool {
        if self.store.load().is_some() {
            self.session.activate();
        } else {
            log::info!("No vision engine credential selected yet");
        }
        self.session.is_ready()
    }

    /// Stores a user-provided credential and activates the session.
    pub fn select(&self, key: &str) -> Result<(), CredentialError> {
        self.store.save(key)?;
        self.session.activate();
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.session.is_ready()
    }

    pub fn session(&self) -> &Arc<EngineSession> {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::infrastructure::memory_credential_store::MemoryCredentialStore;

    fn gate(key: Option<&str>) -> CredentialGate {
        CredentialGate::new(
            Arc::new(MemoryCredentialStore::new(key)),
            EngineSession::new(),
        )
    }

    #[test]
    fn test_startup_check_opens_with_stored_key() {
        let gate = gate(Some("k"));
        assert!(gate.check_on_startup());
        assert!(gate.is_open());
    }

    #[test]
    fn test_startup_check_stays_closed_without_key() {
        let gate = gate(None);
        assert!(!gate.check_on_startup());
    }

    #[test]
    fn test_select_opens_gate() {
        let gate = gate(None);
        gate.select("fresh-key").unwrap();
        assert!(gate.is_open());
    }

    #[test]
    fn test_select_blank_key_keeps_gate_closed() {
        let gate = gate(None);
        assert!(gate.select(" ").is_err());
        assert!(!gate.is_open());
    }

    #[test]
    fn test_invalidation_closes_gate_until_reselected() {
        let gate = gate(Some("k"));
        gate.check_on_startup();

        gate.session().invalidate();
        assert!(!gate.is_open());

        gate.select("replacement").unwrap();
        assert!(gate.is_open());
    }

    #[test]
    fn test_reselected_key_replaces_env_key_after_invalidation() {
        use crate::session::infrastructure::file_credential_store::FileCredentialStore;

        let tmp = tempfile::TempDir::new().unwrap();
        let var = "MASKGUARD_TEST_GATE_RESELECT";
        std::env::set_var(var, "stale-env-key");
        let store = Arc::new(
            FileCredentialStore::new(tmp.path().join("credential")).with_env_vars(&[var]),
        );
        let gate = CredentialGate::new(store.clone(), EngineSession::new());
        assert!(gate.check_on_startup());

        gate.session().invalidate();
        gate.select("fresh-user-key").unwrap();

        assert!(gate.is_open());
        assert_eq!(store.load().as_deref(), Some("fresh-user-key"));
        std::env::remove_var(var);
    }
}
