//! Session service - the session and coin ledger
//!
//! Holds who is signed in (if anyone) and their coin balance. Every
//! mutation is written through to the `guava_user` slot before the
//! in-memory session changes, so the two agree after each operation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Session, SessionSnapshot};
use crate::ports::{IdentityProvider, KeyValueStore};

/// Slot holding the session snapshot
pub const SESSION_SLOT: &str = "guava_user";

/// Balance granted on every sign-in
pub const STARTING_COINS: u64 = 125;

/// What `restore` found in the session slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RestoreOutcome {
    /// No snapshot was stored
    Absent,
    /// A valid snapshot became the active session
    Restored,
    /// The snapshot was malformed and has been removed
    Discarded { reason: String },
}

/// Session and coin ledger
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
    provider: Arc<dyn IdentityProvider>,
    current: Mutex<Option<Session>>,
}

impl SessionService {
    /// Create a ledger with no active session
    ///
    /// Call `restore` to pick up a session persisted by an earlier run.
    pub fn new(store: Arc<dyn KeyValueStore>, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            provider,
            current: Mutex::new(None),
        }
    }

    /// Load the persisted snapshot, if any, as the active session
    pub fn restore(&self) -> Result<RestoreOutcome> {
        let mut current = self.lock()?;

        let raw = match self.store.get(SESSION_SLOT)? {
            Some(raw) => raw,
            None => {
                *current = None;
                return Ok(RestoreOutcome::Absent);
            }
        };

        match SessionSnapshot::parse(&raw) {
            Ok(snapshot) => {
                *current = Some(snapshot.into());
                Ok(RestoreOutcome::Restored)
            }
            Err(e) => {
                self.store.remove(SESSION_SLOT)?;
                *current = None;
                Ok(RestoreOutcome::Discarded {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Sign in through the identity provider
    ///
    /// Suspends for the provider's round trip, then installs the returned
    /// identity with the starting balance. Signing in again while already
    /// signed in replaces the session.
    pub async fn sign_in(&self) -> Result<Session> {
        let identity = self.provider.authenticate().await?;
        let session = Session::new(identity, STARTING_COINS);

        let mut current = self.lock()?;
        self.persist(&session)?;
        *current = Some(session.clone());
        Ok(session)
    }

    /// Sign out. Safe to call when nobody is signed in.
    pub fn sign_out(&self) -> Result<()> {
        let mut current = self.lock()?;
        self.store.remove(SESSION_SLOT)?;
        *current = None;
        Ok(())
    }

    /// Add coins to the signed-in balance
    ///
    /// Returns the new balance, or `None` (with nothing changed) when no
    /// one is signed in.
    pub fn credit(&self, amount: u64) -> Result<Option<u64>> {
        let mut current = self.lock()?;
        let updated = match current.as_ref() {
            Some(session) => session.credited(amount)?,
            None => return Ok(None),
        };

        self.persist(&updated)?;
        let balance = updated.coins();
        *current = Some(updated);
        Ok(Some(balance))
    }

    /// The active session, if any
    ///
    /// A writer that panicked mid-update never leaves a half-written
    /// session behind, so a poisoned lock still holds the real state.
    pub fn current(&self) -> Option<Session> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The signed-in balance, if any
    pub fn balance(&self) -> Option<u64> {
        self.current().map(|s| s.coins())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    /// The active session, or `Error::NotSignedIn`
    pub fn require(&self) -> Result<Session> {
        self.current().ok_or(Error::NotSignedIn)
    }

    /// Name of the identity provider used by `sign_in`
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let raw = session.to_snapshot().to_json()?;
        self.store.put(SESSION_SLOT, &raw)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Session>>> {
        self.current
            .lock()
            .map_err(|e| Error::Other(format!("Lock poisoned: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::adapters::demo::{demo_identity, DemoIdentityProvider};
    use crate::adapters::memory::MemoryStore;
    use crate::domain::Identity;

    fn service_with(store: Arc<MemoryStore>) -> SessionService {
        SessionService::new(store, Arc::new(DemoIdentityProvider::new(Duration::ZERO)))
    }

    fn stored_snapshot(store: &MemoryStore) -> Option<SessionSnapshot> {
        store
            .get(SESSION_SLOT)
            .unwrap()
            .map(|raw| SessionSnapshot::parse(&raw).unwrap())
    }

    #[tokio::test]
    async fn test_sign_in_installs_demo_identity() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Arc::clone(&store));

        let session = service.sign_in().await.unwrap();

        assert!(service.is_signed_in());
        assert_eq!(session.identity(), &demo_identity());
        assert_eq!(service.balance(), Some(STARTING_COINS));
        assert_eq!(stored_snapshot(&store), Some(session.to_snapshot()));
    }

    #[tokio::test]
    async fn test_sign_out_clears_memory_and_slot() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Arc::clone(&store));
        service.sign_in().await.unwrap();

        service.sign_out().unwrap();
        assert!(!service.is_signed_in());
        assert_eq!(store.get(SESSION_SLOT).unwrap(), None);

        // Second sign-out is harmless
        service.sign_out().unwrap();
        assert!(!service.is_signed_in());
        assert_eq!(store.get(SESSION_SLOT).unwrap(), None);
    }

    #[tokio::test]
    async fn test_credit_writes_through() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Arc::clone(&store));
        service.sign_in().await.unwrap();

        for (amount, expected) in [(0, 125), (1, 126), (10, 136), (1000, 1136)] {
            assert_eq!(service.credit(amount).unwrap(), Some(expected));
            assert_eq!(service.balance(), Some(expected));
            assert_eq!(stored_snapshot(&store).unwrap().coins, expected);
        }
    }

    #[test]
    fn test_credit_without_session_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Arc::clone(&store));

        assert_eq!(service.credit(5).unwrap(), None);
        assert!(!service.is_signed_in());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_credit_overflow_leaves_state_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Arc::clone(&store));
        service.sign_in().await.unwrap();

        assert!(service.credit(u64::MAX).is_err());
        assert_eq!(service.balance(), Some(STARTING_COINS));
        assert_eq!(stored_snapshot(&store).unwrap().coins, STARTING_COINS);
    }

    #[tokio::test]
    async fn test_restore_after_restart() {
        let store = Arc::new(MemoryStore::new());
        {
            let service = service_with(Arc::clone(&store));
            service.sign_in().await.unwrap();
            service.credit(3).unwrap();
        }

        let restarted = service_with(Arc::clone(&store));
        assert!(!restarted.is_signed_in());
        assert_eq!(restarted.restore().unwrap(), RestoreOutcome::Restored);
        assert_eq!(restarted.balance(), Some(128));
        assert_eq!(restarted.require().unwrap().identity(), &demo_identity());
    }

    #[test]
    fn test_restore_without_snapshot() {
        let service = service_with(Arc::new(MemoryStore::new()));
        assert_eq!(service.restore().unwrap(), RestoreOutcome::Absent);
        assert!(matches!(service.require(), Err(Error::NotSignedIn)));
    }

    #[test]
    fn test_restore_discards_malformed_snapshot() {
        let store = Arc::new(MemoryStore::new());
        store
            .put(SESSION_SLOT, r#"{"id":"1","name":"Kwame","coins":-4}"#)
            .unwrap();
        let service = service_with(Arc::clone(&store));

        let outcome = service.restore().unwrap();
        assert!(matches!(outcome, RestoreOutcome::Discarded { .. }));
        assert!(!service.is_signed_in());
        assert_eq!(store.get(SESSION_SLOT).unwrap(), None);
    }

    struct FailingProvider;

    #[async_trait]
    impl IdentityProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn authenticate(&self) -> Result<Identity> {
            Err(Error::Identity("popup closed".to_string()))
        }
    }

    #[tokio::test]
    async fn test_provider_error_leaves_session_untouched() {
        let store = Arc::new(MemoryStore::new());
        let service = SessionService::new(store.clone(), Arc::new(FailingProvider));

        assert!(matches!(service.sign_in().await, Err(Error::Identity(_))));
        assert!(!service.is_signed_in());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_waits_for_provider() {
        let service = SessionService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(DemoIdentityProvider::new(Duration::from_millis(1000))),
        );
        let start = tokio::time::Instant::now();
        service.sign_in().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_readers_survive_poisoned_lock() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store);
        service.sign_in().await.unwrap();

        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = service.current.lock().unwrap();
            panic!("writer crashed");
        }));
        assert!(poisoned.is_err());

        assert!(service.is_signed_in());
        assert_eq!(service.balance(), Some(STARTING_COINS));
        assert!(service.require().is_ok());
    }
}
