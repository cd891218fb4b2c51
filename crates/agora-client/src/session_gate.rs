//! Session check performed before every mutating action.

use std::sync::Arc;

use agora_shared::ports::SessionStore;
use agora_shared::Session;
use tracing::{debug, warn};

use crate::error::StorageFailure;

/// Reads the persisted session on every call.
///
/// Nothing is cached, so a sign-out performed elsewhere is seen on the next
/// check.
#[derive(Clone)]
pub struct SessionGate {
    store: Arc<dyn SessionStore>,
}

impl SessionGate {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Current session. "Signed out" is an `Ok` anonymous session; only a
    /// storage fault is an error, and callers must then fail closed.
    pub async fn check_session(&self) -> Result<Session, StorageFailure> {
        match self.store.read().await {
            Ok(record) => {
                let session = record.into_session();
                debug!(
                    authenticated = session.is_authenticated,
                    user = ?session.active_user().map(|u| u.id),
                    "session checked"
                );
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "session read failed, treating as signed out");
                Err(StorageFailure(e))
            }
        }
    }

    /// Fail-closed view: an anonymous session when storage is broken, with
    /// the failure returned alongside for display.
    pub async fn session_or_anonymous(&self) -> (Session, Option<StorageFailure>) {
        match self.check_session().await {
            Ok(session) => (session, None),
            Err(failure) => (Session::anonymous(), Some(failure)),
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{signed_in, FakeSessionStore};
    use agora_shared::{StorageError, UserId};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_signed_out_is_not_an_error() {
        let gate = SessionGate::new(Arc::new(FakeSessionStore::signed_out()));
        let session = gate.check_session().await.unwrap();
        assert!(!session.is_authenticated);
    }

    #[tokio::test]
    async fn test_signed_in_user() {
        let gate = SessionGate::new(Arc::new(FakeSessionStore::new(signed_in(4))));
        let session = gate.check_session().await.unwrap();
        assert_eq!(session.active_user().map(|u| u.id), Some(UserId(4)));
    }

    #[tokio::test]
    async fn test_storage_failure_fails_closed() {
        let gate = SessionGate::new(Arc::new(FakeSessionStore::failing(
            StorageError::Unavailable("disk gone".into()),
        )));

        assert!(gate.check_session().await.is_err());

        let (session, failure) = gate.session_or_anonymous().await;
        assert!(!session.is_authenticated);
        assert!(failure.is_some());
    }

    #[tokio::test]
    async fn test_every_check_reads_the_store() {
        let store = Arc::new(FakeSessionStore::new(signed_in(1)));
        let gate = SessionGate::new(store.clone());

        gate.check_session().await.unwrap();
        store.clear().await.unwrap();
        let session = gate.check_session().await.unwrap();

        assert!(!session.is_authenticated);
        assert_eq!(store.reads.load(Ordering::SeqCst), 2);
    }
}
