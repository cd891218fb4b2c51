//! Sign-in and sign-out.
//!
//! A successful login is persisted through the [`SessionStore`] so that
//! [`crate::session_gate::SessionGate`] sees it on its next check.

use std::sync::Arc;

use agora_shared::ports::{SessionStore, Transport};
use agora_shared::protocol::{Credentials, LoginOutcome};
use agora_shared::{SessionRecord, SessionUser};
use tracing::{info, warn};

use crate::error::{AuthError, StorageFailure};

#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn SessionStore>) -> Self {
        Self { transport, store }
    }

    /// Log in and persist the session.
    ///
    /// The password is sent as given; only the email is trimmed.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation);
        }

        let outcome = self
            .transport
            .login(Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(|e| {
                warn!(error = %e, "login request failed");
                AuthError::from(e)
            })?;

        let user = match outcome {
            LoginOutcome::Accepted(user) => user,
            LoginOutcome::Rejected { server_message } => {
                info!(message = ?server_message, "login rejected");
                return Err(AuthError::InvalidCredentials {
                    message: server_message,
                });
            }
        };

        let record = SessionRecord {
            is_logged_in: true,
            user_id: Some(user.id),
            user_name: Some(user.name.clone()),
        };
        self.store.write(&record).await.map_err(|e| {
            warn!(error = %e, "failed to persist session");
            StorageFailure(e)
        })?;

        info!(user = %user.id, "signed in");
        Ok(SessionUser {
            id: user.id,
            display_name: Some(user.name),
        })
    }

    /// Drop the persisted session.
    pub async fn sign_out(&self) -> Result<(), StorageFailure> {
        self.store.clear().await?;
        info!("signed out");
        Ok(())
    }

    /// The signed-in user for greeting purposes. `None` when signed out or
    /// when the store cannot be read.
    pub async fn current_user(&self) -> Option<SessionUser> {
        match self.store.read().await {
            Ok(record) => record.into_session().active_user().cloned(),
            Err(e) => {
                warn!(error = %e, "session read failed, showing no user");
                None
            }
        }
    }
}
