//! Wiring of the client core.
//!
//! [`AppState`] builds the concrete transport and session store from a
//! [`ClientConfig`] and hands them to the services the presentation layer
//! talks to.

use std::sync::Arc;

use agora_net::HttpTransport;
use agora_shared::ports::{SessionStore, Transport};
use agora_store::{Database, SqliteSessionStore};
use tracing::info;

use crate::auth::AuthService;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session_gate::SessionGate;
use crate::view_model::FeedViewModel;

/// Central application state.
pub struct AppState {
    pub config: ClientConfig,

    /// Feed screen state and the question/reply submission entry points.
    pub view_model: FeedViewModel,

    /// Sign-in, sign-out and greeting lookups.
    pub auth: AuthService,

    /// Direct session checks, for screens that only need to know whether
    /// someone is signed in.
    pub gate: SessionGate,
}

impl AppState {
    /// Open the session database and build the HTTP transport.
    ///
    /// The feed is not fetched here; call [`FeedViewModel::mount`].
    pub fn open(config: ClientConfig) -> Result<Self, ClientError> {
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new(&config.api_url, config.http_timeout)?);

        let db = match &config.session_db_path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                Database::open_at(path)?
            }
            None => Database::new()?,
        };
        info!(path = ?db.path(), api = %config.api_url, "client state opened");

        let store: Arc<dyn SessionStore> = Arc::new(SqliteSessionStore::new(db));
        let gate = SessionGate::new(store);
        let auth = AuthService::new(Arc::clone(&transport), Arc::clone(gate.store()));
        let view_model = FeedViewModel::new(transport, gate.clone());

        Ok(Self {
            config,
            view_model,
            auth,
            gate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_model::Phase;

    fn config_in(dir: &tempfile::TempDir) -> ClientConfig {
        ClientConfig {
            api_url: "http://127.0.0.1:9".into(),
            session_db_path: Some(dir.path().join("nested").join("session.db")),
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn test_open_creates_database_and_starts_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(config_in(&dir)).unwrap();

        assert!(dir.path().join("nested").join("session.db").exists());
        assert_eq!(state.view_model.snapshot().phase, Phase::Loading);
        assert!(!state.gate.check_session().await.unwrap().is_authenticated);
        assert_eq!(state.auth.current_user().await, None);
    }

    #[test]
    fn test_invalid_api_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            api_url: "not a url".into(),
            ..config_in(&dir)
        };
        assert!(matches!(AppState::open(config), Err(ClientError::Net(_))));
    }
}
