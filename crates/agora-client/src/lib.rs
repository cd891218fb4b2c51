//! # agora-client
//!
//! Client core of the Agora Q&A forum: feed fetching and ranking, question
//! and reply submission gated on the persisted session, and sign-in.
//!
//! The presentation layer owns an [`AppState`] (or a bare [`FeedViewModel`]
//! built over its own [`agora_shared::ports::Transport`]) and renders the
//! [`FeedSnapshot`]s it publishes.

pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod ranker;
pub mod session_gate;
pub mod state;
pub mod submission;
pub mod view_model;

#[cfg(test)]
mod test_support;

use agora_shared::constants::APP_NAME;
use tracing_subscriber::{fmt, EnvFilter};

pub use auth::AuthService;
pub use config::ClientConfig;
pub use error::{AuthError, ClientError, FetchFailure, StorageFailure, SubmissionError};
pub use feed::{Feed, FeedRepository};
pub use session_gate::SessionGate;
pub use state::AppState;
pub use submission::{FeedRefresher, SubmissionCoordinator, SubmissionReceipt};
pub use view_model::{FeedSnapshot, FeedState, FeedViewModel, Phase, QuestionView, RefreshOutcome};

/// Install a `tracing` subscriber honouring `RUST_LOG`.
///
/// Embedders that configure tracing themselves should not call this. A
/// second call is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("agora_client=debug,agora_net=debug,agora_store=info,warn")
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();

    tracing::info!(app = APP_NAME, "client tracing initialised");
}
