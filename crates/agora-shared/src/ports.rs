//! Collaborator interfaces the client core is written against.
//!
//! The core never talks HTTP or SQLite directly. `agora-net` and
//! `agora-store` provide the production adapters; tests substitute
//! in-memory doubles.

use async_trait::async_trait;

use crate::error::{StorageError, TransportError};
use crate::models::SessionRecord;
use crate::protocol::{
    Credentials, LoginOutcome, MutationOutcome, NewQuestion, NewReply, QuestionDto,
};

/// Request/response access to the Q&A backend.
///
/// Timeouts are the implementation's concern; an expired request is
/// reported as [`TransportError::Unreachable`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Every question with its nested replies and authors.
    async fn list_questions(&self) -> Result<Vec<QuestionDto>, TransportError>;

    async fn create_question(&self, payload: NewQuestion)
        -> Result<MutationOutcome, TransportError>;

    async fn create_reply(&self, payload: NewReply) -> Result<MutationOutcome, TransportError>;

    async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, TransportError>;
}

/// Persisted local session state.
///
/// Implementations must not cache across calls: a sign-out performed
/// elsewhere has to be visible on the next [`SessionStore::read`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn read(&self) -> Result<SessionRecord, StorageError>;

    async fn write(&self, record: &SessionRecord) -> Result<(), StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;
}
