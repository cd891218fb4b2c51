//! Posting questions and replies.
//!
//! Each submission runs the same pipeline: validate locally, check the
//! session, send once, and on success ask the feed to refresh. Validation
//! and session failures never touch the transport, and nothing is retried
//! automatically.

use std::sync::Arc;

use agora_shared::ports::Transport;
use agora_shared::protocol::{MutationOutcome, NewQuestion, NewReply};
use agora_shared::{QuestionId, SessionUser, TransportError};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::SubmissionError;
use crate::session_gate::SessionGate;
use crate::view_model::RefreshOutcome;

/// Something that can reload the feed after a successful mutation.
#[async_trait]
pub trait FeedRefresher: Send + Sync {
    /// Reload the feed with a fetch issued after this call began, so the
    /// mutation that preceded it is guaranteed to be visible.
    async fn refresh_after_mutation(&self) -> RefreshOutcome;
}

/// A submission the server accepted.
///
/// The follow-up refresh is reported separately: a failed refresh does not
/// make the submission a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub refresh: RefreshOutcome,
}

#[derive(Clone)]
pub struct SubmissionCoordinator {
    gate: SessionGate,
    transport: Arc<dyn Transport>,
    refresher: Arc<dyn FeedRefresher>,
}

impl SubmissionCoordinator {
    pub fn new(
        gate: SessionGate,
        transport: Arc<dyn Transport>,
        refresher: Arc<dyn FeedRefresher>,
    ) -> Self {
        Self {
            gate,
            transport,
            refresher,
        }
    }

    /// Ask a new question. The title is sent trimmed and the question body
    /// is sent empty.
    pub async fn submit_question(&self, title: &str) -> Result<SubmissionReceipt, SubmissionError> {
        ensure_not_blank(title, "title")?;
        let title = title.trim();
        let author = self.authorized_user().await?;

        info!(author = %author.id, "submitting question");
        let result = self
            .transport
            .create_question(NewQuestion {
                title: title.to_string(),
                body: String::new(),
                author_id: author.id,
            })
            .await;

        self.settle(result, "question").await
    }

    /// Reply to `question_id`. The body is sent exactly as typed.
    pub async fn submit_reply(
        &self,
        question_id: QuestionId,
        body: &str,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        ensure_not_blank(body, "reply")?;
        let author = self.authorized_user().await?;

        info!(author = %author.id, question = %question_id, "submitting reply");
        let result = self
            .transport
            .create_reply(NewReply {
                body: body.to_string(),
                question_id,
                author_id: author.id,
            })
            .await;

        self.settle(result, "reply").await
    }

    async fn authorized_user(&self) -> Result<SessionUser, SubmissionError> {
        let session = self.gate.check_session().await?;
        session.active_user().cloned().ok_or_else(|| {
            info!("submission blocked, no signed-in user");
            SubmissionError::AuthRequired
        })
    }

    async fn settle(
        &self,
        result: Result<MutationOutcome, TransportError>,
        kind: &'static str,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        match result {
            Ok(MutationOutcome::Created) => {
                info!(kind, "submission accepted, refreshing feed");
                let refresh = self.refresher.refresh_after_mutation().await;
                Ok(SubmissionReceipt { refresh })
            }
            Ok(MutationOutcome::Rejected { server_message }) => {
                warn!(kind, message = ?server_message, "submission rejected by server");
                Err(SubmissionError::Server {
                    message: server_message,
                })
            }
            Err(e) => {
                warn!(kind, error = %e, "submission failed");
                Err(e.into())
            }
        }
    }
}

fn ensure_not_blank(input: &str, field: &'static str) -> Result<(), SubmissionError> {
    if input.trim().is_empty() {
        Err(SubmissionError::Validation { field })
    } else {
        Ok(())
    }
}
