//! [`Transport`] implementation over HTTP/JSON.
//!
//! Failure mapping:
//! - no response (connect error, timeout, body cut off) -> [`TransportError::Unreachable`]
//! - mutation answered with anything but `201 Created` -> [`MutationOutcome::Rejected`]
//!   carrying the body's `error` / `erro` / `message` field when present
//! - list answered with a non-success status -> [`TransportError::Status`]
//! - undecodable success body -> [`TransportError::Malformed`]

use std::time::Duration;

use agora_shared::ports::Transport;
use agora_shared::protocol::{
    Credentials, LoginOutcome, MutationOutcome, NewQuestion, NewReply, QuestionDto, UserDto,
};
use agora_shared::TransportError;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::NetError;
use crate::routes::Routes;

/// HTTP client bound to one backend instance.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    routes: Routes,
}

impl HttpTransport {
    /// Build a transport for `base_url`. `timeout` bounds each whole request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NetError> {
        let routes = Routes::new(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        debug!(base = %routes.base(), ?timeout, "HTTP transport ready");
        Ok(Self { client, routes })
    }

    pub fn base_url(&self) -> &Url {
        self.routes.base()
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<Response, TransportError> {
        self.client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| no_response(&url, e))
    }

    async fn post_mutation<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<MutationOutcome, TransportError> {
        let resp = self.post_json(url.clone(), body).await?;
        let status = resp.status();

        if status == StatusCode::CREATED {
            debug!(url = %url, "mutation accepted");
            return Ok(MutationOutcome::Created);
        }

        let text = read_body(&url, resp).await?;
        let server_message = rejection_message(&text).or_else(|| {
            // A 2xx that is not 201 did not create anything we can rely on
            status
                .is_success()
                .then(|| format!("Unexpected status {}", status.as_u16()))
        });
        warn!(url = %url, status = status.as_u16(), message = ?server_message, "mutation rejected");
        Ok(MutationOutcome::Rejected { server_message })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn list_questions(&self) -> Result<Vec<QuestionDto>, TransportError> {
        let url = self.routes.questions();
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| no_response(&url, e))?;

        let status = resp.status();
        let text = read_body(&url, resp).await?;

        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "question list request failed");
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: rejection_message(&text),
            });
        }

        let questions: Vec<QuestionDto> =
            serde_json::from_str(&text).map_err(|e| TransportError::Malformed(e.to_string()))?;
        debug!(count = questions.len(), "question list received");
        Ok(questions)
    }

    async fn create_question(
        &self,
        payload: NewQuestion,
    ) -> Result<MutationOutcome, TransportError> {
        self.post_mutation(self.routes.questions(), &payload).await
    }

    async fn create_reply(&self, payload: NewReply) -> Result<MutationOutcome, TransportError> {
        self.post_mutation(self.routes.replies(), &payload).await
    }

    async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, TransportError> {
        let url = self.routes.login();
        let resp = self.post_json(url.clone(), &credentials).await?;
        let status = resp.status();
        let text = read_body(&url, resp).await?;

        if status.is_success() {
            let user: UserDto = serde_json::from_str(&text)
                .map_err(|e| TransportError::Malformed(e.to_string()))?;
            debug!(user = %user.id, "login accepted");
            Ok(LoginOutcome::Accepted(user))
        } else {
            debug!(status = status.as_u16(), "login rejected");
            Ok(LoginOutcome::Rejected {
                server_message: rejection_message(&text),
            })
        }
    }
}

fn no_response(url: &Url, e: reqwest::Error) -> TransportError {
    warn!(url = %url, error = %e, "request got no response");
    TransportError::Unreachable(e.to_string())
}

async fn read_body(url: &Url, resp: Response) -> Result<String, TransportError> {
    resp.text().await.map_err(|e| no_response(url, e))
}

/// Extract a human-readable message from an error body.
///
/// The backend is inconsistent about the field name, so `error`, `erro` and
/// `message` are all accepted. Blank messages count as absent.
pub fn rejection_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "erro", "message"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}
