//! Wire DTOs exchanged with the Q&A backend.
//!
//! Field names follow the backend's JSON contract. Everything the backend
//! has been seen to omit is optional here; normalization into
//! [`crate::models`] happens in the client core.

use serde::{Deserialize, Serialize};

use crate::types::{QuestionId, ReplyId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: UserId,
    #[serde(rename = "nome", default)]
    pub name: String,
    /// Raw role spelling; absent on older payloads.
    #[serde(rename = "tipo", default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyDto {
    pub id: ReplyId,
    #[serde(rename = "descricao", default)]
    pub body: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "usuario")]
    pub author: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionDto {
    pub id: QuestionId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub body: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "usuario")]
    pub author: UserDto,
    #[serde(rename = "respostas", default)]
    pub replies: Option<Vec<ReplyDto>>,
}

/// Body of a create-question request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewQuestion {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub body: String,
    #[serde(rename = "usuarioId")]
    pub author_id: UserId,
}

/// Body of a create-reply request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewReply {
    #[serde(rename = "descricao")]
    pub body: String,
    #[serde(rename = "perguntaId")]
    pub question_id: QuestionId,
    #[serde(rename = "usuarioId")]
    pub author_id: UserId,
}

/// Body of a login request.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

// Keep passwords out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of a mutation that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Created,
    Rejected { server_message: Option<String> },
}

/// Result of a login request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted(UserDto),
    Rejected { server_message: Option<String> },
}
