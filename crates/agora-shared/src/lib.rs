//! # agora-shared
//!
//! Types shared by every Agora crate: the question/reply domain model, the
//! wire DTOs exchanged with the backend, the collaborator ports the client
//! core is written against, and the errors those ports report.

pub mod constants;
pub mod error;
pub mod models;
pub mod ports;
pub mod protocol;
pub mod types;

pub use error::{StorageError, TransportError};
pub use models::{Question, Reply, Session, SessionRecord, SessionUser, User};
pub use types::{QuestionId, ReplyId, Role, UserId};
