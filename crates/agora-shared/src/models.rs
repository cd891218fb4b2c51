//! Domain model handed from the client core to the presentation layer.
//!
//! These structs are normalized from the wire DTOs in [`crate::protocol`]
//! and are never mutated after construction; a new feed fetch produces new
//! values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{QuestionId, ReplyId, Role, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Author of a question or reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reply {
    pub id: ReplyId,
    pub body: String,
    /// Absent when the backend omitted or garbled the timestamp.
    pub created_at: Option<DateTime<Utc>>,
    pub author: User,
}

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    /// Empty when the question has no description.
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub author: User,
    /// Replies in the order the backend sent them. Display order is derived
    /// on read by the client's ranker.
    pub replies: Vec<Reply>,
}

impl Question {
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The signed-in user as known from local storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: UserId,
    pub display_name: Option<String>,
}

/// Authentication state derived from a fresh session store read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            user: None,
        }
    }

    pub fn authenticated(user: SessionUser) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
        }
    }

    /// The signed-in user, only when the session is authenticated.
    pub fn active_user(&self) -> Option<&SessionUser> {
        if self.is_authenticated {
            self.user.as_ref()
        } else {
            None
        }
    }
}

/// Raw persisted session entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecord {
    pub is_logged_in: bool,
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
}

impl SessionRecord {
    /// A record is only a valid login when the flag is set and a user id is
    /// stored alongside it.
    pub fn into_session(self) -> Session {
        match (self.is_logged_in, self.user_id) {
            (true, Some(id)) => Session::authenticated(SessionUser {
                id,
                display_name: self.user_name,
            }),
            _ => Session::anonymous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logged_in_record_without_user_is_anonymous() {
        let record = SessionRecord {
            is_logged_in: true,
            user_id: None,
            user_name: Some("Ana".into()),
        };
        assert_eq!(record.into_session(), Session::anonymous());
    }

    #[test]
    fn test_user_without_flag_is_anonymous() {
        let record = SessionRecord {
            is_logged_in: false,
            user_id: Some(UserId(3)),
            user_name: None,
        };
        let session = record.into_session();
        assert!(!session.is_authenticated);
        assert!(session.active_user().is_none());
    }

    #[test]
    fn test_complete_record_is_authenticated() {
        let record = SessionRecord {
            is_logged_in: true,
            user_id: Some(UserId(3)),
            user_name: Some("Ana".into()),
        };
        let session = record.into_session();
        assert!(session.is_authenticated);
        assert_eq!(session.active_user().map(|u| u.id), Some(UserId(3)));
    }
}
