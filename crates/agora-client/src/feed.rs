//! Feed fetching and normalization.
//!
//! A [`Feed`] is always built from one complete `list_questions` response.
//! Nothing is merged into a previous feed: the caller swaps the whole value
//! in on success and keeps what it had on failure.

use std::sync::Arc;

use agora_shared::ports::Transport;
use agora_shared::protocol::{QuestionDto, ReplyDto, UserDto};
use agora_shared::{Question, QuestionId, Reply, Role, User};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::FetchFailure;
use crate::ranker;

/// Questions ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    questions: Vec<Question>,
}

impl Feed {
    /// Build a feed, sorting `questions` by creation time, newest first.
    /// Undated questions go last; ties keep their input order.
    pub fn new(mut questions: Vec<Question>) -> Self {
        questions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Replies of one question in display order.
    pub fn ranked_replies(&self, id: QuestionId) -> Option<Vec<Reply>> {
        self.question(id).map(ranker::ranked_replies)
    }
}

/// Fetches the question list from the backend.
#[derive(Clone)]
pub struct FeedRepository {
    transport: Arc<dyn Transport>,
}

impl FeedRepository {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch and normalize the full feed.
    pub async fn fetch_feed(&self) -> Result<Feed, FetchFailure> {
        debug!("fetching feed");
        let dtos = self.transport.list_questions().await.map_err(|cause| {
            warn!(error = %cause, "feed fetch failed");
            FetchFailure { cause }
        })?;

        let feed = Feed::new(dtos.into_iter().map(normalize_question).collect());
        info!(questions = feed.len(), "feed fetched");
        Ok(feed)
    }
}

pub fn normalize_question(dto: QuestionDto) -> Question {
    let created_at = parse_timestamp(dto.created_at.as_deref());
    if created_at.is_none() {
        debug!(question = %dto.id, "question has no usable timestamp");
    }

    Question {
        id: dto.id,
        title: dto.title,
        body: dto.body.unwrap_or_default(),
        created_at,
        author: normalize_user(dto.author),
        replies: dto
            .replies
            .unwrap_or_default()
            .into_iter()
            .map(normalize_reply)
            .collect(),
    }
}

fn normalize_reply(dto: ReplyDto) -> Reply {
    Reply {
        id: dto.id,
        body: dto.body,
        created_at: parse_timestamp(dto.created_at.as_deref()),
        author: normalize_user(dto.author),
    }
}

fn normalize_user(dto: UserDto) -> User {
    User {
        id: dto.id,
        display_name: dto.name,
        role: dto.role.map(Role::from).unwrap_or(Role::Unknown(String::new())),
    }
}

/// RFC 3339 timestamp, or `None` when absent or unparseable.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!(value = raw, error = %e, "ignoring unparseable timestamp");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{question_dto, reply_dto, FakeTransport};
    use agora_shared::TransportError;

    const T1: &str = "2024-03-01T09:00:00Z";
    const T2: &str = "2024-03-02T09:00:00Z";

    fn repo(transport: FakeTransport) -> FeedRepository {
        FeedRepository::new(Arc::new(transport))
    }

    fn ids(feed: &Feed) -> Vec<i64> {
        feed.questions().iter().map(|q| q.id.0).collect()
    }

    #[tokio::test]
    async fn test_newest_question_first() {
        let transport = FakeTransport::with_lists(vec![Ok(vec![
            question_dto(2, Some(T1), vec![]),
            question_dto(1, Some(T2), vec![]),
        ])]);
        let feed = repo(transport).fetch_feed().await.unwrap();
        assert_eq!(ids(&feed), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_missing_and_garbled_timestamps_sort_last() {
        let transport = FakeTransport::with_lists(vec![Ok(vec![
            question_dto(1, None, vec![]),
            question_dto(2, Some("yesterday"), vec![]),
            question_dto(3, Some(T1), vec![]),
        ])]);
        let feed = repo(transport).fetch_feed().await.unwrap();
        assert_eq!(ids(&feed), vec![3, 1, 2]);
        assert_eq!(feed.questions()[1].created_at, None);
    }

    #[tokio::test]
    async fn test_fetch_is_idempotent() {
        let transport = FakeTransport::with_lists(vec![Ok(vec![
            question_dto(1, Some(T1), vec![reply_dto(1, "ALUNO", Some(T2))]),
            question_dto(2, Some(T2), vec![]),
        ])]);
        let repo = repo(transport);
        let first = repo.fetch_feed().await.unwrap();
        let second = repo.fetch_feed().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_transport_failure_carries_cause() {
        let transport = FakeTransport::with_lists(vec![Err(TransportError::Malformed(
            "expected array".into(),
        ))]);
        let err = repo(transport).fetch_feed().await.unwrap_err();
        assert_eq!(err.cause, TransportError::Malformed("expected array".into()));
    }

    #[test]
    fn test_normalization_fills_defaults() {
        let mut dto = question_dto(5, Some(T1), vec![]);
        dto.replies = None;
        dto.author.role = None;
        let question = normalize_question(dto);
        assert!(question.replies.is_empty());
        assert_eq!(question.body, "");
        assert!(!question.has_body());
        assert_eq!(question.author.role, Role::Unknown(String::new()));
    }

    #[test]
    fn test_replies_keep_wire_order_until_ranked() {
        let question = normalize_question(question_dto(
            1,
            Some(T1),
            vec![
                reply_dto(1, "ALUNO", Some(T1)),
                reply_dto(2, "PROFESSOR", Some(T1)),
            ],
        ));
        let feed = Feed::new(vec![question]);
        let stored: Vec<i64> = feed.questions()[0].replies.iter().map(|r| r.id.0).collect();
        let ranked: Vec<i64> = feed
            .ranked_replies(QuestionId(1))
            .unwrap()
            .iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(stored, vec![1, 2]);
        assert_eq!(ranked, vec![2, 1]);
    }
}
