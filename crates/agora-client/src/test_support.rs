//! In-memory doubles for the transport and session store.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use agora_shared::ports::{SessionStore, Transport};
use agora_shared::protocol::{
    Credentials, LoginOutcome, MutationOutcome, NewQuestion, NewReply, QuestionDto, ReplyDto,
    UserDto,
};
use agora_shared::{QuestionId, ReplyId, SessionRecord, StorageError, TransportError, UserId};
use async_trait::async_trait;
use tokio::sync::Semaphore;

pub fn user_dto(id: i64, name: &str, role: &str) -> UserDto {
    UserDto {
        id: UserId(id),
        name: name.to_string(),
        role: Some(role.to_string()),
    }
}

pub fn reply_dto(id: i64, role: &str, created_at: Option<&str>) -> ReplyDto {
    ReplyDto {
        id: ReplyId(id),
        body: format!("reply {id}"),
        created_at: created_at.map(str::to_string),
        author: user_dto(100 + id, &format!("author {id}"), role),
    }
}

pub fn question_dto(id: i64, created_at: Option<&str>, replies: Vec<ReplyDto>) -> QuestionDto {
    QuestionDto {
        id: QuestionId(id),
        title: format!("question {id}"),
        body: None,
        created_at: created_at.map(str::to_string),
        author: user_dto(1, "asker", "ALUNO"),
        replies: Some(replies),
    }
}

pub fn signed_in(id: i64) -> SessionRecord {
    SessionRecord {
        is_logged_in: true,
        user_id: Some(UserId(id)),
        user_name: Some(format!("user {id}")),
    }
}

/// Scripted [`Transport`].
///
/// List responses are served in order; the last one repeats. When gated,
/// each list call waits for a permit from [`FakeTransport::release`].
#[derive(Default)]
pub struct FakeTransport {
    lists: Mutex<VecDeque<Result<Vec<QuestionDto>, TransportError>>>,
    mutation: Mutex<Option<Result<MutationOutcome, TransportError>>>,
    login: Mutex<Option<Result<LoginOutcome, TransportError>>>,
    gate: Option<Arc<Semaphore>>,
    pub list_calls: AtomicUsize,
    pub question_calls: AtomicUsize,
    pub reply_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
    pub sent_questions: Mutex<Vec<NewQuestion>>,
    pub sent_replies: Mutex<Vec<NewReply>>,
}

impl FakeTransport {
    pub fn with_lists(lists: Vec<Result<Vec<QuestionDto>, TransportError>>) -> Self {
        Self {
            lists: Mutex::new(lists.into()),
            ..Self::default()
        }
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn set_mutation(&self, outcome: Result<MutationOutcome, TransportError>) {
        *self.mutation.lock().unwrap() = Some(outcome);
    }

    pub fn set_login(&self, outcome: Result<LoginOutcome, TransportError>) {
        *self.login.lock().unwrap() = Some(outcome);
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn mutations(&self) -> usize {
        self.question_calls.load(Ordering::SeqCst) + self.reply_calls.load(Ordering::SeqCst)
    }

    fn next_list(&self) -> Result<Vec<QuestionDto>, TransportError> {
        let mut lists = self.lists.lock().unwrap();
        if lists.len() > 1 {
            lists.pop_front().unwrap()
        } else {
            lists.front().cloned().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn mutation_outcome(&self) -> Result<MutationOutcome, TransportError> {
        self.mutation
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Ok(MutationOutcome::Created))
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn list_questions(&self) -> Result<Vec<QuestionDto>, TransportError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.next_list()
    }

    async fn create_question(
        &self,
        payload: NewQuestion,
    ) -> Result<MutationOutcome, TransportError> {
        self.question_calls.fetch_add(1, Ordering::SeqCst);
        self.sent_questions.lock().unwrap().push(payload);
        self.mutation_outcome()
    }

    async fn create_reply(&self, payload: NewReply) -> Result<MutationOutcome, TransportError> {
        self.reply_calls.fetch_add(1, Ordering::SeqCst);
        self.sent_replies.lock().unwrap().push(payload);
        self.mutation_outcome()
    }

    async fn login(&self, _credentials: Credentials) -> Result<LoginOutcome, TransportError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login.lock().unwrap().clone().unwrap_or(Ok(LoginOutcome::Rejected {
            server_message: None,
        }))
    }
}

/// [`SessionStore`] holding a single record, or a scripted failure.
pub struct FakeSessionStore {
    state: Mutex<Result<SessionRecord, StorageError>>,
    pub reads: AtomicUsize,
}

impl FakeSessionStore {
    pub fn new(record: SessionRecord) -> Self {
        Self {
            state: Mutex::new(Ok(record)),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn signed_out() -> Self {
        Self::new(SessionRecord::default())
    }

    pub fn failing(error: StorageError) -> Self {
        Self {
            state: Mutex::new(Err(error)),
            reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SessionStore for FakeSessionStore {
    async fn read(&self) -> Result<SessionRecord, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().clone()
    }

    async fn write(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        if let Err(e) = &*state {
            return Err(e.clone());
        }
        *state = Ok(record.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        if let Err(e) = &*state {
            return Err(e.clone());
        }
        *state = Ok(SessionRecord::default());
        Ok(())
    }
}
