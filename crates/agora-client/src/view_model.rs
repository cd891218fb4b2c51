//! Feed state owned on behalf of the presentation layer.
//!
//! [`FeedViewModel`] is the composition root of the client core. It owns the
//! current [`Feed`], runs fetches through [`FeedRepository`], routes
//! submissions through [`SubmissionCoordinator`] and publishes read-only
//! [`FeedSnapshot`]s with replies in ranked order.
//!
//! At most one fetch is in flight. Refresh requests that arrive while a
//! fetch is running join it and receive the same [`RefreshOutcome`]. Each
//! fetch is tagged with a sequence number and the mount epoch it started
//! in; a result whose epoch has ended (the view was unmounted) or that is
//! older than the last applied one is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use agora_shared::ports::Transport;
use agora_shared::{Question, QuestionId, Reply, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{FetchFailure, SubmissionError};
use crate::feed::{Feed, FeedRepository};
use crate::ranker;
use crate::session_gate::SessionGate;
use crate::submission::{FeedRefresher, SubmissionCoordinator, SubmissionReceipt};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// Unmounted. Fetch results are ignored.
    Idle,
    /// First load, nothing to show yet.
    Loading,
    /// Reloading; the feed on screen (if any) stays visible.
    Refreshing(Option<Arc<Feed>>),
    Ready(Arc<Feed>),
    /// Load failed with nothing to fall back on.
    Failed(FetchFailure),
}

impl FeedState {
    /// The feed currently on screen.
    pub fn feed(&self) -> Option<&Arc<Feed>> {
        match self {
            Self::Ready(feed) | Self::Refreshing(Some(feed)) => Some(feed),
            _ => None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Loading => Phase::Loading,
            Self::Refreshing(_) => Phase::Refreshing,
            Self::Ready(_) => Phase::Ready,
            Self::Failed(_) => Phase::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Refreshing,
    Ready,
    Failed,
}

/// What a refresh request ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated(Arc<Feed>),
    Failed(FetchFailure),
    /// The result arrived after the view was unmounted, or the view was not
    /// mounted to begin with.
    Discarded,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A question as presented: replies already ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: QuestionId,
    pub title: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub author: User,
    pub reply_count: usize,
    pub replies: Vec<Reply>,
}

impl QuestionView {
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id,
            title: question.title.clone(),
            body: question.body.clone(),
            created_at: question.created_at,
            author: question.author.clone(),
            reply_count: question.reply_count(),
            replies: ranker::ranked_replies(question),
        }
    }
}

/// Read-only view of the feed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub phase: Phase,
    pub questions: Vec<QuestionView>,
    /// Set in [`Phase::Failed`].
    pub error: Option<FetchFailure>,
    /// A refresh failed while an older feed stayed on screen.
    pub notice: Option<FetchFailure>,
}

impl FeedSnapshot {
    fn of(inner: &Inner) -> Self {
        let questions = inner
            .state
            .feed()
            .map(|feed| feed.questions().iter().map(QuestionView::from_question).collect())
            .unwrap_or_default();
        let error = match &inner.state {
            FeedState::Failed(e) => Some(e.clone()),
            _ => None,
        };

        Self {
            phase: inner.state.phase(),
            questions,
            error,
            notice: inner.notice.clone(),
        }
    }

    pub fn question(&self, id: QuestionId) -> Option<&QuestionView> {
        self.questions.iter().find(|q| q.id == id)
    }
}

// ---------------------------------------------------------------------------
// Fetch coordination
// ---------------------------------------------------------------------------

type SharedFetch = Shared<BoxFuture<'static, RefreshOutcome>>;

struct InFlight {
    seq: u64,
    fetch: SharedFetch,
}

struct Inner {
    state: FeedState,
    notice: Option<FetchFailure>,
    mounted: bool,
    /// Bumped on unmount; fetches from an older epoch are stale.
    epoch: u64,
    next_seq: u64,
    applied_seq: u64,
    in_flight: Option<InFlight>,
}

struct Core {
    me: Weak<Core>,
    repository: FeedRepository,
    inner: Mutex<Inner>,
    snapshots: watch::Sender<FeedSnapshot>,
}

impl Core {
    fn new(repository: FeedRepository) -> Arc<Self> {
        let inner = Inner {
            state: FeedState::Loading,
            notice: None,
            mounted: true,
            epoch: 0,
            next_seq: 1,
            applied_seq: 0,
            in_flight: None,
        };
        let (snapshots, _) = watch::channel(FeedSnapshot::of(&inner));

        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            repository,
            inner: Mutex::new(inner),
            snapshots,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.snapshots.send_replace(FeedSnapshot::of(inner));
    }

    /// Wait for a fetch numbered `min_seq` or later and return its outcome.
    async fn refresh_from(&self, min_seq: u64) -> RefreshOutcome {
        loop {
            let Some((seq, fetch)) = self.join_or_start() else {
                debug!("refresh ignored, view not mounted");
                return RefreshOutcome::Discarded;
            };
            let outcome = fetch.await;
            if seq >= min_seq {
                return outcome;
            }
            debug!(seq, min_seq, "joined fetch predates request, fetching again");
        }
    }

    /// Join the running fetch, or start one. `None` when unmounted.
    fn join_or_start(&self) -> Option<(u64, SharedFetch)> {
        let mut inner = self.lock();
        if !inner.mounted {
            return None;
        }

        if let Some(running) = &inner.in_flight {
            debug!(seq = running.seq, "coalescing with in-flight fetch");
            return Some((running.seq, running.fetch.clone()));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        let epoch = inner.epoch;

        let previous = std::mem::replace(&mut inner.state, FeedState::Loading);
        inner.state = match previous {
            FeedState::Ready(feed) => FeedState::Refreshing(Some(feed)),
            FeedState::Refreshing(feed) => FeedState::Refreshing(feed),
            _ => FeedState::Loading,
        };

        let repository = self.repository.clone();
        let me = self.me.clone();
        let fetch = async move {
            let result = repository.fetch_feed().await;
            match me.upgrade() {
                Some(core) => core.apply(seq, epoch, result),
                None => RefreshOutcome::Discarded,
            }
        }
        .boxed()
        .shared();

        inner.in_flight = Some(InFlight {
            seq,
            fetch: fetch.clone(),
        });
        debug!(seq, epoch, "fetch started");
        self.publish(&inner);

        Some((seq, fetch))
    }

    fn apply(&self, seq: u64, epoch: u64, result: Result<Feed, FetchFailure>) -> RefreshOutcome {
        let mut inner = self.lock();
        if inner.in_flight.as_ref().map(|f| f.seq) == Some(seq) {
            inner.in_flight = None;
        }

        if !inner.mounted || epoch != inner.epoch || seq <= inner.applied_seq {
            debug!(seq, epoch, current_epoch = inner.epoch, "discarding stale fetch result");
            return RefreshOutcome::Discarded;
        }
        inner.applied_seq = seq;

        let outcome = match result {
            Ok(feed) => {
                let feed = Arc::new(feed);
                info!(seq, questions = feed.len(), "feed updated");
                inner.state = FeedState::Ready(Arc::clone(&feed));
                inner.notice = None;
                RefreshOutcome::Updated(feed)
            }
            Err(failure) => {
                let previous = std::mem::replace(&mut inner.state, FeedState::Loading);
                match previous {
                    FeedState::Refreshing(Some(feed)) | FeedState::Ready(feed) => {
                        warn!(seq, error = %failure, "refresh failed, keeping previous feed");
                        inner.state = FeedState::Ready(feed);
                        inner.notice = Some(failure.clone());
                    }
                    _ => {
                        warn!(seq, error = %failure, "feed load failed");
                        inner.state = FeedState::Failed(failure.clone());
                        inner.notice = None;
                    }
                }
                RefreshOutcome::Failed(failure)
            }
        };

        self.publish(&inner);
        outcome
    }
}

#[async_trait]
impl FeedRefresher for Core {
    async fn refresh_after_mutation(&self) -> RefreshOutcome {
        // Any fetch numbered from here on starts after the mutation succeeded.
        let min_seq = self.lock().next_seq;
        self.refresh_from(min_seq).await
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

pub struct FeedViewModel {
    core: Arc<Core>,
    submissions: SubmissionCoordinator,
    gate: SessionGate,
}

impl FeedViewModel {
    /// Build a view model in the [`FeedState::Loading`] state. Call
    /// [`FeedViewModel::mount`] to run the initial fetch.
    pub fn new(transport: Arc<dyn Transport>, gate: SessionGate) -> Self {
        let core = Core::new(FeedRepository::new(Arc::clone(&transport)));
        let refresher: Arc<dyn FeedRefresher> = core.clone();
        let submissions = SubmissionCoordinator::new(gate.clone(), transport, refresher);

        Self {
            core,
            submissions,
            gate,
        }
    }

    /// Initial load. Also re-mounts a view model after [`FeedViewModel::unmount`].
    pub async fn mount(&self) -> RefreshOutcome {
        {
            let mut inner = self.core.lock();
            if !inner.mounted {
                inner.mounted = true;
                inner.state = FeedState::Loading;
                inner.notice = None;
                self.core.publish(&inner);
            }
        }
        info!("feed view mounted");
        self.core.refresh_from(0).await
    }

    /// Manual refresh. Joins a fetch that is already running.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.core.refresh_from(0).await
    }

    /// Tear down: results of fetches still running are discarded.
    pub fn unmount(&self) {
        let mut inner = self.core.lock();
        inner.mounted = false;
        inner.epoch += 1;
        inner.in_flight = None;
        inner.state = FeedState::Idle;
        inner.notice = None;
        self.core.publish(&inner);
        info!(epoch = inner.epoch, "feed view unmounted");
    }

    pub async fn submit_question(&self, title: &str) -> Result<SubmissionReceipt, SubmissionError> {
        self.submissions.submit_question(title).await
    }

    pub async fn submit_reply(
        &self,
        question_id: QuestionId,
        body: &str,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.submissions.submit_reply(question_id, body).await
    }

    pub fn state(&self) -> FeedState {
        self.core.lock().state.clone()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.core.snapshots.borrow().clone()
    }

    /// Receive a new snapshot on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.core.snapshots.subscribe()
    }

    /// Clear the transient refresh-failure notice.
    pub fn dismiss_notice(&self) {
        let mut inner = self.core.lock();
        if inner.notice.take().is_some() {
            self.core.publish(&inner);
        }
    }

    pub fn session_gate(&self) -> &SessionGate {
        &self.gate
    }
}
