//! User-data aggregator.
//!
//! On each auth settle with a user present, issues the four collection
//! fetches for that user concurrently. Each fetch is a spawned task keyed by
//! (user id, collection); settling for a different user aborts the previous
//! user's outstanding fetches, so late-arriving results for a stale user
//! never reach the store. One fetch failing neither cancels nor poisons its
//! siblings -- every collection resolves to its own `Result`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::RemoteError;
use crate::events::{AppEvent, Collection, EventBus};
use crate::model::{Habit, HabitCompletion, PomodoroSession, Task, UserSettings};

/// Read side of the remote backend, as the aggregator and shell see it.
///
/// `RemoteClient` is the production implementation; tests substitute fakes.
#[async_trait]
pub trait UserDataSource: Send + Sync + 'static {
    async fn fetch_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, RemoteError>;
    async fn fetch_habits(&self, user_id: Uuid) -> Result<Vec<Habit>, RemoteError>;
    async fn fetch_completions(&self, user_id: Uuid) -> Result<Vec<HabitCompletion>, RemoteError>;
    async fn fetch_sessions(&self, user_id: Uuid) -> Result<Vec<PomodoroSession>, RemoteError>;
    /// Settings singleton, used for the theme load.
    async fn load_settings(&self, user_id: Uuid) -> Result<UserSettings, RemoteError>;
}

/// Result of one aggregate load. Collections succeed or fail independently.
#[derive(Debug)]
pub struct FetchOutcome {
    pub user_id: Uuid,
    pub tasks: Result<Vec<Task>, RemoteError>,
    pub habits: Result<Vec<Habit>, RemoteError>,
    pub completions: Result<Vec<HabitCompletion>, RemoteError>,
    pub sessions: Result<Vec<PomodoroSession>, RemoteError>,
}

impl FetchOutcome {
    pub fn fully_loaded(&self) -> bool {
        self.tasks.is_ok() && self.habits.is_ok() && self.completions.is_ok() && self.sessions.is_ok()
    }

    /// Collections that failed, with their errors.
    pub fn failures(&self) -> Vec<(Collection, &RemoteError)> {
        let mut failed = Vec::new();
        if let Err(e) = &self.tasks {
            failed.push((Collection::Tasks, e));
        }
        if let Err(e) = &self.habits {
            failed.push((Collection::Habits, e));
        }
        if let Err(e) = &self.completions {
            failed.push((Collection::Completions, e));
        }
        if let Err(e) = &self.sessions {
            failed.push((Collection::Sessions, e));
        }
        failed
    }
}

struct Inflight {
    user_id: Uuid,
    collection: Collection,
    abort: AbortHandle,
}

/// Issues and tracks the concurrent collection fetches.
pub struct UserDataAggregator {
    source: Arc<dyn UserDataSource>,
    bus: EventBus,
    loading_tx: watch::Sender<bool>,
    inflight: Mutex<Vec<Inflight>>,
}

impl UserDataAggregator {
    pub fn new(source: Arc<dyn UserDataSource>, bus: EventBus) -> Self {
        let (loading_tx, _) = watch::channel(false);
        Self {
            source,
            bus,
            loading_tx,
            inflight: Mutex::new(Vec::new()),
        }
    }

    /// True while any fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        *self.loading_tx.borrow()
    }

    /// Watch the unioned loading flag.
    pub fn loading_watch(&self) -> watch::Receiver<bool> {
        self.loading_tx.subscribe()
    }

    /// Abort outstanding fetches that belong to any other user.
    pub fn cancel_other_users(&self, user_id: Uuid) {
        let mut inflight = self.inflight.lock().expect("inflight lock poisoned");
        inflight.retain(|entry| {
            if entry.user_id == user_id {
                return true;
            }
            debug!(stale_user = %entry.user_id, collection = ?entry.collection, "aborting stale fetch");
            entry.abort.abort();
            false
        });
    }

    /// Abort every outstanding fetch (sign-out).
    pub fn cancel_all(&self) {
        let mut inflight = self.inflight.lock().expect("inflight lock poisoned");
        for entry in inflight.drain(..) {
            entry.abort.abort();
        }
        let _ = self.loading_tx.send(false);
    }

    fn track<T: Send + 'static>(
        &self,
        user_id: Uuid,
        collection: Collection,
        handle: &JoinHandle<Result<T, RemoteError>>,
    ) {
        self.inflight
            .lock()
            .expect("inflight lock poisoned")
            .push(Inflight {
                user_id,
                collection,
                abort: handle.abort_handle(),
            });
    }

    fn untrack(&self, user_id: Uuid) {
        let mut inflight = self.inflight.lock().expect("inflight lock poisoned");
        inflight.retain(|entry| entry.user_id != user_id);
        if inflight.is_empty() {
            let _ = self.loading_tx.send(false);
        }
    }

    async fn settle<T: Send + 'static>(
        handle: JoinHandle<Result<T, RemoteError>>,
    ) -> Result<T, RemoteError> {
        match handle.await {
            Ok(result) => result,
            Err(join) if join.is_cancelled() => Err(RemoteError::Cancelled),
            Err(join) => std::panic::resume_unwind(join.into_panic()),
        }
    }

    /// Fetch all four collections for the user.
    ///
    /// Cancels outstanding fetches for other users first, then runs the four
    /// fetches as independent tasks and waits for every one to settle.
    pub async fn load(&self, user_id: Uuid) -> FetchOutcome {
        self.cancel_other_users(user_id);
        let _ = self.loading_tx.send(true);
        debug!(%user_id, "aggregate load started");

        let source = Arc::clone(&self.source);
        let tasks = tokio::spawn({
            let source = Arc::clone(&source);
            async move { source.fetch_tasks(user_id).await }
        });
        let habits = tokio::spawn({
            let source = Arc::clone(&source);
            async move { source.fetch_habits(user_id).await }
        });
        let completions = tokio::spawn({
            let source = Arc::clone(&source);
            async move { source.fetch_completions(user_id).await }
        });
        let sessions = tokio::spawn({
            let source = Arc::clone(&source);
            async move { source.fetch_sessions(user_id).await }
        });

        self.track(user_id, Collection::Tasks, &tasks);
        self.track(user_id, Collection::Habits, &habits);
        self.track(user_id, Collection::Completions, &completions);
        self.track(user_id, Collection::Sessions, &sessions);

        let outcome = FetchOutcome {
            user_id,
            tasks: Self::settle(tasks).await,
            habits: Self::settle(habits).await,
            completions: Self::settle(completions).await,
            sessions: Self::settle(sessions).await,
        };

        self.untrack(user_id);
        self.publish(&outcome);
        outcome
    }

    fn publish(&self, outcome: &FetchOutcome) {
        let user_id = outcome.user_id;
        let counts = [
            (Collection::Tasks, outcome.tasks.as_ref().map(Vec::len)),
            (Collection::Habits, outcome.habits.as_ref().map(Vec::len)),
            (
                Collection::Completions,
                outcome.completions.as_ref().map(Vec::len),
            ),
            (Collection::Sessions, outcome.sessions.as_ref().map(Vec::len)),
        ];
        for (collection, result) in counts {
            match result {
                Ok(count) => self.bus.publish(AppEvent::CollectionLoaded {
                    user_id,
                    collection,
                    count,
                }),
                Err(error) => {
                    warn!(%user_id, ?collection, %error, "collection fetch failed");
                    self.bus.publish(AppEvent::CollectionFailed {
                        user_id,
                        collection,
                        message: error.to_string(),
                    });
                }
            }
        }
        self.bus.publish(AppEvent::AggregateSettled { user_id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fake source: configurable failure and per-user delay.
    struct FakeSource {
        fail_tasks: bool,
        slow_user: Option<Uuid>,
        fetches: AtomicUsize,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                fail_tasks: false,
                slow_user: None,
                fetches: AtomicUsize::new(0),
            }
        }

        async fn delay_for(&self, user_id: Uuid) {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.slow_user == Some(user_id) {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
        }
    }

    #[async_trait]
    impl UserDataSource for FakeSource {
        async fn fetch_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, RemoteError> {
            self.delay_for(user_id).await;
            if self.fail_tasks {
                return Err(RemoteError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(Vec::new())
        }

        async fn fetch_habits(&self, user_id: Uuid) -> Result<Vec<Habit>, RemoteError> {
            self.delay_for(user_id).await;
            Ok(Vec::new())
        }

        async fn fetch_completions(
            &self,
            user_id: Uuid,
        ) -> Result<Vec<HabitCompletion>, RemoteError> {
            self.delay_for(user_id).await;
            Ok(Vec::new())
        }

        async fn fetch_sessions(&self, user_id: Uuid) -> Result<Vec<PomodoroSession>, RemoteError> {
            self.delay_for(user_id).await;
            Ok(Vec::new())
        }

        async fn load_settings(&self, user_id: Uuid) -> Result<UserSettings, RemoteError> {
            Ok(UserSettings::defaults_for(user_id))
        }
    }

    #[tokio::test]
    async fn sibling_fetches_survive_one_failure() {
        let source = Arc::new(FakeSource {
            fail_tasks: true,
            ..FakeSource::new()
        });
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let aggregator = UserDataAggregator::new(source, bus);

        let outcome = aggregator.load(Uuid::new_v4()).await;
        assert!(outcome.tasks.is_err());
        assert!(outcome.habits.is_ok());
        assert!(outcome.completions.is_ok());
        assert!(outcome.sessions.is_ok());
        assert!(!outcome.fully_loaded());
        assert_eq!(outcome.failures().len(), 1);
        assert!(!aggregator.is_loading());

        let mut failed = 0;
        let mut settled = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::CollectionFailed { .. } => failed += 1,
                AppEvent::AggregateSettled { .. } => settled = true,
                _ => {}
            }
        }
        assert_eq!(failed, 1);
        assert!(settled);
    }

    #[tokio::test]
    async fn user_change_aborts_stale_fetches() {
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        let source = Arc::new(FakeSource {
            slow_user: Some(user_a),
            ..FakeSource::new()
        });
        let bus = EventBus::default();
        let aggregator = Arc::new(UserDataAggregator::new(source, bus));

        let stale = {
            let aggregator = Arc::clone(&aggregator);
            tokio::spawn(async move { aggregator.load(user_a).await })
        };
        // Let user A's fetches spawn and register before the user changes.
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert!(aggregator.is_loading());

        let fresh = aggregator.load(user_b).await;
        assert!(fresh.fully_loaded());

        let stale = stale.await.unwrap();
        assert_eq!(stale.user_id, user_a);
        assert!(matches!(stale.tasks, Err(RemoteError::Cancelled)));
        assert!(matches!(stale.sessions, Err(RemoteError::Cancelled)));
        assert!(!aggregator.is_loading());
    }

    #[tokio::test]
    async fn cancel_all_clears_loading() {
        let source = Arc::new(FakeSource::new());
        let aggregator = UserDataAggregator::new(source, EventBus::default());
        aggregator.cancel_all();
        assert!(!aggregator.is_loading());
    }
}
