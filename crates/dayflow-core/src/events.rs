//! Application event bus.
//!
//! Every state transition in the system publishes an [`AppEvent`]. The shell
//! and any front-end subscribe explicitly instead of re-running effects on
//! hidden dependencies.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::model::{AuthUser, ThemeMode};

/// One of the four owner-scoped record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Tasks,
    Habits,
    Completions,
    Sessions,
}

impl Collection {
    /// Backend table name.
    pub fn table(self) -> &'static str {
        match self {
            Collection::Tasks => "tasks",
            Collection::Habits => "habits",
            Collection::Completions => "habit_completions",
            Collection::Sessions => "pomodoro_sessions",
        }
    }

    pub const ALL: [Collection; 4] = [
        Collection::Tasks,
        Collection::Habits,
        Collection::Completions,
        Collection::Sessions,
    ];
}

/// Events published on the bus.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Auth settled or the signed-in user changed. `None` means signed out.
    AuthChanged { user: Option<AuthUser> },
    /// One collection fetch resolved successfully.
    CollectionLoaded {
        user_id: Uuid,
        collection: Collection,
        count: usize,
    },
    /// One collection fetch failed. Siblings are unaffected.
    CollectionFailed {
        user_id: Uuid,
        collection: Collection,
        message: String,
    },
    /// All four collection fetches have settled for this user.
    AggregateSettled { user_id: Uuid },
    /// Theme preference resolved (from settings or the dark fallback).
    ThemeResolved { mode: ThemeMode },
    /// The local store changed.
    StateChanged,
}

/// Broadcast bus carrying [`AppEvent`]s to any number of subscribers.
///
/// Publishing never blocks; events sent while no subscriber exists are
/// dropped, which is fine -- subscribers care about transitions from the
/// point they attach.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: AppEvent) {
        // Err means no live subscriber; not a failure.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
