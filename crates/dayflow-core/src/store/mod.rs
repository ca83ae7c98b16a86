//! Local in-memory state store.
//!
//! Holds the normalized copy of the user's tasks, habits, completions, and
//! sessions plus the resolved theme. Mutations go through a typed reducer
//! over [`Action`]; each collection load is an idempotent full replace, so
//! stale local-only rows are discarded rather than merged. There is no
//! durable storage behind this -- the remote backend is the source of truth.

pub mod actions;

#[cfg(test)]
mod store_tests;

use std::sync::RwLock;

use crate::events::{AppEvent, EventBus};
use crate::model::{Habit, HabitCompletion, PomodoroSession, Task, ThemeState};

pub use actions::Action;

/// The whole client-side state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    pub completions: Vec<HabitCompletion>,
    pub sessions: Vec<PomodoroSession>,
    pub theme: ThemeState,
}

/// Pure reducer: applies one action to the state.
fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::TasksLoaded(tasks) => state.tasks = tasks,
        Action::HabitsLoaded(habits) => state.habits = habits,
        Action::CompletionsLoaded(completions) => state.completions = completions,
        Action::SessionsLoaded(sessions) => state.sessions = sessions,
        Action::ThemeModeChanged(mode) => state.theme.mode = mode,
        Action::SystemSchemeChanged { dark } => state.theme.system_dark = dark,
    }
}

/// State container: dispatch applies the reducer and announces the change.
pub struct Store {
    state: RwLock<AppState>,
    bus: EventBus,
}

impl Store {
    pub fn new(bus: EventBus) -> Self {
        Self {
            state: RwLock::new(AppState::default()),
            bus,
        }
    }

    pub fn dispatch(&self, action: Action) {
        {
            let mut state = self.state.write().expect("state lock poisoned");
            reduce(&mut state, action);
        }
        self.bus.publish(AppEvent::StateChanged);
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> AppState {
        self.state.read().expect("state lock poisoned").clone()
    }

    /// Read the state without cloning.
    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.read().expect("state lock poisoned"))
    }
}
