//! # Dayflow Core Library
//!
//! Client-side core for the Dayflow productivity app (tasks, habits,
//! pomodoro sessions) against a hosted backend-as-a-service. It implements a
//! CLI-first philosophy where all operations are available via a standalone
//! CLI binary, with any GUI being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Remote client**: typed wrapper over the backend's filtered/sorted/
//!   paginated row API, singleton preference rows, server procedures, and
//!   object uploads
//! - **Auth**: session restoration, password and OAuth-redirect sign-in,
//!   persisted session file
//! - **Store**: in-memory state container with a typed reducer; collection
//!   loads are idempotent full replaces
//! - **Aggregator**: the four concurrent owner-scoped collection fetches,
//!   cancellable on user change
//! - **Shell**: startup and auth-settle sequencing (billing, theme, data
//!   load, one-shot navigation)
//!
//! ## Key Components
//!
//! - [`RemoteClient`]: backend row/RPC/object client
//! - [`AuthProvider`]: authentication state and operations
//! - [`Store`]: local state container
//! - [`UserDataAggregator`]: concurrent collection fetches
//! - [`AppShell`]: startup sequencing and navigation

pub mod aggregator;
pub mod auth;
pub mod billing;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod remote;
pub mod shell;
pub mod store;

pub use aggregator::{FetchOutcome, UserDataAggregator, UserDataSource};
pub use auth::{AuthProvider, Session, SessionFile};
pub use config::{BackendConfig, Platform};
pub use error::{AuthError, ConfigError, CoreError, RemoteError, Result};
pub use events::{AppEvent, Collection, EventBus};
pub use model::{
    AuthUser, Habit, HabitCompletion, NewHabit, NewSession, NewTask, PomodoroSession, SessionKind,
    Task, TaskCategory, TaskPriority, TaskStatus, ThemeMode, ThemeState, UserPreferences,
    UserProfile, UserSettings,
};
pub use remote::{Direction, Query, RemoteClient};
pub use shell::{AppShell, Navigator, Route};
pub use store::{Action, AppState, Store};
