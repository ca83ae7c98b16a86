//! Record types for tasks, habits, completions, sessions, and the
//! singleton-per-user preference rows.
//!
//! Every stored row carries a `user_id`; all reads and writes are scoped to
//! that owner. Field names and enum values mirror the backend columns, so
//! these types serialize straight onto the wire.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Work,
    Personal,
    Health,
    Education,
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

/// Task completion status. `in-progress` matches the backend column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

/// A task owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a task. The owner id and timestamps are
/// filled in by the client/backend, not the caller.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
}

/// A recurring habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Free-text category, unlike [`TaskCategory`].
    pub category: String,
    /// Display color, e.g. `#4caf50`.
    pub color: String,
    /// Weekday indices the habit targets. 0=Sun ... 6=Sat
    pub target_days: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a habit.
#[derive(Debug, Clone, Serialize)]
pub struct NewHabit {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub color: String,
    pub target_days: Vec<u8>,
}

/// Per-day completion mark for a habit, keyed by (habit, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitCompletion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub completed: bool,
}

/// Kind of pomodoro session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Work,
    Break,
}

/// A recorded pomodoro session, optionally linked to a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_min: i64,
    pub completed: bool,
    pub session_type: SessionKind,
}

/// Fields supplied when logging a session.
#[derive(Debug, Clone, Serialize)]
pub struct NewSession {
    pub task_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_min: i64,
    pub completed: bool,
    pub session_type: SessionKind,
}

/// Pomodoro timing preferences; one row per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: Uuid,
    pub work_duration_min: i64,
    pub short_break_min: i64,
    pub long_break_min: i64,
    pub sessions_until_long_break: i64,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
}

impl UserPreferences {
    /// Row materialized on first access for a user with no existing row.
    pub fn defaults_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            work_duration_min: 25,
            short_break_min: 5,
            long_break_min: 15,
            sessions_until_long_break: 4,
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}

/// Public profile; one row per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    pub fn defaults_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            display_name: String::new(),
            avatar_url: None,
        }
    }
}

/// App settings; one row per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: Uuid,
    pub theme: ThemeMode,
    pub language: String,
}

impl UserSettings {
    pub fn defaults_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            theme: ThemeMode::Dark,
            language: "en".to_string(),
        }
    }
}

/// Theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
    System,
}

/// Resolved theme: preference plus the OS color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeState {
    pub mode: ThemeMode,
    /// Whether the OS reports a dark color scheme (used when mode is System).
    pub system_dark: bool,
}

impl ThemeState {
    pub fn is_dark(&self) -> bool {
        match self.mode {
            ThemeMode::Dark => true,
            ThemeMode::Light => false,
            ThemeMode::System => self.system_dark,
        }
    }
}

impl Default for ThemeState {
    /// Dark is the fallback when unauthenticated or settings are unavailable.
    fn default() -> Self {
        Self {
            mode: ThemeMode::Dark,
            system_dark: false,
        }
    }
}

/// The authenticated user as reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}
