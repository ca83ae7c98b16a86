//! Remote data client for the hosted backend.
//!
//! Thin typed wrapper over the backend's row API (filtered/sorted/paginated
//! reads, owner-scoped writes), the singleton preference rows, the two
//! server-side procedures, and profile-picture uploads.

pub mod client;
pub mod collections;
pub mod query;
pub mod rpc;
pub mod singletons;
pub mod storage;

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregator::UserDataSource;
use crate::error::RemoteError;
use crate::model::{Habit, HabitCompletion, PomodoroSession, Task, UserSettings};

pub use client::RemoteClient;
pub use query::{
    wire_value, Direction, HabitPatch, PreferencesPatch, ProfilePatch, Query, SessionPatch,
    SettingsPatch, TaskPatch,
};
pub use rpc::UserDataSummary;

#[async_trait]
impl UserDataSource for RemoteClient {
    async fn fetch_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, RemoteError> {
        self.list_tasks(user_id, Query::new()).await
    }

    async fn fetch_habits(&self, user_id: Uuid) -> Result<Vec<Habit>, RemoteError> {
        self.list_habits(user_id, Query::new()).await
    }

    async fn fetch_completions(&self, user_id: Uuid) -> Result<Vec<HabitCompletion>, RemoteError> {
        self.list_completions(user_id, Query::new()).await
    }

    async fn fetch_sessions(&self, user_id: Uuid) -> Result<Vec<PomodoroSession>, RemoteError> {
        self.list_sessions(user_id, Query::new()).await
    }

    async fn load_settings(&self, user_id: Uuid) -> Result<UserSettings, RemoteError> {
        self.get_or_create_settings(user_id).await
    }
}
