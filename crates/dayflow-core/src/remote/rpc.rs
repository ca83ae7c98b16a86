//! Server-side procedures invoked by user id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RemoteError;
use crate::remote::client::RemoteClient;

#[derive(Serialize)]
struct UserArg {
    p_user_id: Uuid,
}

/// Row counts returned by `summarize_user_data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDataSummary {
    pub tasks: u64,
    pub habits: u64,
    pub habit_completions: u64,
    pub pomodoro_sessions: u64,
}

impl RemoteClient {
    /// Delete every row owned by the user across all collections.
    pub async fn clear_all_user_data(&self, user_id: Uuid) -> Result<(), RemoteError> {
        self.rpc::<serde_json::Value, _>("clear_all_user_data", &UserArg { p_user_id: user_id })
            .await?;
        Ok(())
    }

    /// Per-collection row counts for the user.
    pub async fn summarize_user_data(
        &self,
        user_id: Uuid,
    ) -> Result<UserDataSummary, RemoteError> {
        self.rpc("summarize_user_data", &UserArg { p_user_id: user_id })
            .await
    }
}
