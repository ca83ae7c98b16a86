//! Typed per-collection operations on the remote client.
//!
//! Each collection gets list / create / update / delete with the owner id
//! injected into every call. Habit completions additionally get the toggle
//! mutation: flip the row for (user, habit, date), inserting it on first
//! toggle.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::error::RemoteError;
use crate::model::{
    Habit, HabitCompletion, NewHabit, NewSession, NewTask, PomodoroSession, Task,
};
use crate::remote::client::{OnConflict, RemoteClient};
use crate::remote::query::{HabitPatch, Query, SessionPatch, TaskPatch};

const TASKS: &str = "tasks";
const HABITS: &str = "habits";
const COMPLETIONS: &str = "habit_completions";
const SESSIONS: &str = "pomodoro_sessions";

/// Row body for an insert with the owner id injected.
#[derive(Serialize)]
struct Owned<'a, B: Serialize> {
    user_id: Uuid,
    #[serde(flatten)]
    body: &'a B,
}

fn id_pairs(user_id: Uuid, id: Uuid) -> Vec<(String, String)> {
    vec![
        ("id".to_string(), format!("eq.{id}")),
        ("user_id".to_string(), format!("eq.{user_id}")),
    ]
}

fn first_row<T>(table: &'static str, rows: Vec<T>) -> Result<T, RemoteError> {
    rows.into_iter()
        .next()
        .ok_or(RemoteError::MissingRow { table })
}

impl RemoteClient {
    // ---- tasks ----

    pub async fn list_tasks(&self, user_id: Uuid, query: Query) -> Result<Vec<Task>, RemoteError> {
        self.select(TASKS, &query.into_pairs(user_id)).await
    }

    pub async fn create_task(&self, user_id: Uuid, task: &NewTask) -> Result<Task, RemoteError> {
        let rows = self
            .insert(TASKS, &Owned { user_id, body: task }, OnConflict::Error)
            .await?;
        first_row(TASKS, rows)
    }

    pub async fn update_task(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &TaskPatch,
    ) -> Result<Task, RemoteError> {
        let rows = self.update(TASKS, &id_pairs(user_id, id), patch).await?;
        first_row(TASKS, rows)
    }

    pub async fn delete_task(&self, user_id: Uuid, id: Uuid) -> Result<(), RemoteError> {
        self.delete(TASKS, &id_pairs(user_id, id)).await
    }

    // ---- habits ----

    pub async fn list_habits(
        &self,
        user_id: Uuid,
        query: Query,
    ) -> Result<Vec<Habit>, RemoteError> {
        self.select(HABITS, &query.into_pairs(user_id)).await
    }

    pub async fn create_habit(
        &self,
        user_id: Uuid,
        habit: &NewHabit,
    ) -> Result<Habit, RemoteError> {
        let rows = self
            .insert(HABITS, &Owned { user_id, body: habit }, OnConflict::Error)
            .await?;
        first_row(HABITS, rows)
    }

    pub async fn update_habit(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &HabitPatch,
    ) -> Result<Habit, RemoteError> {
        let rows = self.update(HABITS, &id_pairs(user_id, id), patch).await?;
        first_row(HABITS, rows)
    }

    pub async fn delete_habit(&self, user_id: Uuid, id: Uuid) -> Result<(), RemoteError> {
        self.delete(HABITS, &id_pairs(user_id, id)).await
    }

    // ---- habit completions ----

    pub async fn list_completions(
        &self,
        user_id: Uuid,
        query: Query,
    ) -> Result<Vec<HabitCompletion>, RemoteError> {
        self.select(COMPLETIONS, &query.into_pairs(user_id)).await
    }

    /// Flip the completion flag for (user, habit, date).
    ///
    /// Reads the existing row first; if present its flag is inverted, if
    /// absent a new row is inserted with `completed = true`. Returns the row
    /// as persisted.
    pub async fn toggle_completion(
        &self,
        user_id: Uuid,
        habit_id: Uuid,
        date: NaiveDate,
    ) -> Result<HabitCompletion, RemoteError> {
        let pairs = Query::new()
            .eq("habit_id", habit_id.to_string())
            .eq("date", date.to_string())
            .into_pairs(user_id);
        let existing: Vec<HabitCompletion> = self.select(COMPLETIONS, &pairs).await?;

        match existing.into_iter().next() {
            Some(row) => {
                #[derive(Serialize)]
                struct Flip {
                    completed: bool,
                }
                let rows = self
                    .update(
                        COMPLETIONS,
                        &id_pairs(user_id, row.id),
                        &Flip { completed: !row.completed },
                    )
                    .await?;
                first_row(COMPLETIONS, rows)
            }
            None => {
                #[derive(Serialize)]
                struct NewCompletion {
                    user_id: Uuid,
                    habit_id: Uuid,
                    date: NaiveDate,
                    completed: bool,
                }
                let rows = self
                    .insert(
                        COMPLETIONS,
                        &NewCompletion { user_id, habit_id, date, completed: true },
                        OnConflict::Error,
                    )
                    .await?;
                first_row(COMPLETIONS, rows)
            }
        }
    }

    pub async fn delete_completion(&self, user_id: Uuid, id: Uuid) -> Result<(), RemoteError> {
        self.delete(COMPLETIONS, &id_pairs(user_id, id)).await
    }

    // ---- pomodoro sessions ----

    pub async fn list_sessions(
        &self,
        user_id: Uuid,
        query: Query,
    ) -> Result<Vec<PomodoroSession>, RemoteError> {
        self.select(SESSIONS, &query.into_pairs(user_id)).await
    }

    pub async fn create_session(
        &self,
        user_id: Uuid,
        session: &NewSession,
    ) -> Result<PomodoroSession, RemoteError> {
        let rows = self
            .insert(SESSIONS, &Owned { user_id, body: session }, OnConflict::Error)
            .await?;
        first_row(SESSIONS, rows)
    }

    pub async fn update_session(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &SessionPatch,
    ) -> Result<PomodoroSession, RemoteError> {
        let rows = self.update(SESSIONS, &id_pairs(user_id, id), patch).await?;
        first_row(SESSIONS, rows)
    }

    pub async fn delete_session(&self, user_id: Uuid, id: Uuid) -> Result<(), RemoteError> {
        self.delete(SESSIONS, &id_pairs(user_id, id)).await
    }
}
