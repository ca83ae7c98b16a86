//! Query and patch structures for the remote data client.
//!
//! List calls are described by a [`Query`] (equality filters, one date range,
//! sort, pagination) assembled into PostgREST-style query pairs. Partial
//! updates are described by explicit patch structs whose unset fields are
//! skipped at serialization time, so "only supplied fields change" is
//! enforced mechanically rather than by convention.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::model::{SessionKind, TaskCategory, TaskPriority, TaskStatus, ThemeMode};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn suffix(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone)]
enum Filter {
    Eq(String, String),
    Gte(String, String),
    Lte(String, String),
}

/// Declarative list query: owner scoping is always applied on top of this.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<Filter>,
    order: Option<(String, Direction)>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equality filter on a column. The value must already be in its wire
    /// form (enum values are lowercased by serde; see the `eq_*` helpers).
    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    /// Lower bound of the date range filter.
    pub fn date_from(mut self, column: &str, date: NaiveDate) -> Self {
        self.filters
            .push(Filter::Gte(column.to_string(), date.to_string()));
        self
    }

    /// Upper bound of the date range filter.
    pub fn date_to(mut self, column: &str, date: NaiveDate) -> Self {
        self.filters
            .push(Filter::Lte(column.to_string(), date.to_string()));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Render into query-string pairs, injecting the owner filter.
    pub fn into_pairs(self, user_id: Uuid) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("select".to_string(), "*".to_string()),
            ("user_id".to_string(), format!("eq.{user_id}")),
        ];
        for filter in self.filters {
            let (column, value) = match filter {
                Filter::Eq(c, v) => (c, format!("eq.{v}")),
                Filter::Gte(c, v) => (c, format!("gte.{v}")),
                Filter::Lte(c, v) => (c, format!("lte.{v}")),
            };
            pairs.push((column, value));
        }
        if let Some((column, direction)) = self.order {
            pairs.push(("order".to_string(), format!("{column}.{}", direction.suffix())));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }
}

/// Wire form of an enum-valued filter value (serde's rename output without
/// the surrounding quotes), for use with [`Query::eq`].
pub fn wire_value<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

/// Partial update for a task. Unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<NaiveTime>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().map(|o| o.is_empty()).unwrap_or(true))
            .unwrap_or(true)
    }
}

/// Partial update for a habit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HabitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_days: Option<Vec<u8>>,
}

/// Partial update for a pomodoro session (typically closing it out).
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<SessionKind>,
}

/// Partial update for the preferences singleton.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreferencesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_duration_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_break_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_break_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions_until_long_break: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
}

/// Partial update for the profile singleton.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Partial update for the settings singleton.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
