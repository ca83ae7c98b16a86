//! Pomodoro session commands.

use chrono::{Duration, NaiveDate, Utc};
use clap::Subcommand;
use uuid::Uuid;

use dayflow_core::{Direction, NewSession, Query, SessionKind};

use crate::common;

fn parse_kind(s: &str) -> Result<SessionKind, String> {
    match s {
        "work" => Ok(SessionKind::Work),
        "break" => Ok(SessionKind::Break),
        other => Err(format!("unknown session type '{other}'")),
    }
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Record a finished session
    Log {
        /// Duration in minutes
        #[arg(long, default_value = "25")]
        minutes: i64,
        #[arg(long, value_parser = parse_kind, default_value = "work")]
        kind: SessionKind,
        /// Task this session was spent on
        #[arg(long)]
        task_id: Option<Uuid>,
        /// Record as abandoned rather than completed
        #[arg(long)]
        abandoned: bool,
    },
    /// List sessions
    List {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete a session
    Delete { id: Uuid },
}

pub async fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::context();
    let user_id = common::require_user(&ctx)?;

    match action {
        SessionAction::Log {
            minutes,
            kind,
            task_id,
            abandoned,
        } => {
            let end = Utc::now();
            let session = ctx
                .client
                .create_session(
                    user_id,
                    &NewSession {
                        task_id,
                        start_time: end - Duration::minutes(minutes),
                        end_time: Some(end),
                        duration_min: minutes,
                        completed: !abandoned,
                        session_type: kind,
                    },
                )
                .await?;
            println!("Session logged: {}", session.id);
        }
        SessionAction::List { from, to, limit } => {
            let mut query = Query::new().order("start_time", Direction::Desc);
            if let Some(from) = from {
                query = query.date_from("start_time", from);
            }
            if let Some(to) = to {
                query = query.date_to("start_time", to);
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            let sessions = ctx.client.list_sessions(user_id, query).await?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        SessionAction::Delete { id } => {
            ctx.client.delete_session(user_id, id).await?;
            println!("Session deleted: {id}");
        }
    }
    Ok(())
}
