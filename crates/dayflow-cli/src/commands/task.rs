//! Task commands.

use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use uuid::Uuid;

use dayflow_core::remote::{wire_value, TaskPatch};
use dayflow_core::{Direction, NewTask, Query, TaskCategory, TaskPriority, TaskStatus};

use crate::common;

fn parse_category(s: &str) -> Result<TaskCategory, String> {
    match s {
        "work" => Ok(TaskCategory::Work),
        "personal" => Ok(TaskCategory::Personal),
        "health" => Ok(TaskCategory::Health),
        "education" => Ok(TaskCategory::Education),
        other => Err(format!("unknown category '{other}'")),
    }
}

fn parse_priority(s: &str) -> Result<TaskPriority, String> {
    match s {
        "high" => Ok(TaskPriority::High),
        "medium" => Ok(TaskPriority::Medium),
        "low" => Ok(TaskPriority::Low),
        other => Err(format!("unknown priority '{other}'")),
    }
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    match s {
        "pending" => Ok(TaskStatus::Pending),
        "in-progress" => Ok(TaskStatus::InProgress),
        "completed" => Ok(TaskStatus::Completed),
        other => Err(format!("unknown status '{other}'")),
    }
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "personal", value_parser = parse_category)]
        category: TaskCategory,
        #[arg(long, default_value = "medium", value_parser = parse_priority)]
        priority: TaskPriority,
        #[arg(long)]
        scheduled_date: Option<NaiveDate>,
        #[arg(long)]
        scheduled_time: Option<NaiveTime>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
    /// List tasks
    List {
        #[arg(long, value_parser = parse_category)]
        category: Option<TaskCategory>,
        #[arg(long, value_parser = parse_status)]
        status: Option<TaskStatus>,
        /// Scheduled on or after this date
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Scheduled on or before this date
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Update fields on a task
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_category)]
        category: Option<TaskCategory>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<TaskPriority>,
        #[arg(long, value_parser = parse_status)]
        status: Option<TaskStatus>,
        #[arg(long)]
        scheduled_date: Option<NaiveDate>,
        #[arg(long)]
        scheduled_time: Option<NaiveTime>,
    },
    /// Mark a task completed
    Complete { id: Uuid },
    /// Delete a task
    Delete { id: Uuid },
}

pub async fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::context();
    let user_id = common::require_user(&ctx)?;

    match action {
        TaskAction::Create {
            title,
            description,
            category,
            priority,
            scheduled_date,
            scheduled_time,
            start_date,
            end_date,
        } => {
            let task = ctx
                .client
                .create_task(
                    user_id,
                    &NewTask {
                        title,
                        description,
                        category,
                        priority,
                        status: TaskStatus::Pending,
                        start_date,
                        end_date,
                        scheduled_date,
                        scheduled_time,
                    },
                )
                .await?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List {
            category,
            status,
            from,
            to,
            limit,
            offset,
        } => {
            let mut query = Query::new().order("created_at", Direction::Desc);
            if let Some(category) = category {
                query = query.eq("category", wire_value(&category));
            }
            if let Some(status) = status {
                query = query.eq("status", wire_value(&status));
            }
            if let Some(from) = from {
                query = query.date_from("scheduled_date", from);
            }
            if let Some(to) = to {
                query = query.date_to("scheduled_date", to);
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            if let Some(offset) = offset {
                query = query.offset(offset);
            }
            let tasks = ctx.client.list_tasks(user_id, query).await?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Update {
            id,
            title,
            description,
            category,
            priority,
            status,
            scheduled_date,
            scheduled_time,
        } => {
            let patch = TaskPatch {
                title,
                description,
                category,
                priority,
                status,
                start_date: None,
                end_date: None,
                scheduled_date,
                scheduled_time,
            };
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            let task = ctx.client.update_task(user_id, id, &patch).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Complete { id } => {
            let patch = TaskPatch {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            };
            let task = ctx.client.update_task(user_id, id, &patch).await?;
            println!("Task completed: {}", task.id);
        }
        TaskAction::Delete { id } => {
            ctx.client.delete_task(user_id, id).await?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
