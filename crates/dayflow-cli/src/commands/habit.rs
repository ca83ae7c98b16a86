//! Habit commands.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use uuid::Uuid;

use dayflow_core::remote::HabitPatch;
use dayflow_core::{Direction, NewHabit, Query};

use crate::common;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "general")]
        category: String,
        /// Display color
        #[arg(long, default_value = "#4caf50")]
        color: String,
        /// Comma-separated weekday indices (0=Sun ... 6=Sat)
        #[arg(long, default_value = "0,1,2,3,4,5,6")]
        days: String,
    },
    /// List habits
    List,
    /// Toggle completion of a habit for a date (defaults to today)
    Toggle {
        id: Uuid,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List completions for a date range
    Completions {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Update a habit
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a habit
    Delete { id: Uuid },
}

fn parse_days(days: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    days.split(',')
        .map(|d| {
            let day: u8 = d.trim().parse()?;
            if day > 6 {
                return Err(format!("weekday index {day} out of range 0-6").into());
            }
            Ok(day)
        })
        .collect()
}

pub async fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::context();
    let user_id = common::require_user(&ctx)?;

    match action {
        HabitAction::Create {
            title,
            description,
            category,
            color,
            days,
        } => {
            let habit = ctx
                .client
                .create_habit(
                    user_id,
                    &NewHabit {
                        title,
                        description,
                        category,
                        color,
                        target_days: parse_days(&days)?,
                    },
                )
                .await?;
            println!("Habit created: {}", habit.id);
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List => {
            let habits = ctx
                .client
                .list_habits(user_id, Query::new().order("created_at", Direction::Asc))
                .await?;
            println!("{}", serde_json::to_string_pretty(&habits)?);
        }
        HabitAction::Toggle { id, date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let completion = ctx.client.toggle_completion(user_id, id, date).await?;
            let state = if completion.completed { "done" } else { "not done" };
            println!("{} on {}: {state}", completion.habit_id, completion.date);
        }
        HabitAction::Completions { from, to } => {
            let mut query = Query::new().order("date", Direction::Desc);
            if let Some(from) = from {
                query = query.date_from("date", from);
            }
            if let Some(to) = to {
                query = query.date_to("date", to);
            }
            let completions = ctx.client.list_completions(user_id, query).await?;
            println!("{}", serde_json::to_string_pretty(&completions)?);
        }
        HabitAction::Update {
            id,
            title,
            category,
            color,
        } => {
            let patch = HabitPatch {
                title,
                description: None,
                category,
                color,
                target_days: None,
            };
            let habit = ctx.client.update_habit(user_id, id, &patch).await?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Delete { id } => {
            ctx.client.delete_habit(user_id, id).await?;
            println!("Habit deleted: {id}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_days_accepts_valid_lists() {
        assert_eq!(parse_days("1,3,5").unwrap(), vec![1, 3, 5]);
        assert!(parse_days("7").is_err());
        assert!(parse_days("x").is_err());
    }
}
