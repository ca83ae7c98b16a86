//! Aggregate data commands: pull everything, summarize, clear.

use std::sync::Arc;

use clap::Subcommand;

use dayflow_core::{Store, UserDataAggregator, UserDataSource};

use crate::common;

#[derive(Subcommand)]
pub enum DataAction {
    /// Fetch all four collections and print what loaded
    Pull,
    /// Print per-collection row counts from the backend
    Summary,
    /// Delete every row owned by the signed-in user
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::context();
    let user_id = common::require_user(&ctx)?;

    match action {
        DataAction::Pull => {
            let bus = ctx.bus.clone();
            let store = Store::new(bus.clone());
            let aggregator = UserDataAggregator::new(
                Arc::clone(&ctx.client) as Arc<dyn UserDataSource>,
                bus,
            );
            let outcome = aggregator.load(user_id).await;

            if let Ok(tasks) = &outcome.tasks {
                store.dispatch(dayflow_core::Action::TasksLoaded(tasks.clone()));
            }
            if let Ok(habits) = &outcome.habits {
                store.dispatch(dayflow_core::Action::HabitsLoaded(habits.clone()));
            }
            if let Ok(completions) = &outcome.completions {
                store.dispatch(dayflow_core::Action::CompletionsLoaded(completions.clone()));
            }
            if let Ok(sessions) = &outcome.sessions {
                store.dispatch(dayflow_core::Action::SessionsLoaded(sessions.clone()));
            }

            let state = store.snapshot();
            println!(
                "tasks: {}, habits: {}, completions: {}, sessions: {}",
                state.tasks.len(),
                state.habits.len(),
                state.completions.len(),
                state.sessions.len()
            );
            for (collection, error) in outcome.failures() {
                eprintln!("warning: {collection:?} failed: {error}");
            }
        }
        DataAction::Summary => {
            let summary = ctx.client.summarize_user_data(user_id).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        DataAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear without --yes".into());
            }
            ctx.client.clear_all_user_data(user_id).await?;
            println!("All data cleared for {user_id}");
        }
    }
    Ok(())
}
