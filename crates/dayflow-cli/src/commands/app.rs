//! Run the app-shell mount sequence from the terminal.

use std::sync::Arc;

use clap::Subcommand;

use dayflow_core::{
    AppShell, EventBus, Navigator, Platform, Route, Store, UserDataAggregator, UserDataSource,
};

use crate::common;

#[derive(Subcommand)]
pub enum AppAction {
    /// Configure billing, restore auth, load theme and data, navigate
    Start {
        /// Platform to emulate: web, ios, android or desktop
        #[arg(long, default_value = "desktop")]
        platform: String,
    },
}

/// Prints navigation decisions instead of routing a UI.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::SignIn => println!("-> sign-in"),
            Route::Main => println!("-> main"),
        }
    }
}

pub async fn run(action: AppAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AppAction::Start { platform } => {
            let platform: Platform = platform.parse()?;
            let ctx = common::context();
            let bus: EventBus = ctx.bus.clone();
            let store = Arc::new(Store::new(bus.clone()));
            let source = Arc::clone(&ctx.client) as Arc<dyn UserDataSource>;
            let aggregator = Arc::new(UserDataAggregator::new(Arc::clone(&source), bus.clone()));
            let auth = Arc::new(common::auth_provider(&ctx));

            let shell = AppShell::new(
                ctx.config.clone(),
                platform,
                auth,
                source,
                aggregator,
                Arc::clone(&store),
                Arc::new(PrintNavigator),
                bus,
            );
            shell.start().await;

            let state = store.snapshot();
            println!(
                "theme: {:?} (dark: {}), tasks: {}, habits: {}, completions: {}, sessions: {}",
                state.theme.mode,
                state.theme.is_dark(),
                state.tasks.len(),
                state.habits.len(),
                state.completions.len(),
                state.sessions.len()
            );
        }
    }
    Ok(())
}
