use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "dayflow-cli", version, about = "Dayflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Pomodoro sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Aggregate data operations
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// App-shell sequencing
    App {
        #[command(subcommand)]
        action: commands::app::AppAction,
    },
    /// Configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(action).await,
        Commands::Task { action } => commands::task::run(action).await,
        Commands::Habit { action } => commands::habit::run(action).await,
        Commands::Session { action } => commands::session::run(action).await,
        Commands::Data { action } => commands::data::run(action).await,
        Commands::App { action } => commands::app::run(action).await,
        Commands::Config { action } => commands::config::run(action).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
