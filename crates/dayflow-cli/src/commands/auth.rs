//! Authentication commands.

use clap::Subcommand;
use dayflow_core::Platform;

use crate::common;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        email: String,
        #[arg(long)]
        password: String,
        /// Display name stored in the profile metadata
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Sign out and clear the persisted session
    Logout,
    /// Show the current session
    Status,
    /// Print the OAuth authorize URL for a provider
    OauthUrl {
        /// Provider name, e.g. github or google
        provider: String,
        /// Platform the redirect targets: web, ios, android or desktop
        #[arg(long, default_value = "web")]
        platform: String,
    },
}

pub async fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::context();
    let auth = common::auth_provider(&ctx);

    match action {
        AuthAction::Login { email, password } => {
            let user = auth.sign_in(&email, &password).await?;
            println!("Signed in as {} ({})", user.email, user.id);
        }
        AuthAction::Signup {
            email,
            password,
            name,
        } => {
            let user = auth.sign_up(&email, &password, &name).await?;
            println!("Account created: {} ({})", user.email, user.id);
        }
        AuthAction::Logout => {
            auth.sign_out().await?;
            println!("Signed out");
        }
        AuthAction::Status => match &ctx.session {
            Some(session) => {
                println!("Signed in as {} ({})", session.user.email, session.user.id);
            }
            None => println!("Signed out"),
        },
        AuthAction::OauthUrl { provider, platform } => {
            let platform: Platform = platform.parse()?;
            let url = auth.oauth_authorize_url(&provider, platform)?;
            println!("{url}");
        }
    }
    Ok(())
}
