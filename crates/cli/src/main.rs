//! `wellnest` -- terminal client for the WellNest fitness coaching API.
//!
//! # Environment variables
//!
//! | Variable                        | Default                         | Description                          |
//! |---------------------------------|---------------------------------|--------------------------------------|
//! | `WELLNEST_API_URL`              | `http://localhost:8080/api`     | API root                             |
//! | `WELLNEST_SESSION_FILE`         | `$HOME/.wellnest/session.json`  | Where the signed-in session is kept  |
//! | `WELLNEST_REQUEST_TIMEOUT_SECS` | `30`                            | Per-request timeout                  |
//! | `WELLNEST_RESEND_COOLDOWN_SECS` | `60`                            | Wait before a code can be re-sent    |
//! | `RUST_LOG`                      | `wellnest_cli=info,wellnest_client=info` | Log filter                  |

mod cli;
mod commands;
mod interactive;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wellnest_client::ClientConfig;

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::interactive::Prompt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellnest_cli=info,wellnest_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.set_api_url(&api_url)?;
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }

    let ctx = Context::new(config)?;
    let mut prompt = Prompt::new();

    match cli.command {
        Command::Login(creds) => commands::login(&ctx, creds, &mut prompt).await,
        Command::AdminLogin(creds) => commands::admin_login(&ctx, creds, &mut prompt).await,
        Command::Logout => {
            commands::logout(&ctx);
            Ok(())
        }
        Command::Whoami => {
            commands::whoami(&ctx);
            Ok(())
        }
        Command::Register(args) => interactive::register(&ctx, args, &mut prompt).await,
        Command::ForgotPassword { email } => {
            interactive::forgot_password(&ctx, email, &mut prompt).await
        }
        Command::Route { path } => {
            commands::route(&ctx, &path);
            Ok(())
        }
        Command::Trainers(command) => commands::trainers(&ctx, command).await,
        Command::Profile(command) => commands::profile(&ctx, command).await,
        Command::Reports(command) => commands::reports(&ctx, command).await,
        Command::Admin(command) => commands::admin(&ctx, command).await,
    }
}
