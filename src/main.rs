mod config;
mod db;
mod event;
mod handlers;
mod invoke;
mod routes;
mod services;
mod state;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};
use crate::handlers::Service;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invocation failed: {0}")]
    Invoke(#[from] invoke::InvokeError),
}

#[derive(Parser, Debug)]
#[command(name = "artshare", about = "ArtShare API handlers: auth, artworks, forum, interactions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve every handler over HTTP at `/{service}`.
    Serve,
    /// Run one handler on an event read from stdin.
    Invoke {
        /// One of `auth`, `artworks`, `forum`, `interactions`.
        service: Service,
    },
    /// Apply schema migrations and exit.
    Migrate,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve => serve().await,
        Command::Invoke { service } => run_invoke(service).await,
        Command::Migrate => migrate().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "artshare failed");
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> Result<(), CliError> {
    let config = Config::from_env()?;

    if config.run_migrations {
        db::migrate(&config.database_url).await?;
        tracing::info!("migrations applied");
    }

    let app = routes::app(state::AppState::new(config.database_url.as_str()));
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "artshare listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_invoke(service: Service) -> Result<(), CliError> {
    let database_url = config::database_url()?;
    invoke::run(service, &database_url).await?;
    Ok(())
}

async fn migrate() -> Result<(), CliError> {
    let database_url = config::database_url()?;
    db::migrate(&database_url).await?;
    tracing::info!("migrations applied");
    Ok(())
}
