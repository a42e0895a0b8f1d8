//! `user-service` binary: serves the `/api/users` REST resource and manages
//! the users/credentials schema.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use user_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "user-service", version)]
#[command(about = "Users and their linked credentials over REST")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve /api/users, /health and /api-docs/openapi.json
    Serve {
        /// Address to bind
        #[arg(long, env = "USER_SERVICE_HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to bind
        #[arg(long, env = "USER_SERVICE_PORT", default_value_t = 8700)]
        port: u16,
    },
    /// Manage the users and credentials tables
    Migrate {
        #[command(subcommand)]
        action: SchemaCommand,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum SchemaCommand {
    /// Create any missing tables
    Up,
    /// Undo the most recent migration
    Down,
    /// List migrations and whether each is applied
    Status,
    /// Drop both tables and recreate them empty
    Fresh,
}

impl From<SchemaCommand> for MigrateAction {
    fn from(command: SchemaCommand) -> Self {
        match command {
            SchemaCommand::Up => MigrateAction::Up,
            SchemaCommand::Down => MigrateAction::Down,
            SchemaCommand::Status => MigrateAction::Status,
            SchemaCommand::Fresh => MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env must be loaded before clap reads USER_SERVICE_* defaults
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Command::Serve { host, port } => user_service_lib::run_server(&host, port).await?,
        Command::Migrate { action } => user_service_lib::run_migrations(action.into()).await?,
    }

    Ok(())
}
