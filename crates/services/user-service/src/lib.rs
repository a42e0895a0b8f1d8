//! User Service Library
//!
//! REST microservice managing user profiles and their linked credentials.

pub mod api;
pub mod config;
pub mod dto;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::UserServiceConfig;
use crate::infra::{Database, Persistence};
use crate::service::{UserManager, UserService};

/// Build the application state over an open database.
pub fn build_state(database: Database) -> AppState {
    let uow = Arc::new(Persistence::new(database.get_connection()));
    let user_service: Arc<dyn UserService> = Arc::new(UserManager::new(uow));
    AppState::new(user_service, database)
}

/// Run the HTTP server, overriding the configured bind address.
pub async fn run_server(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = UserServiceConfig::from_env();
    config.server.host = host.to_string();
    config.server.port = port;

    run_server_with_config(config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

async fn run_server_with_config(config: UserServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(database = ?config.database, "Connecting to database");
    let database = Database::connect(&config.database).await?;

    let app = create_router(build_state(database));

    let addr: SocketAddr = config.server.addr().parse()?;
    info!("User service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
