#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use anyhow::Result;
use axum::Extension;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::config::Config;
use crate::config::Mode;
use crate::notes::NoteService;
use crate::storage::Memory;
use crate::storage::Postgres;
use crate::storage::Storage;
use crate::storage::StorageConfig;

mod api;
mod config;
mod graceful_shutdown;
mod notes;
mod storage;
#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();

    let config = Config::from_env()?;

    setup_tracing(config.mode, &config.log_filter);

    let app = setup_app(config.storage).await?;

    let listener = tokio::net::TcpListener::bind(config.address).await?;
    tracing::info!("Listening on {}", config.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its storage
///
/// # Errors
///
/// Will return `Err` if the storage can not be reached or migrated
pub async fn setup_app(storage: StorageConfig) -> Result<Router> {
    let router = match storage {
        StorageConfig::Memory => {
            tracing::info!("Using memory storage, notes will be gone on shutdown");

            create_router(Memory::new())
        }
        StorageConfig::Postgres(database_connection_string) => {
            create_router(Postgres::connect(&database_connection_string).await?)
        }
        StorageConfig::ExistingConnection(pool) => {
            create_router(Postgres::new_with_pool(pool).await?)
        }
    };

    Ok(router)
}

/// Create the router on top of a storage
fn create_router<S: Storage>(storage: S) -> Router {
    api::router::<S>()
        .layer(TraceLayer::new_for_http())
        .layer(Extension(NoteService::new(storage)))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing(mode: Mode, log_filter: &str) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(log_filter))
        .with(fmt::layer().with_ansi(mode.use_ansi()))
        .init();
}
