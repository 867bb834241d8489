use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::settings::AppConfig;
use crate::infrastructure::db::pool::{connect_to_db, PgStore};
use crate::infrastructure::queue::dispatcher::JobDispatcher;
use crate::infrastructure::queue::rabbitmq::RabbitMqService;
use crate::infrastructure::queue::{DisabledQueue, JobQueue};
use crate::state::AppState;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod middleware;
mod modules;
mod routes;
mod state;
mod workers;

/// Background tasks that drain the dispatch channel into the broker.
const DISPATCH_TASKS: usize = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::new().map_err(|e| anyhow::anyhow!("DATABASE_URL: {}", e))?;
    info!(role = ?config.role, "Starting looma...");

    let pool = connect_to_db(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));
    if config.run_migrations {
        store.migrate().await?;
    }

    let rabbit = match &config.rabbitmq_url {
        Some(url) => match RabbitMqService::new(url).await {
            Ok(rabbit) => Some(rabbit),
            Err(e) => {
                error!(error = %e, "RabbitMQ unreachable. Will keep reconnecting in the background.");
                Some(RabbitMqService::disconnected(url))
            }
        },
        None => {
            warn!("RABBITMQ_URL not set. Background jobs will be skipped.");
            None
        }
    };
    let queue: Arc<dyn JobQueue> = match &rabbit {
        Some(rabbit) => Arc::new(rabbit.clone()),
        None => Arc::new(DisabledQueue),
    };

    let (dispatcher, dispatch_handle) =
        JobDispatcher::spawn(queue.clone(), config.dispatch_capacity, DISPATCH_TASKS);
    let state = AppState::new(config.clone(), store.clone(), queue, dispatcher);

    let workers = match (&rabbit, config.role.runs_workers()) {
        (Some(rabbit), true) => workers::start_workers(state.clone(), rabbit.clone()),
        (None, true) => {
            warn!("Skipping worker bootstrap because RabbitMQ is not configured.");
            Vec::new()
        }
        (_, false) => Vec::new(),
    };

    if config.role.serves_http() {
        let app = app::create_app(state);
        let addr = format!("0.0.0.0:{}", config.server_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Server running on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        shutdown_signal().await;
    }

    info!("Shutting down...");
    for worker in &workers {
        worker.abort();
    }
    dispatch_handle.shutdown().await;
    store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
