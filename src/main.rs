use std::sync::Arc;

use nourrise::application::{advisor::Advisor, day_service::DayServiceImpl, task_service::TaskServiceImpl};
use nourrise::config::{prepare_sqlite_file, Config};
use nourrise::http::routing::{self, history, tasks};
use nourrise::infrastructure::sqlite_repo::SqliteStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Ensure SQLite file can be created/opened when using a file-backed URL
    prepare_sqlite_file(&config.database_url)?;
    let store = SqliteStore::connect(&config.database_url).await?;
    store.init_all().await?;

    let advisor = Arc::new(Advisor::new(config.advice_seed));
    let task_service = TaskServiceImpl::new(store.clone());
    let day_service = DayServiceImpl::new(store.clone(), store, advisor);
    let router = routing::app(
        tasks::router(tasks::AppState { service: task_service })
            .merge(history::router(history::AppState { service: day_service })),
    );

    let addr = config.bind_addr;
    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
