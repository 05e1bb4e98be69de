mod config;
mod inference;
mod models;
mod pipeline;
mod server;
mod storage;
mod types;

use std::future::pending;
use std::io::stderr;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::Config;
use crate::inference::InferenceClient;
use crate::pipeline::Pipeline;
use crate::storage::{load_csv, MemoryStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    setup_logging(config.log_level);

    let store = Arc::new(MemoryStore::new());

    if let Some(path) = &config.seed_csv {
        load_csv(path, store.as_ref(), &config.keyspace).await?;
    }

    if store.is_empty() {
        warn!("Feature store is empty, every lookup will miss until records are written");
    } else {
        info!("Feature store holds {} records", store.len());
    }

    let inference = InferenceClient::new(config.inference.clone())?;
    let pipeline = Arc::new(Pipeline::new(store, config.pipeline_settings(), inference));

    let listener = TcpListener::bind(config.listen_addr).await?;

    info!("Listening on http://{}, scoring against {}", listener.local_addr()?, config.inference.endpoint);

    axum::serve(listener, server::router(pipeline.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let tally = pipeline.validator().tally();

    info!("Shut down after {} agreements and {} disagreements", tally.agreements, tally.disagreements);

    Ok(())
}

fn setup_logging(level: LevelFilter) {
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

async fn shutdown_signal() {
    if let Err(error) = ctrl_c().await {
        //NOTE: Without a signal handler the server keeps running until the process is killed
        error!("Unable to listen for shutdown signal: {error}");
        pending::<()>().await;
    }

    info!("Shutdown signal received");
}
