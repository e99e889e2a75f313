// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hikelog Server
//!
//! Serves the hiking journal: accounts, hike logs, following and search.

use hikelog::{config::Config, db::HikeDb, services::ImageStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Hikelog");

    let db = HikeDb::new(&config.database_path);
    db.init_schema().await?;
    tracing::info!(path = %config.database_path.display(), "Database ready");

    let image_store = ImageStore::new(&config.image_dir);
    tokio::fs::create_dir_all(image_store.root()).await?;
    tracing::info!(path = %config.image_dir.display(), "Image store ready");

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        image_store,
    });

    let app = hikelog::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hikelog=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
