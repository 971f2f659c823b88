use anyhow::Result;
use axum::Router;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod state;

use config::{AppConfig, StorageBackend};
use services::{
    dynamodb::DynamoTableStore,
    memory::{MemoryObjectStore, MemoryTableStore},
    object_store::{ImageStore, ObjectStore},
    s3::S3ObjectStore,
    table_store::TableStore,
};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // --- Parse config ---
    let cfg = AppConfig::from_env_and_args()?;

    tracing::info!("Starting burger-api with config: {:?}", cfg);

    // --- Initialize store clients ---
    let (tables, objects) = build_stores(&cfg).await;

    let state = AppState {
        tables,
        images: ImageStore::new(objects, cfg.region.clone()),
        burger_table: cfg.burger_table.clone(),
        order_table: cfg.order_table.clone(),
        image_bucket: cfg.image_bucket.clone(),
    };

    // --- Build router ---
    let app: Router = routes::routes::routes(&cfg)?.with_state(state);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Construct the table and object store handles once for the whole process.
async fn build_stores(cfg: &AppConfig) -> (Arc<dyn TableStore>, Arc<dyn ObjectStore>) {
    match cfg.storage {
        StorageBackend::Aws => {
            let aws = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(cfg.region.clone()))
                .load()
                .await;
            tracing::info!(
                "Using DynamoDB tables {} / {} and S3 bucket {}",
                cfg.burger_table,
                cfg.order_table,
                cfg.image_bucket
            );
            (
                Arc::new(DynamoTableStore::new(aws_sdk_dynamodb::Client::new(&aws))),
                Arc::new(S3ObjectStore::new(aws_sdk_s3::Client::new(&aws))),
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory stores; data is lost on restart");
            (
                Arc::new(MemoryTableStore::new()),
                Arc::new(MemoryObjectStore::new()),
            )
        }
    }
}
