mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use docchat_gateway::{AppState, GatewayServer};
use docchat_llm::AnyProvider;
use docchat_llm::compatible::CompatibleProvider;
use docchat_parse::ParseClient;
use docchat_store::{InMemoryVectorStore, QdrantStore, VectorStore};
use tokio::sync::watch;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let config_path = resolve_config_path();
    let config = Config::load(&config_path)?;

    let api_key = std::env::var("DOCCHAT_API_KEY")
        .context("DOCCHAT_API_KEY must be set (bearer key for the LLM and digitization APIs)")?;

    let provider = AnyProvider::Compatible(CompatibleProvider::new(
        "upstage".into(),
        api_key.clone(),
        config.llm.base_url.clone(),
        config.llm.chat_model.clone(),
        Some(config.llm.embedding_model.clone()),
        config.llm.max_tokens,
        config.llm.temperature,
    ));

    let store: Arc<dyn VectorStore> = match config.index.backend.as_str() {
        "memory" => {
            tracing::warn!("using in-memory vector store, vectors will not survive a restart");
            Arc::new(InMemoryVectorStore::new())
        }
        _ => Arc::new(QdrantStore::new(&config.index.qdrant_url)?),
    };

    store
        .ensure_collection(&config.index.collection, config.index.vector_size)
        .await
        .context("failed to prepare vector collection")?;
    tracing::info!(collection = %config.index.collection, "vector collection ready");

    let parser = ParseClient::new(
        api_key,
        config.parse.base_url.clone(),
        config.parse.model.clone(),
    );

    let state = AppState {
        provider,
        store,
        parser,
        collection: config.index.collection.clone(),
        vector_size: config.index.vector_size,
        top_k: config.index.top_k,
        batch_size: config.index.batch_size,
        started_at: Instant::now(),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    GatewayServer::new(&config.server.bind, config.server.port, state, shutdown_rx)
        .with_max_body_size(config.server.max_body_bytes)
        .serve()
        .await?;

    Ok(())
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Priority: CLI `--config` > `DOCCHAT_CONFIG` env > `config/default.toml`.
fn resolve_config_path() -> PathBuf {
    let args: Vec<String> = std::env::args().collect();
    if let Some(path) = args.windows(2).find(|w| w[0] == "--config").map(|w| &w[1]) {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var("DOCCHAT_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}
