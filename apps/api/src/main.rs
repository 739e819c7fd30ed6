mod batch;
mod cli;
mod config;
mod errors;
mod llm_client;
mod matching;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::{render_batch_table, run_batch, BatchOptions};
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::backend::LlmInferenceBackend;
use crate::matching::document::PdfTextExtractor;
use crate::matching::features::WeightTable;
use crate::matching::pipeline::MatchingPipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvmatch v{}", env!("CARGO_PKG_VERSION"));

    WeightTable::canonical()
        .check()
        .context("feature weight table is invalid")?;

    // Initialize LLM client
    let llm = LlmClient::new(&config.llm_settings()).context("failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let pipeline = Arc::new(MatchingPipeline::new(
        Arc::new(PdfTextExtractor),
        Arc::new(LlmInferenceBackend::new(llm)),
    ));

    match cli.into_command() {
        Commands::Serve => serve(&config, pipeline).await,
        Commands::Batch {
            cv_dir,
            jd_dir,
            out_dir,
        } => {
            let options = BatchOptions {
                cv_dir,
                jd_dir,
                out_dir,
            };
            let summaries = run_batch(&pipeline, &options).await?;
            println!("{}", render_batch_table(&summaries));
            Ok(())
        }
    }
}

async fn serve(config: &Config, pipeline: Arc<MatchingPipeline>) -> Result<()> {
    let state = AppState { pipeline };

    let app = build_router(state, config.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
