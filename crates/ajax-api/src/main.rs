//! Ajax API server
//!
//! Serves the chat, delegation, status and admin endpoints over HTTP and
//! runs the idle behaviour timer in the background.

use std::path::PathBuf;
use std::sync::Arc;

use ajax_common::AjaxConfig;
use ajax_core::{ChatService, IdleWorker};
use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod api;

/// Command-line arguments for the Ajax API server
#[derive(Parser, Debug)]
#[clap(name = "ajax-api", about = "HTTP API server for the Ajax assistant")]
struct Args {
    /// Path to the TOML config file
    #[clap(short, long, default_value = "ajax.toml")]
    config: PathBuf,

    /// Host to bind to
    #[clap(long)]
    host: Option<String>,

    /// Port to listen on
    #[clap(short, long)]
    port: Option<u16>,

    /// Path to the data directory
    #[clap(short, long)]
    data_dir: Option<PathBuf>,

    /// Completion model; without one replies are framed locally
    #[clap(long)]
    model: Option<String>,

    /// Start with the principal away; otherwise the saved mode is used
    #[clap(long)]
    away: bool,
}

impl Args {
    fn apply(&self, config: &mut AjaxConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(model) = &self.model {
            config.provider.model = Some(model.clone());
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = AjaxConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    args.apply(&mut config);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ajax API server...");
    info!("Data directory: {:?}", config.data_dir);

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let mut builder = ChatService::builder(config).with_configured_collaborators();
    if args.away {
        builder = builder.principal_present(false);
    }
    let service = builder.build().await?;
    let service = Arc::new(service);

    let idle = IdleWorker::spawn(service.idle_settings().clone(), service.queue().clone());

    let app = Router::new()
        .merge(api::routes(service.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!("Binding to address: {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    idle.stop();
    Ok(())
}
