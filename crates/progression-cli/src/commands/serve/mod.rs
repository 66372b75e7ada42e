//! Serve command: load artifacts once, then answer `/health` and `/predict`.

mod routes;

pub use routes::build_router;

use crate::error::{CliError, Result};
use clap::Parser;
use colored::Colorize;
use progression::serving::ServiceContext;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Serve predictions from a trained model directory
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "progression-serve")]
#[command(author, version, about, long_about = None)]
pub struct ServeArgs {
    /// Directory containing model.pkl and (optionally) metrics.json
    #[arg(long, env = "MODEL_DIR", default_value = "models")]
    pub model_dir: PathBuf,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            model_dir: args.model_dir,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            model_dir: PathBuf::from("models"),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the service context, failing fast if the model is unusable.
pub fn load_context(config: &ServerConfig) -> Result<Arc<ServiceContext>> {
    ServiceContext::load(&config.model_dir)
        .map(Arc::new)
        .map_err(|e| CliError::StartupFailure(e.to_string()))
}

/// Run the serve command. Blocks until Ctrl+C.
pub fn run(config: &ServerConfig) -> Result<()> {
    println!(
        "{}",
        format!("Loading model from {}", config.model_dir.display()).dimmed()
    );
    let context = load_context(config)?;
    let health = context.health();
    println!(
        "{} {} (rmse: {})",
        "Model loaded:".green(),
        health.model_name,
        health
            .rmse
            .map_or_else(|| "n/a".to_string(), |r| format!("{r:.3}"))
    );

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::ServerError(format!("Failed to create runtime: {e}")))?;

    let bind_addr = config.bind_addr();

    runtime.block_on(async move {
        let app = build_router(context);

        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| CliError::ServerError(format!("Failed to bind {bind_addr}: {e}")))?;
        info!(addr = %bind_addr, "listening");

        println!();
        println!(
            "{}",
            format!("Server listening on http://{}", bind_addr)
                .green()
                .bold()
        );
        println!();
        println!("{}", "Endpoints:".cyan());
        println!("  GET  /health   - Health check with training metrics");
        println!("  POST /predict  - Predict disease progression");
        println!();
        println!("{}", "Press Ctrl+C to stop".dimmed());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| CliError::ServerError(format!("Server error: {e}")))?;

        println!();
        println!("{}", "Server stopped".yellow());
        Ok(())
    })
}

/// Shutdown signal handler
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
}
