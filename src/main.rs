//! Cherry Studio Server: accounts, administration, and announcements.
//!
//! Main entry point that loads configuration, sets up logging, and starts
//! the HTTP server.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use cherry_core::config::{AppConfig, LoggingConfig};

/// Selects the `config/{env}.toml` overlay.
const ENV_VAR: &str = "CHERRY_ENV";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("Failed to load configuration")?;

    init_logging(&config.logging);
    tracing::info!(
        env = %env,
        version = env!("CARGO_PKG_VERSION"),
        "Configuration loaded"
    );

    if let Err(e) = cherry_api::run_server(config).await {
        tracing::error!(error = ?e, "Server error");
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize tracing/logging. `RUST_LOG` overrides the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
