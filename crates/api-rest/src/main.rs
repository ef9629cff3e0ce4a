//! Modelabs API server
//!
//! Serves the HTTP API and runs the evaluation worker pool in-process.

use anyhow::{Context, Result};
use clap::Parser;
use modelabs_api_rest::{create_app, init_tracing, ApiConfig, AppState, Backends};
use modelabs_worker::{log_failures, WorkerPool};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "modelabs-api")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on; overrides PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit JSON logs; overrides LOG_JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Apply explicit command-line overrides. Environment variables are
    /// read only by `ApiConfig::from_env`.
    fn apply(&self, config: &mut ApiConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.log_json {
            config.log_json = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    args.apply(&mut config);

    init_tracing(&config)?;

    info!(
        address = %config.server_address(),
        frontend_url = %config.frontend_url,
        "Starting Modelabs API"
    );

    let backends = Backends::connect(&config).await?;

    // Start the evaluation worker pool
    let pool = WorkerPool::new(config.worker.clone());
    let evaluator = pool.evaluator(backends.models.clone())?;
    let mut workers = pool.start(evaluator);

    if let Some(failures) = workers.take_failures() {
        tokio::spawn(log_failures(failures));
    }

    // Start metrics reporting
    let metrics = workers.metrics().clone();
    let metrics_interval = config.worker.metrics_interval();
    let metrics_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(metrics_interval);
        loop {
            interval.tick().await;
            let snapshot = metrics.snapshot();
            info!(
                jobs_enqueued = snapshot.jobs_enqueued,
                jobs_rejected = snapshot.jobs_rejected,
                jobs_processed = snapshot.jobs_processed,
                jobs_succeeded = snapshot.jobs_succeeded,
                jobs_failed = snapshot.jobs_failed,
                success_rate = format!("{:.2}%", snapshot.success_rate * 100.0),
                avg_duration_ms = snapshot
                    .average_duration
                    .map(|d| d.as_millis())
                    .unwrap_or(0),
                "Worker metrics"
            );
        }
    });

    let address = config.server_address();
    let state = AppState::new(config, &backends, Arc::new(workers.producer()));
    let app = create_app(state)?;

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(address = %address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The router (and its producer clones) is gone; let queued jobs finish
    workers.shutdown().await;
    metrics_handle.abort();

    info!("Modelabs API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keep_config() {
        // Values only ApiConfig::from_env understands must not reach clap
        std::env::set_var("LOG_JSON", "1");
        std::env::set_var("PORT", "not-a-port");

        let args = Args::try_parse_from(["modelabs-api"]).unwrap();
        let mut config = ApiConfig {
            port: 4000,
            log_json: true,
            ..Default::default()
        };
        args.apply(&mut config);

        assert_eq!(config.port, 4000);
        assert!(config.log_json);
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from(["modelabs-api", "--port", "8080", "--log-json"]).unwrap();
        let mut config = ApiConfig::default();
        args.apply(&mut config);

        assert_eq!(config.port, 8080);
        assert!(config.log_json);
    }

    #[test]
    fn test_invalid_port_flag_rejected() {
        assert!(Args::try_parse_from(["modelabs-api", "--port", "http"]).is_err());
    }
}
