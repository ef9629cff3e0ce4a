//! API configuration.

use modelabs_application::services::DEFAULT_MAX_UPLOAD_BYTES;
use modelabs_infrastructure::StorageConfig;
use modelabs_worker::WorkerConfig;
use std::time::Duration;

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host to bind to
    pub host: String,

    /// Server port to bind to
    pub port: u16,

    /// Frontend origin allowed by CORS
    pub frontend_url: String,

    /// PostgreSQL URL; in-memory stores are used when unset
    pub database_url: Option<String>,

    /// Object storage for dataset files; in-memory when unset
    pub storage: Option<StorageConfig>,

    /// Evaluation worker pool settings
    pub worker: WorkerConfig,

    /// Maximum dataset file size in bytes
    pub max_upload_bytes: u64,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Log level
    pub log_level: String,

    /// Emit logs as JSON
    pub log_json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            frontend_url: "http://localhost:3000".to_string(),
            database_url: None,
            storage: None,
            worker: WorkerConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout_seconds: 30,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let config = Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            frontend_url: std::env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            storage: StorageConfig::from_env(),
            worker: WorkerConfig::from_env(),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_upload_bytes),
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_seconds),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: std::env::var("LOG_JSON")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.log_json),
        };

        Ok(config)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Body limit for the upload route; leaves room for the form fields
    pub fn upload_body_limit(&self) -> usize {
        usize::try_from(self.max_upload_bytes)
            .unwrap_or(usize::MAX)
            .saturating_add(64 * 1024)
    }

    /// Get server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
