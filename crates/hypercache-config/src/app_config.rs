//! Application configuration structures.

use crate::DeploymentRole;
use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Listener configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Which halves of the gateway this process runs.
    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "hypercache".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Headroom on top of `max_body_size` for the non-value fields of a gRPC message.
const GRPC_MESSAGE_OVERHEAD: usize = 64 * 1024;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP gateway host.
    pub rest_host: String,
    /// HTTP gateway port.
    pub rest_port: u16,
    /// Internal gRPC service host.
    pub grpc_host: String,
    /// Internal gRPC service port.
    pub grpc_port: u16,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rest_host: "0.0.0.0".to_string(),
            rest_port: 8080,
            grpc_host: "0.0.0.0".to_string(),
            grpc_port: 50051,
            max_body_size: 10 * 1024 * 1024, // 10MB
            cors_enabled: false,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Returns the HTTP gateway address.
    #[must_use]
    pub fn rest_addr(&self) -> String {
        format!("{}:{}", self.rest_host, self.rest_port)
    }

    /// Returns the gRPC service address.
    #[must_use]
    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.grpc_host, self.grpc_port)
    }

    /// Returns the largest message the internal gRPC hop must carry.
    ///
    /// A value accepted by the HTTP gateway is never larger than the request
    /// body, so the body limit plus room for keys and framing is enough.
    #[must_use]
    pub fn grpc_max_message_size(&self) -> usize {
        self.max_body_size.saturating_add(GRPC_MESSAGE_OVERHEAD)
    }
}

/// Deployment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Role of this process.
    pub role: DeploymentRole,
    /// Internal service URL (required for the gateway role).
    pub service_url: Option<String>,
    /// Health checks made against the internal service before the gateway starts.
    pub readiness_attempts: u32,
    /// Pause between readiness health checks, in milliseconds.
    pub readiness_interval_ms: u64,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            role: DeploymentRole::default(),
            service_url: None,
            readiness_attempts: 50,
            readiness_interval_ms: 100,
        }
    }
}

impl DeploymentConfig {
    /// Returns the pause between readiness health checks.
    #[must_use]
    pub fn readiness_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.readiness_interval_ms)
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL.
    pub url: String,
    /// Connection pool size.
    pub pool_size: usize,
    /// Use Redis; when disabled the service keeps entries in process memory.
    pub enabled: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            pool_size: 16,
            enabled: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info,hypercache=debug,tower_http=debug".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
