use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// CORS allowed origins, comma separated
    pub cors_origins: Option<String>,

    /// Log level for this service and its HTTP layer when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// JWT secret key
    pub auth_jwt_secret: Option<String>,

    /// Role required for the diagnostics endpoint
    #[serde(default = "default_admin_role")]
    pub admin_role: String,

    /// How long a writer keeps the text to itself after its last write
    #[serde(default = "default_lease_ttl_secs")]
    pub lease_ttl_secs: u64,

    /// Text served before anyone has written
    #[serde(default = "default_initial_body")]
    pub initial_body: String,

    /// Upper bound on a single long-poll; unset waits until the next write
    pub listen_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables or app.env file.
    /// Runs before tracing is set up, so failures are reported by the caller.
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        Ok(envy::from_env::<Config>()?)
    }

    /// Tracing filter used when RUST_LOG is not set
    pub fn log_filter(&self) -> String {
        format!(
            "colabri_text={level},tower_http={level},axum::rejection=trace,info",
            level = self.log_level
        )
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment.to_lowercase() == "dev" || self.environment.to_lowercase() == "development"
    }

    pub fn lease_ttl(&self) -> Duration {
        Duration::from_secs(self.lease_ttl_secs)
    }

    /// Zero is treated the same as unset
    pub fn listen_timeout(&self) -> Option<Duration> {
        self.listen_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Parsed CORS origins, or None when not configured
    pub fn cors_origin_list(&self) -> Option<Vec<String>> {
        self.cors_origins.as_ref().map(|origins| {
            origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            cors_origins: None,
            auth_jwt_secret: None,
            admin_role: default_admin_role(),
            lease_ttl_secs: default_lease_ttl_secs(),
            initial_body: default_initial_body(),
            listen_timeout_secs: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvError(#[from] envy::Error),
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_admin_role() -> String {
    "Colabri-Admin".to_string()
}

fn default_lease_ttl_secs() -> u64 {
    5
}

fn default_initial_body() -> String {
    "Hello World".to_string()
}
