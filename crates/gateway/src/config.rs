//! Configuration loading and validation for the gateway.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Secret embedded in every shielded token. **Required.**
    pub shared_secret: String,

    /// Passphrase the token cipher key is derived from. **Required.**
    pub token_passphrase: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// HTTP header carrying the active domain.
    #[serde(default = "default_domain_header")]
    pub domain_header_name: String,

    /// Page size for listing endpoints when `itemsPerPage` is absent.
    #[serde(default = "default_items_per_page")]
    pub default_items_per_page: u64,

    /// Start with maintenance mode active.
    #[serde(default)]
    pub maintenance_mode: bool,

    /// OTLP endpoint for trace export; tracing stays local when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_domain_header() -> String {
    "X-Agora-Domain".into()
}
fn default_items_per_page() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.shared_secret, "SHARED_SECRET")?;
        ensure_non_empty(&self.token_passphrase, "TOKEN_PASSPHRASE")?;
        ensure_non_empty(&self.domain_header_name, "DOMAIN_HEADER_NAME")?;

        if self.default_items_per_page == 0 {
            anyhow::bail!("DEFAULT_ITEMS_PER_PAGE must be > 0");
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
