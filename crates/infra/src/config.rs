//! Process configuration from the environment.

use std::time::Duration;

use anyhow::{Context, bail};

/// Runtime configuration, sourced from environment variables.
///
/// Service discovery and secret management are the deployment environment's
/// concern; this only reads what that environment injects.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds (`BIND_ADDR`, default `0.0.0.0:8080`).
    pub bind_addr: String,
    /// Switch between in-memory and Postgres/remote wiring
    /// (`USE_PERSISTENT_STORES`, default false).
    pub use_persistent_stores: bool,
    /// Postgres connection string (`DATABASE_URL`); required when persistent.
    pub database_url: Option<String>,
    /// Base URL of the remote inventory authority (`INVENTORY_SERVICE_URL`).
    pub inventory_service_url: String,
    /// Upper bound on one stock lookup (`STOCK_CHECK_TIMEOUT_MS`, default 2000).
    pub stock_check_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let use_persistent_stores = std::env::var("USE_PERSISTENT_STORES")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let database_url = std::env::var("DATABASE_URL").ok();
        if use_persistent_stores && database_url.is_none() {
            bail!("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
        }

        let inventory_service_url = std::env::var("INVENTORY_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8081".to_string());

        let stock_check_timeout = std::env::var("STOCK_CHECK_TIMEOUT_MS")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("STOCK_CHECK_TIMEOUT_MS must be an integer number of milliseconds")?
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(2000));

        Ok(Self {
            bind_addr,
            use_persistent_stores,
            database_url,
            inventory_service_url,
            stock_check_timeout,
        })
    }
}
