use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub api: ApiConfig,
    pub monitoring: MonitoringConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the lending price API, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for upstream API calls (in seconds)
    #[serde(default = "default_api_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Start-to-start delay between two checks of one user (in seconds)
    #[serde(default = "default_tick_interval_seconds")]
    pub tick_interval_seconds: u64,
    /// How often the borrow-rate table is refreshed (in seconds)
    #[serde(default = "default_rate_refresh_seconds")]
    pub rate_refresh_seconds: u64,
    /// Chains queried for every wallet
    #[serde(default = "default_chains")]
    pub chains: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_borrow_rates_file")]
    pub borrow_rates_file: String,
}

// Default values
fn default_base_url() -> String {
    "https://prices.curve.fi/v1".to_string()
}

fn default_api_timeout_seconds() -> u64 {
    10
}

fn default_tick_interval_seconds() -> u64 {
    300 // 5 minutes
}

fn default_rate_refresh_seconds() -> u64 {
    900 // 15 minutes
}

fn default_chains() -> Vec<String> {
    vec!["ethereum".to_string(), "arbitrum".to_string()]
}

fn default_users_file() -> String {
    "user_data.json".to_string()
}

fn default_borrow_rates_file() -> String {
    "borrow_rates.json".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            // Set defaults
            .set_default("api.base_url", default_base_url())?
            .set_default("api.timeout_seconds", default_api_timeout_seconds())?
            .set_default("monitoring.tick_interval_seconds", default_tick_interval_seconds())?
            .set_default("monitoring.rate_refresh_seconds", default_rate_refresh_seconds())?
            .set_default("monitoring.chains", default_chains())?
            .set_default("storage.users_file", default_users_file())?
            .set_default("storage.borrow_rates_file", default_borrow_rates_file())?
            // Try to load from config file (optional)
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("monitoring.chains")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            anyhow::bail!("Telegram bot token is required");
        }

        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url cannot be empty");
        }

        if self.api.timeout_seconds == 0 {
            anyhow::bail!("api.timeout_seconds must be greater than 0");
        }

        if self.monitoring.tick_interval_seconds == 0 || self.monitoring.rate_refresh_seconds == 0 {
            anyhow::bail!("Monitoring intervals must be greater than 0");
        }

        if self.monitoring.chains.iter().all(|c| c.trim().is_empty()) {
            anyhow::bail!("At least one chain must be configured");
        }

        Ok(())
    }

    /// Get the per-user check cadence as Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.monitoring.tick_interval_seconds)
    }

    /// Get the borrow-rate refresh cadence as Duration
    pub fn rate_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.monitoring.rate_refresh_seconds)
    }

    /// Get API timeout as Duration
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    /// Configured chains, trimmed, empty entries dropped
    pub fn chains(&self) -> Vec<String> {
        self.monitoring
            .chains
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }
}
