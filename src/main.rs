#[macro_use]
extern crate log;

mod alert;
mod bot;
mod config;
mod error;
mod helpers;
mod i18n;
mod market;
mod model;
mod monitor;
mod request;
mod storage;
#[cfg(test)]
mod test;

use anyhow::{Context, Result};
use colored::*;
use std::io::Write;
use std::sync::Arc;
use teloxide::Bot;

use crate::alert::TelegramNotifier;
use crate::bot::BotState;
use crate::config::AppConfig;
use crate::market::curve::CurveClient;
use crate::market::MarketData;
use crate::monitor::{run_rate_refresher, MonitorContext, MonitorSupervisor};
use crate::storage::{JsonUserStore, RateStore, UserStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger with custom formatter
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let level = record.level();
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

            let level_string = match level {
                log::Level::Error => format!(" {} ", level).on_red().black().to_string(),
                log::Level::Warn => format!(" {}  ", level).on_yellow().black().to_string(),
                log::Level::Info => format!(" {}  ", level).to_string(),
                log::Level::Debug => format!(" {} ", level).dimmed().to_string(),
                log::Level::Trace => format!(" {} ", level).dimmed().to_string(),
            };

            writeln!(
                buf,
                "{} {}: {}",
                timestamp.to_string().dimmed(),
                level_string,
                record.args()
            )
        })
        .init();

    info!("🚀 Starting Curve Lend monitor...");

    let config = AppConfig::load()?;
    let chains = config.chains();
    info!("✅ Configuration loaded | Chains: {}", chains.join(", "));

    let store: Arc<dyn UserStore> = Arc::new(
        JsonUserStore::open(&config.storage.users_file)
            .await
            .with_context(|| format!("Failed to open user store {}", config.storage.users_file))?,
    );
    let market: Arc<dyn MarketData> = Arc::new(
        CurveClient::new(&config.api.base_url, config.api_timeout()).context("Failed to create API client")?,
    );
    let rates = Arc::new(RateStore::new(&config.storage.borrow_rates_file));

    let bot = Bot::new(&config.telegram.bot_token);
    let notifier = Arc::new(TelegramNotifier::new(bot.clone()));

    tokio::spawn(run_rate_refresher(
        market.clone(),
        rates.clone(),
        chains.clone(),
        config.rate_refresh_interval(),
    ));
    info!("📈 Borrow rate refresher started (every {}s)", config.monitoring.rate_refresh_seconds);

    let supervisor = Arc::new(MonitorSupervisor::new(MonitorContext {
        store: store.clone(),
        market,
        rates,
        notifier,
        chains: Arc::new(chains),
        tick_interval: config.tick_interval(),
    }));
    if supervisor.recover().await > 0 {
        info!("👀 {} monitor(s) running", supervisor.running_count().await);
    }

    info!("🤖 Bot is running");
    bot::run(bot, Arc::new(BotState::new(store, supervisor))).await;

    info!("👋 Shutting down");
    Ok(())
}
