use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::alert::Notifier;
use crate::i18n::strings;
use crate::market::MarketData;
use crate::model::{PositionKey, PositionStats, UserConfig};
use crate::monitor::metrics::derive_metric;
use crate::monitor::policy::NotificationLedger;
use crate::monitor::render::{alert_message, position_block};
use crate::storage::{RateStore, UserStore};

/// Collaborators shared by every monitor task
#[derive(Clone)]
pub struct MonitorContext {
    pub store: Arc<dyn UserStore>,
    pub market: Arc<dyn MarketData>,
    pub rates: Arc<RateStore>,
    pub notifier: Arc<dyn Notifier>,
    pub chains: Arc<Vec<String>>,
    pub tick_interval: Duration,
}

struct OpenPosition {
    key: PositionKey,
    market_name: String,
    stats: PositionStats,
}

impl MonitorContext {
    /// Every actionable position of `wallets` across the configured chains.
    /// A failed lookup drops only the wallet/chain pair or position it was for.
    async fn open_positions(&self, wallets: &[String]) -> Vec<OpenPosition> {
        let chains: &[String] = &self.chains;
        let pairs = wallets
            .iter()
            .flat_map(move |wallet| chains.iter().map(move |chain| (chain.as_str(), wallet.as_str())));

        let listed = join_all(pairs.map(|(chain, wallet)| async move {
            match self.market.fetch_positions(chain, wallet).await {
                Some(markets) => markets
                    .into_iter()
                    .map(|m| (PositionKey::new(chain, wallet, &m.controller), m.market_name))
                    .collect::<Vec<_>>(),
                None => Vec::new(),
            }
        }))
        .await;

        let fetched = join_all(listed.into_iter().flatten().map(|(key, market_name)| async move {
            let stats = self
                .market
                .fetch_stats(&key.chain, &key.wallet, &key.controller)
                .await;
            (key, market_name, stats)
        }))
        .await;

        fetched
            .into_iter()
            .filter_map(|(key, market_name, stats)| match stats {
                Some(stats) if stats.is_actionable() => Some(OpenPosition { key, market_name, stats }),
                Some(_) => {
                    debug!("Skipping closed position {}", key);
                    None
                }
                None => None,
            })
            .collect()
    }

    /// One monitoring pass for a user. Alerts every position the ledger lets
    /// through and returns how many messages were delivered.
    pub async fn check_positions(
        &self,
        user_id: &str,
        config: &UserConfig,
        ledger: &mut NotificationLedger,
        now: DateTime<Utc>,
    ) -> usize {
        let Some(threshold) = config.alert_threshold() else {
            debug!("User {} has no alert threshold, nothing to check", user_id);
            return 0;
        };

        let mut delivered = 0;
        for position in self.open_positions(&config.wallets).await {
            let key = &position.key;
            if !ledger.should_notify(key, position.stats.health, threshold, config.notification_interval, now) {
                continue;
            }

            let snapshots = self
                .market
                .fetch_snapshots(&key.chain, &key.wallet, &key.controller)
                .await;
            let borrow_apy = self.rates.lookup_borrow_apy(&key.chain, &key.controller).await;
            let metric = derive_metric(&position.stats, snapshots.as_ref(), borrow_apy, now);
            let text = alert_message(config.language, &position.market_name, threshold, &metric);

            match self.notifier.notify(user_id, &text).await {
                Ok(()) => {
                    info!(
                        "🔔 Alert sent to {} for {} (health {:.2} < {})",
                        user_id, key, position.stats.health, threshold
                    );
                    delivered += 1;
                }
                Err(e) => error!("❌ Failed to send alert to {} for {}: {}", user_id, key, e),
            }
        }

        delivered
    }

    /// Current state of every open position, ignoring thresholds and the
    /// alert ledger
    pub async fn position_report(&self, config: &UserConfig) -> String {
        let now = Utc::now();
        let positions = self.open_positions(&config.wallets).await;

        let blocks = join_all(positions.iter().map(|position| async move {
            let key = &position.key;
            let snapshots = self
                .market
                .fetch_snapshots(&key.chain, &key.wallet, &key.controller)
                .await;
            let borrow_apy = self.rates.lookup_borrow_apy(&key.chain, &key.controller).await;
            let metric = derive_metric(&position.stats, snapshots.as_ref(), borrow_apy, now);
            position_block(config.language, &key.chain, &position.market_name, &metric)
        }))
        .await;

        if blocks.is_empty() {
            strings(config.language).no_positions.to_string()
        } else {
            blocks.join("\n")
        }
    }
}

type TaskRegistry = Arc<Mutex<HashMap<String, JoinHandle<()>>>>;

async fn monitor_user(ctx: MonitorContext, tasks: TaskRegistry, user_id: String) {
    let mut ledger = NotificationLedger::new();
    let mut ticker = interval(ctx.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("👀 Monitoring started for user {}", user_id);

    loop {
        ticker.tick().await;

        // registry stays locked until the task has deregistered, so `start`
        // never sees a task that already decided to stop
        let mut registry = tasks.lock().await;
        let config = match ctx.store.get(&user_id).await {
            Some(config) if config.monitoring_active => config,
            Some(_) => {
                registry.remove(&user_id);
                info!("Monitoring disabled for user {}, stopping", user_id);
                break;
            }
            None => {
                registry.remove(&user_id);
                warn!("User {} not found, stopping monitor", user_id);
                break;
            }
        };
        drop(registry);

        let delivered = ctx.check_positions(&user_id, &config, &mut ledger, Utc::now()).await;
        debug!("Tick done for user {} ({} alert(s))", user_id, delivered);
    }
}

/// Owns the monitor task of every subscribed user, at most one per user.
pub struct MonitorSupervisor {
    ctx: MonitorContext,
    tasks: TaskRegistry,
}

impl MonitorSupervisor {
    pub fn new(ctx: MonitorContext) -> Self {
        Self {
            ctx,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Spawns the monitor task for `user_id` unless one is already alive.
    /// Returns whether a task was spawned.
    pub async fn start(&self, user_id: &str) -> bool {
        let mut tasks = self.tasks.lock().await;

        if tasks.get(user_id).is_some_and(|handle| !handle.is_finished()) {
            debug!("Monitor for user {} already running", user_id);
            return false;
        }

        let handle = tokio::spawn(monitor_user(
            self.ctx.clone(),
            self.tasks.clone(),
            user_id.to_string(),
        ));
        tasks.insert(user_id.to_string(), handle);
        true
    }

    pub async fn is_running(&self, user_id: &str) -> bool {
        self.tasks
            .lock()
            .await
            .get(user_id)
            .is_some_and(|handle| !handle.is_finished())
    }

    pub async fn running_count(&self) -> usize {
        self.tasks
            .lock()
            .await
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Starts a monitor for every user persisted with monitoring enabled
    pub async fn recover(&self) -> usize {
        let users = self.ctx.store.load_all().await;

        let mut started = 0;
        for (user_id, config) in &users {
            if config.monitoring_active && self.start(user_id).await {
                started += 1;
            }
        }

        info!("♻️ Recovered {} monitor(s) from {} user(s)", started, users.len());
        started
    }

    pub async fn position_report(&self, config: &UserConfig) -> String {
        self.ctx.position_report(config).await
    }
}
