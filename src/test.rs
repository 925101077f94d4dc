//! In-memory stand-ins for the external collaborators, shared by unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;

use crate::alert::Notifier;
use crate::error::{AlertError, StorageError};
use crate::market::MarketData;
use crate::model::{MarketRate, MarketRef, PositionKey, PositionStats, SnapshotHistory, UserConfig};
use crate::storage::UserStore;

/// Unique file path under the system temp dir
pub fn temp_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lend-monitor-{}-{}.json", prefix, uuid::Uuid::new_v4()))
}

pub fn stats(health: f64, debt: f64) -> PositionStats {
    PositionStats {
        health,
        debt,
        oracle_price: 2500.0,
        soft_liquidation: false,
    }
}

/// Canned upstream responses. Anything not registered is a failed fetch.
#[derive(Default)]
pub struct FakeMarket {
    positions: HashMap<(String, String), Vec<MarketRef>>,
    stats: HashMap<PositionKey, PositionStats>,
    snapshots: HashMap<PositionKey, SnapshotHistory>,
    markets: HashMap<String, Vec<(String, MarketRate)>>,
    pub stats_calls: AtomicUsize,
    pub snapshot_calls: AtomicUsize,
}

impl FakeMarket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a market for the wallet and, when given, its stats
    pub fn with_position(mut self, key: &PositionKey, market_name: &str, stats: Option<PositionStats>) -> Self {
        self.positions
            .entry((key.chain.clone(), key.wallet.clone()))
            .or_default()
            .push(MarketRef {
                controller: key.controller.clone(),
                market_name: market_name.to_string(),
            });
        if let Some(stats) = stats {
            self.stats.insert(key.clone(), stats);
        }
        self
    }

    pub fn with_snapshots(mut self, key: &PositionKey, history: SnapshotHistory) -> Self {
        self.snapshots.insert(key.clone(), history);
        self
    }

    pub fn with_markets(mut self, chain: &str, rates: Vec<(String, MarketRate)>) -> Self {
        self.markets.insert(chain.to_string(), rates);
        self
    }
}

#[async_trait]
impl MarketData for FakeMarket {
    async fn fetch_positions(&self, chain: &str, wallet: &str) -> Option<Vec<MarketRef>> {
        self.positions.get(&(chain.to_string(), wallet.to_string())).cloned()
    }

    async fn fetch_stats(&self, chain: &str, wallet: &str, controller: &str) -> Option<PositionStats> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.stats.get(&PositionKey::new(chain, wallet, controller)).copied()
    }

    async fn fetch_snapshots(&self, chain: &str, wallet: &str, controller: &str) -> Option<SnapshotHistory> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        self.snapshots.get(&PositionKey::new(chain, wallet, controller)).cloned()
    }

    async fn fetch_markets(&self, chain: &str) -> Option<Vec<(String, MarketRate)>> {
        self.markets.get(chain).cloned()
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserConfig>>,
}

impl MemoryUserStore {
    pub fn with_users(users: Vec<(&str, UserConfig)>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|(id, c)| (id.to_string(), c)).collect()),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, user_id: &str) -> Option<UserConfig> {
        self.users.read().await.get(user_id).cloned()
    }

    async fn load_all(&self) -> HashMap<String, UserConfig> {
        self.users.read().await.clone()
    }

    async fn save(&self, user_id: &str, config: UserConfig) -> Result<(), StorageError> {
        self.users.write().await.insert(user_id.to_string(), config);
        Ok(())
    }
}

/// Records every message; fails every delivery when `failing` is set
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
    pub failing: bool,
    pub attempts: AtomicUsize,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, user_id: &str, text: &str) -> Result<(), AlertError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(AlertError::InvalidRecipient(user_id.to_string()));
        }
        self.sent.lock().unwrap().push((user_id.to_string(), text.to_string()));
        Ok(())
    }
}
