use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::helpers::deserialize_opt_f64_lenient;

/// Identifies one lending position: a wallet's loan in a given market
/// (controller) on a given chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub chain: String,
    pub wallet: String,
    pub controller: String,
}

impl PositionKey {
    pub fn new(chain: &str, wallet: &str, controller: &str) -> Self {
        Self {
            chain: chain.to_string(),
            wallet: wallet.to_string(),
            controller: controller.to_string(),
        }
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.chain, self.wallet, self.controller)
    }
}

/// A market the wallet has a loan in, as listed by the positions endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRef {
    pub controller: String,
    #[serde(default)]
    pub market_name: String,
}

/// Live statistics of one position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionStats {
    pub health: f64,
    pub debt: f64,
    pub oracle_price: f64,
    pub soft_liquidation: bool,
}

impl PositionStats {
    /// Zero or negative debt means the loan is repaid; zero health means the
    /// position no longer exists.
    pub fn is_actionable(&self) -> bool {
        self.health > 0.0 && self.debt > 0.0
    }
}

/// One historical record of a position's health. Fields stay loose because
/// the upstream is not consistent about them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "deserialize_opt_f64_lenient")]
    pub health_full: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

/// Snapshots ordered oldest to newest
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotHistory {
    pub records: Vec<Snapshot>,
}

impl SnapshotHistory {
    pub fn new(records: Vec<Snapshot>) -> Self {
        Self { records }
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.records.last()
    }
}
