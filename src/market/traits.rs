use async_trait::async_trait;

use crate::model::{MarketRate, MarketRef, PositionStats, SnapshotHistory};

/// Read-only access to the lending price API.
///
/// Every method swallows its own failures: a `None` means "no data for this
/// item this tick" and the reason has already been logged.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Markets the wallet has a position in on `chain`
    async fn fetch_positions(&self, chain: &str, wallet: &str) -> Option<Vec<MarketRef>>;

    /// Current stats of one position
    async fn fetch_stats(&self, chain: &str, wallet: &str, controller: &str) -> Option<PositionStats>;

    /// Historical health snapshots of one position, `None` when there are none
    async fn fetch_snapshots(&self, chain: &str, wallet: &str, controller: &str) -> Option<SnapshotHistory>;

    /// Borrow rates of every lending market on `chain`, keyed by controller
    async fn fetch_markets(&self, chain: &str) -> Option<Vec<(String, MarketRate)>>;
}
