use serde::{Deserialize, Serialize};

use crate::helpers::deserialize_opt_f64_lenient;
use crate::model::{MarketRate, MarketRef, PositionStats, Snapshot, SnapshotHistory};

/// `GET /lending/users/{chain}/{wallet}`
#[derive(Debug, Serialize, Deserialize)]
pub struct UserMarketsResponse {
    #[serde(default)]
    pub markets: Vec<MarketRef>,
}

/// `GET /lending/users/{chain}/{wallet}/{controller}/stats`
///
/// Older deployments report `health` instead of `health_full`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatsResponse {
    #[serde(default, deserialize_with = "deserialize_opt_f64_lenient")]
    pub health_full: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64_lenient")]
    pub health: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64_lenient")]
    pub debt: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64_lenient")]
    pub oracle_price: Option<f64>,
    #[serde(default)]
    pub soft_liquidation: Option<bool>,
}

impl UserStatsResponse {
    /// `None` when the response carries no health figure at all
    pub fn into_stats(self) -> Option<PositionStats> {
        let health = self.health_full.or(self.health)?;

        Some(PositionStats {
            health,
            debt: self.debt.unwrap_or(0.0),
            oracle_price: self.oracle_price.unwrap_or(0.0),
            soft_liquidation: self.soft_liquidation.unwrap_or(false),
        })
    }
}

/// `GET /lending/users/{chain}/{wallet}/{controller}/snapshots`
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotsResponse {
    #[serde(default)]
    pub data: Vec<Snapshot>,
}

impl SnapshotsResponse {
    pub fn into_history(self) -> Option<SnapshotHistory> {
        if self.data.is_empty() {
            None
        } else {
            Some(SnapshotHistory::new(self.data))
        }
    }
}

/// `GET /lending/markets/{chain}?fetch_on_chain=false`
#[derive(Debug, Serialize, Deserialize)]
pub struct MarketsResponse {
    #[serde(default)]
    pub data: Vec<MarketEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarketEntry {
    pub controller: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_opt_f64_lenient")]
    pub borrow_apy: Option<f64>,
}

impl MarketsResponse {
    /// Markets without a borrow rate are left out
    pub fn into_rates(self) -> Vec<(String, MarketRate)> {
        self.data
            .into_iter()
            .filter_map(|m| {
                let borrow_apy = m.borrow_apy?;
                Some((m.controller, MarketRate { name: m.name, borrow_apy }))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_prefers_health_full() {
        let stats: UserStatsResponse = serde_json::from_str(
            r#"{"health_full": 4.3, "health": 3.9, "debt": "120.5", "oracle_price": 2500.1}"#,
        )
        .unwrap();
        let stats = stats.into_stats().unwrap();
        assert_eq!(stats.health, 4.3);
        assert_eq!(stats.debt, 120.5);
        assert!(!stats.soft_liquidation);
    }

    #[test]
    fn test_stats_falls_back_to_health() {
        let stats: UserStatsResponse =
            serde_json::from_str(r#"{"health": 3.9, "debt": 10, "soft_liquidation": true}"#).unwrap();
        let stats = stats.into_stats().unwrap();
        assert_eq!(stats.health, 3.9);
        assert_eq!(stats.oracle_price, 0.0);
        assert!(stats.soft_liquidation);

        let empty: UserStatsResponse = serde_json::from_str(r#"{"debt": 10}"#).unwrap();
        assert!(empty.into_stats().is_none());
    }

    #[test]
    fn test_empty_snapshots_are_none() {
        let response: SnapshotsResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(response.into_history().is_none());

        let response: SnapshotsResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.into_history().is_none());
    }

    #[test]
    fn test_markets_skip_missing_rates() {
        let response: MarketsResponse = serde_json::from_str(
            r#"{"data": [
                {"controller": "0xC1", "name": "WETH-long", "borrow_apy": 7.5},
                {"controller": "0xC2", "name": "broken", "borrow_apy": null}
            ]}"#,
        )
        .unwrap();
        let rates = response.into_rates();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].0, "0xC1");
        assert_eq!(rates[0].1.borrow_apy, 7.5);
    }
}
