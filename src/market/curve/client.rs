use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    error::RequestError,
    helpers::path_segment,
    market::{
        curve::models::{MarketsResponse, SnapshotsResponse, UserMarketsResponse, UserStatsResponse},
        MarketData,
    },
    model::{MarketRate, MarketRef, PositionStats, SnapshotHistory},
    request::Request,
};

/// Client for the Curve lending price API (`prices.curve.fi/v1`)
pub struct CurveClient {
    request: Request,
    base_url: String,
}

impl CurveClient {
    /// Creates a new client
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `https://prices.curve.fi/v1`
    /// * `timeout` - per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RequestError> {
        Ok(Self {
            request: Request::new(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn user_url(&self, chain: &str, wallet: &str) -> String {
        format!(
            "{}/lending/users/{}/{}",
            self.base_url,
            path_segment(chain),
            path_segment(wallet)
        )
    }

    fn position_url(&self, chain: &str, wallet: &str, controller: &str, tail: &str) -> String {
        format!(
            "{}/{}/{}",
            self.user_url(chain, wallet),
            path_segment(controller),
            tail
        )
    }

    /// Runs a GET and turns every failure into `None`, logging why.
    async fn fetch<T: DeserializeOwned>(&self, url: &str, what: &str) -> Option<T> {
        match self.request.get_json::<T>(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                error!("Error getting {} data: {}", what, e);
                None
            }
        }
    }
}

#[async_trait]
impl MarketData for CurveClient {
    async fn fetch_positions(&self, chain: &str, wallet: &str) -> Option<Vec<MarketRef>> {
        let url = self.user_url(chain, wallet);
        let response: UserMarketsResponse = self.fetch(&url, "positions").await?;
        Some(response.markets)
    }

    async fn fetch_stats(&self, chain: &str, wallet: &str, controller: &str) -> Option<PositionStats> {
        let url = self.position_url(chain, wallet, controller, "stats");
        let response: UserStatsResponse = self.fetch(&url, "stats").await?;

        let stats = response.into_stats();
        if stats.is_none() {
            warn!("Stats for {} on {} carry no health value", controller, chain);
        }
        stats
    }

    async fn fetch_snapshots(&self, chain: &str, wallet: &str, controller: &str) -> Option<SnapshotHistory> {
        let url = self.position_url(chain, wallet, controller, "snapshots");
        let response: SnapshotsResponse = self.fetch(&url, "snapshots").await?;
        response.into_history()
    }

    async fn fetch_markets(&self, chain: &str) -> Option<Vec<(String, MarketRate)>> {
        let url = format!(
            "{}/lending/markets/{}?fetch_on_chain=false",
            self.base_url,
            path_segment(chain)
        );
        let response: MarketsResponse = self.fetch(&url, "markets").await?;
        Some(response.into_rates())
    }
}
