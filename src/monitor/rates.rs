use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::market::MarketData;
use crate::model::BorrowRateTable;
use crate::storage::RateStore;

/// Fetches the market list of every chain concurrently and merges the
/// results into the persisted table.
///
/// A chain whose fetch fails keeps the entries from the previous refresh, so
/// lookups keep serving the last known rate. The merged table is written
/// back and returned; a failed write is only logged.
pub async fn refresh_borrow_rates(market: &dyn MarketData, store: &RateStore, chains: &[String]) -> BorrowRateTable {
    let fetches = chains.iter().map(|chain| async move {
        (chain.clone(), market.fetch_markets(chain).await)
    });
    let results = futures::future::join_all(fetches).await;

    let mut table = match store.load().await {
        Ok(table) => table,
        Err(e) => {
            warn!("Previous borrow rates unreadable, starting fresh: {}", e);
            BorrowRateTable::new()
        }
    };

    for (chain, rates) in results {
        match rates {
            Some(rates) => {
                debug!("Fetched {} borrow rates for {}", rates.len(), chain);
                table.insert(chain, rates.into_iter().collect());
            }
            None => warn!("Failed to fetch borrow rates for {}, keeping previous values", chain),
        }
    }

    match store.save(&table).await {
        Ok(()) => info!("Borrow rates updated and saved ({} chains)", table.len()),
        Err(e) => error!("Failed to save borrow rates: {}", e),
    }

    table
}

/// Refreshes the borrow-rate table forever on a fixed cadence. The first
/// refresh runs immediately.
pub async fn run_rate_refresher(
    market: Arc<dyn MarketData>,
    store: Arc<RateStore>,
    chains: Vec<String>,
    period: Duration,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        refresh_borrow_rates(market.as_ref(), &store, &chains).await;
    }
}
