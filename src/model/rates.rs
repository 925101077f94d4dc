use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Borrow rate of one market, as stored in the rate table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRate {
    pub name: String,
    pub borrow_apy: f64,
}

/// chain -> controller -> rate
pub type BorrowRateTable = BTreeMap<String, BTreeMap<String, MarketRate>>;

/// Borrow APY of a position's market, or a marker that no rate is known
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorrowApy {
    Available(f64),
    Unavailable,
}

impl fmt::Display for BorrowApy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BorrowApy::Available(v) => write!(f, "{:.0}", v),
            BorrowApy::Unavailable => write!(f, "N/A"),
        }
    }
}
