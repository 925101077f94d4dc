pub mod curve;
mod traits;

pub use traits::MarketData;
