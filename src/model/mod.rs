pub mod position;
pub mod rates;
pub mod user;

pub use position::*;
pub use rates::{BorrowApy, BorrowRateTable, MarketRate};
pub use user::{Language, UserConfig};
