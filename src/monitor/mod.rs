pub mod metrics;
pub mod policy;
pub mod rates;
pub mod render;
pub mod supervisor;

pub use rates::{refresh_borrow_rates, run_rate_refresher};
pub use supervisor::{MonitorContext, MonitorSupervisor};
