pub mod rate_store;
pub mod user_store;

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use crate::error::StorageError;
use crate::model::UserConfig;

pub use rate_store::RateStore;
pub use user_store::JsonUserStore;

/// Durable per-user configuration.
///
/// Readers must tolerate a record changing between two reads; there is no
/// transactional guarantee across calls.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Option<UserConfig>;

    async fn load_all(&self) -> HashMap<String, UserConfig>;

    async fn save(&self, user_id: &str, config: UserConfig) -> Result<(), StorageError>;
}

/// Serializes `value` to a sibling temp file and renames it over `path`, so
/// readers never see a half-written file.
pub(crate) async fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
