use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::model::UserConfig;
use crate::storage::{write_json_atomic, UserStore};

/// User store backed by a single JSON file
/// (`{userId: {language, wallets, monitor_threshold, ...}}`).
///
/// The whole file is read once at open and kept in memory; every save
/// updates the cache and rewrites the file.
pub struct JsonUserStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, UserConfig>>,
}

impl JsonUserStore {
    /// Opens the store, starting empty when the file does not exist yet
    ///
    /// # Errors
    /// * `StorageError::Json` - the file exists but is not a valid user map
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let users = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<HashMap<String, UserConfig>>(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No user file at {}, starting with an empty store", path.display());
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} user(s) from {}", users.len(), path.display());

        Ok(Self {
            path,
            cache: RwLock::new(users),
        })
    }
}

#[async_trait]
impl UserStore for JsonUserStore {
    async fn get(&self, user_id: &str) -> Option<UserConfig> {
        self.cache.read().await.get(user_id).cloned()
    }

    async fn load_all(&self) -> HashMap<String, UserConfig> {
        self.cache.read().await.clone()
    }

    async fn save(&self, user_id: &str, config: UserConfig) -> Result<(), StorageError> {
        let mut users = self.cache.write().await;
        users.insert(user_id.to_string(), config);
        // lock held across the write so concurrent saves hit the file in order
        write_json_atomic(&self.path, &*users).await
    }
}
