use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::model::{BorrowApy, BorrowRateTable};
use crate::storage::write_json_atomic;

/// Borrow-rate table persisted as `{chain: {controller: {name, borrow_apy}}}`.
///
/// Written only by the rate refresher, read by every monitor task.
pub struct RateStore {
    path: PathBuf,
}

impl RateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Reads the last persisted table. A missing file is an empty table.
    pub async fn load(&self) -> Result<BorrowRateTable, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BorrowRateTable::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrites the file with `table`
    pub async fn save(&self, table: &BorrowRateTable) -> Result<(), StorageError> {
        write_json_atomic(&self.path, table).await
    }

    /// Borrow APY of `controller` on `chain` from the persisted table.
    /// Never fetches: a missing file, a corrupt file or an unknown key all
    /// give `BorrowApy::Unavailable`.
    pub async fn lookup_borrow_apy(&self, chain: &str, controller: &str) -> BorrowApy {
        let table = match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<BorrowRateTable>(&bytes) {
                Ok(table) => table,
                Err(e) => {
                    error!("Failed to parse borrow rates file {}: {}", self.path.display(), e);
                    return BorrowApy::Unavailable;
                }
            },
            Err(e) => {
                error!("Failed to read borrow rates file {}: {}", self.path.display(), e);
                return BorrowApy::Unavailable;
            }
        };

        table
            .get(chain)
            .and_then(|markets| markets.get(controller))
            .map(|rate| BorrowApy::Available(rate.borrow_apy))
            .unwrap_or(BorrowApy::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarketRate;
    use crate::test::temp_path;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_lookup_missing_file() {
        let store = RateStore::new(temp_path("rates"));
        assert_eq!(store.lookup_borrow_apy("ethereum", "0xC").await, BorrowApy::Unavailable);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_corrupt_file() {
        let path = temp_path("rates");
        std::fs::write(&path, "[1, 2").unwrap();
        let store = RateStore::new(&path);
        assert_eq!(store.lookup_borrow_apy("ethereum", "0xC").await, BorrowApy::Unavailable);
        assert!(store.load().await.is_err());
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_save_then_lookup() {
        let path = temp_path("rates");
        let store = RateStore::new(&path);

        let mut table = BorrowRateTable::new();
        table.insert(
            "ethereum".to_string(),
            BTreeMap::from([(
                "0xC".to_string(),
                MarketRate { name: "WETH-long".to_string(), borrow_apy: 8.4 },
            )]),
        );
        store.save(&table).await.unwrap();

        assert_eq!(store.lookup_borrow_apy("ethereum", "0xC").await, BorrowApy::Available(8.4));
        assert_eq!(store.lookup_borrow_apy("ethereum", "0xD").await, BorrowApy::Unavailable);
        assert_eq!(store.lookup_borrow_apy("arbitrum", "0xC").await, BorrowApy::Unavailable);
        assert_eq!(store.load().await.unwrap(), table);

        let _ = std::fs::remove_file(path);
    }
}
