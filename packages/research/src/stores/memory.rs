//! In-memory strain cache for testing and development.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::Result;
use crate::record::StrainRecord;
use crate::traits::store::{CacheHit, RowLocator, StrainStore};

/// In-memory row store. Useful for tests and for running without a
/// spreadsheet configured; data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<StrainRecord>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with records.
    pub fn with_records(records: impl IntoIterator<Item = StrainRecord>) -> Self {
        Self {
            rows: RwLock::new(records.into_iter().collect()),
        }
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// True if no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all rows, for assertions.
    pub fn records(&self) -> Vec<StrainRecord> {
        self.rows.read().unwrap().clone()
    }
}

#[async_trait]
impl StrainStore for MemoryStore {
    async fn find_by_query(&self, query: &str) -> Result<Option<CacheHit>> {
        let rows = self.rows.read().unwrap();
        Ok(rows.iter().enumerate().find_map(|(idx, record)| {
            record.matches_query(query).then(|| CacheHit {
                record: record.clone(),
                locator: RowLocator::new(idx),
            })
        }))
    }

    async fn insert(&self, record: &StrainRecord) -> Result<()> {
        self.rows.write().unwrap().push(record.clone());
        Ok(())
    }

    async fn update(&self, locator: RowLocator, record: &StrainRecord) -> Result<()> {
        let mut rows = self.rows.write().unwrap();
        match rows.get_mut(locator.row) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(crate::error::ResearchError::cache_msg(format!(
                "row {} out of range",
                locator.row
            ))),
        }
    }
}
