//! Storage trait for the strain cache.
//!
//! The cache is an external row-oriented table (a spreadsheet in
//! production, memory in tests). The store is I/O only: match policy
//! lives on [`StrainRecord::matches_query`] and absence detection on
//! [`StrainRecord::absent_fields`], shared by every backend.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::record::StrainRecord;

/// Opaque position of a row, meaningful only to the store that issued it.
/// The sheet store uses 1-based sheet row numbers; the memory store uses
/// vector indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLocator {
    pub row: usize,
}

impl RowLocator {
    pub fn new(row: usize) -> Self {
        Self { row }
    }
}

/// A cache lookup hit: the materialized record and where it lives.
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub record: StrainRecord,
    pub locator: RowLocator,
}

/// Row-oriented strain cache.
#[async_trait]
pub trait StrainStore: Send + Sync {
    /// Find the first row matching the query (first-match-wins over row
    /// order, not best-match). Returns None on a clean miss.
    async fn find_by_query(&self, query: &str) -> Result<Option<CacheHit>>;

    /// Append a new row for the record.
    async fn insert(&self, record: &StrainRecord) -> Result<()>;

    /// Overwrite the row at the locator in place.
    async fn update(&self, locator: RowLocator, record: &StrainRecord) -> Result<()>;
}

#[async_trait]
impl<T: StrainStore + ?Sized> StrainStore for Arc<T> {
    async fn find_by_query(&self, query: &str) -> Result<Option<CacheHit>> {
        self.as_ref().find_by_query(query).await
    }

    async fn insert(&self, record: &StrainRecord) -> Result<()> {
        self.as_ref().insert(record).await
    }

    async fn update(&self, locator: RowLocator, record: &StrainRecord) -> Result<()> {
        self.as_ref().update(locator, record).await
    }
}
