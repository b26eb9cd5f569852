use std::sync::Arc;

use chrono::{DateTime, Utc};

pub(super) use crate::workflows::testing::*;

use crate::workflows::points::{
    EntryId, LedgerFilter, LedgerRepository, LedgerStatus, PointsLedgerEntry,
};
use crate::workflows::store::RepositoryError;

/// Ledger that lists nothing and refuses every write.
pub(super) struct OfflineLedger;

impl LedgerRepository for OfflineLedger {
    fn append(&self, _entry: PointsLedgerEntry) -> Result<PointsLedgerEntry, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn list(&self, _filter: &LedgerFilter) -> Result<Vec<PointsLedgerEntry>, RepositoryError> {
        Ok(Vec::new())
    }

    fn update_status(
        &self,
        _entry_id: &EntryId,
        _expected: LedgerStatus,
        _next: LedgerStatus,
        _at: DateTime<Utc>,
    ) -> Result<PointsLedgerEntry, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }
}

/// Ledger that appends and lists through the wrapped store but cannot settle entries.
pub(super) struct UnsettledLedger {
    pub(super) inner: Arc<dyn LedgerRepository>,
}

impl LedgerRepository for UnsettledLedger {
    fn append(&self, entry: PointsLedgerEntry) -> Result<PointsLedgerEntry, RepositoryError> {
        self.inner.append(entry)
    }

    fn list(&self, filter: &LedgerFilter) -> Result<Vec<PointsLedgerEntry>, RepositoryError> {
        self.inner.list(filter)
    }

    fn update_status(
        &self,
        _entry_id: &EntryId,
        _expected: LedgerStatus,
        _next: LedgerStatus,
        _at: DateTime<Utc>,
    ) -> Result<PointsLedgerEntry, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }
}
