use serde::Serialize;

use super::ledger::{LedgerStatus, PointsLedgerEntry};

/// Per-user point balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PointsSummary {
    /// Requested payouts awaiting staff settlement.
    pub pending: u64,
    /// Settled grants.
    pub credited: u64,
    /// Gross amount of every withdrawal request.
    pub withdrawn: u64,
    pub available: u64,
}

impl PointsSummary {
    pub fn from_entries<'a, I>(entries: I, withdrawn: u64) -> Self
    where
        I: IntoIterator<Item = &'a PointsLedgerEntry>,
    {
        let (pending, credited) =
            entries
                .into_iter()
                .fold((0u64, 0u64), |(pending, credited), entry| match entry.status {
                    LedgerStatus::Pending => (pending.saturating_add(entry.points_amount), credited),
                    LedgerStatus::Paid => (pending, credited.saturating_add(entry.points_amount)),
                });

        Self {
            pending,
            credited,
            withdrawn,
            available: credited.saturating_sub(withdrawn),
        }
    }
}
