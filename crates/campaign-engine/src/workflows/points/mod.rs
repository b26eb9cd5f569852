//! Points ledger, payout requests and staff settlement.

pub mod balance;
pub mod ledger;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use balance::PointsSummary;
pub use ledger::{EntryId, LedgerFilter, LedgerRepository, LedgerStatus, PointsLedgerEntry};
pub use router::points_router;
pub use service::{PayoutReceipt, PointsService, PointsStatement};
