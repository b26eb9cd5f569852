use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::actors::UserId;
use crate::workflows::applications::ApplicationId;
use crate::workflows::campaigns::CampaignId;
use crate::workflows::store::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Settlement marker of a ledger entry. Entries only ever move from `Pending` to `Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    Pending,
    Paid,
}

impl LedgerStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LedgerStatus::Pending => "pending",
            LedgerStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Point grant owed (pending) or paid to a user for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsLedgerEntry {
    pub entry_id: EntryId,
    pub user_id: UserId,
    pub campaign_id: CampaignId,
    pub application_id: ApplicationId,
    /// Campaign reward captured when the payout was requested.
    pub points_amount: u64,
    pub status: LedgerStatus,
    pub description: String,
    pub transaction_date: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerFilter {
    pub user_id: Option<UserId>,
    pub application_id: Option<ApplicationId>,
    pub status: Option<LedgerStatus>,
}

impl LedgerFilter {
    pub fn for_user(user_id: &UserId) -> Self {
        Self {
            user_id: Some(user_id.clone()),
            ..Self::default()
        }
    }

    pub fn for_application(application_id: &ApplicationId) -> Self {
        Self {
            application_id: Some(application_id.clone()),
            ..Self::default()
        }
    }

    pub fn matches(&self, entry: &PointsLedgerEntry) -> bool {
        self.user_id.as_ref().map_or(true, |id| &entry.user_id == id)
            && self
                .application_id
                .as_ref()
                .map_or(true, |id| &entry.application_id == id)
            && self.status.map_or(true, |status| entry.status == status)
    }
}

/// Append-oriented points ledger.
pub trait LedgerRepository: Send + Sync {
    /// `Duplicate` when the application already has a ledger entry.
    fn append(&self, entry: PointsLedgerEntry) -> Result<PointsLedgerEntry, RepositoryError>;

    fn list(&self, filter: &LedgerFilter) -> Result<Vec<PointsLedgerEntry>, RepositoryError>;

    /// Moves an entry from `expected` to `next`; `StaleState` when the stored status differs.
    fn update_status(
        &self,
        entry_id: &EntryId,
        expected: LedgerStatus,
        next: LedgerStatus,
        at: DateTime<Utc>,
    ) -> Result<PointsLedgerEntry, RepositoryError>;
}
