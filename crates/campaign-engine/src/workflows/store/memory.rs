use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::workflows::actors::UserId;
use crate::workflows::applications::{
    ApplicationFilter, ApplicationId, ApplicationRecord, ApplicationRepository, WriteCondition,
};
use crate::workflows::campaigns::{CampaignDirectory, CampaignId, CampaignSnapshot, DirectoryError};
use crate::workflows::points::{
    EntryId, LedgerFilter, LedgerRepository, LedgerStatus, PointsLedgerEntry,
};
use crate::workflows::reviews::{ReviewRepository, ReviewSubmission};
use crate::workflows::withdrawals::{
    BankAccount, BankAccountRegistry, WithdrawalRepository, WithdrawalRequest,
};

#[derive(Default)]
struct MemoryState {
    applications: BTreeMap<ApplicationId, ApplicationRecord>,
    reviews: BTreeMap<ApplicationId, ReviewSubmission>,
    ledger: Vec<PointsLedgerEntry>,
    withdrawals: Vec<WithdrawalRequest>,
    bank_accounts: HashMap<UserId, BankAccount>,
}

impl MemoryState {
    fn admitted(&self, campaign_id: &CampaignId, excluding: &ApplicationId) -> u32 {
        let count = self
            .applications
            .values()
            .filter(|record| {
                &record.campaign_id == campaign_id
                    && &record.application_id != excluding
                    && record.status.is_admitted()
            })
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn has_active(&self, user_id: &UserId, campaign_id: &CampaignId, excluding: &ApplicationId) -> bool {
        self.applications.values().any(|record| {
            &record.user_id == user_id
                && &record.campaign_id == campaign_id
                && &record.application_id != excluding
                && record.status.is_active()
        })
    }

    fn requested_total(&self, user_id: &UserId) -> u64 {
        self.withdrawals
            .iter()
            .filter(|request| &request.user_id == user_id)
            .fold(0u64, |total, request| total.saturating_add(request.amount))
    }
}

/// Single-process store backing every repository trait. One lock covers all collections, so
/// each conditional write is checked and applied atomically.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("memory store lock poisoned".to_string()))
    }

    pub fn register_verified_account(
        &self,
        user_id: UserId,
        account: BankAccount,
    ) -> Result<(), RepositoryError> {
        self.state()?.bank_accounts.insert(user_id, account);
        Ok(())
    }
}

impl ApplicationRepository for MemoryStore {
    fn insert(
        &self,
        record: ApplicationRecord,
        condition: WriteCondition,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut state = self.state()?;

        if state.applications.contains_key(&record.application_id)
            || state.has_active(&record.user_id, &record.campaign_id, &record.application_id)
        {
            return Err(RepositoryError::Duplicate);
        }
        if let Some(max) = condition.admission_limit {
            if state.admitted(&record.campaign_id, &record.application_id) >= max {
                return Err(RepositoryError::CapacityReached { max });
            }
        }

        state
            .applications
            .insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update(
        &self,
        record: ApplicationRecord,
        condition: WriteCondition,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut state = self.state()?;
        let stored_status = state
            .applications
            .get(&record.application_id)
            .map(|stored| stored.status)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(expected) = condition.expected_status {
            if stored_status != expected {
                return Err(RepositoryError::StaleState {
                    current: stored_status.label().to_string(),
                });
            }
        }
        if let Some(max) = condition.admission_limit {
            let admits = record.status.is_admitted() && !stored_status.is_admitted();
            if admits && state.admitted(&record.campaign_id, &record.application_id) >= max {
                return Err(RepositoryError::CapacityReached { max });
            }
        }
        if record.status.is_active()
            && !stored_status.is_active()
            && state.has_active(&record.user_id, &record.campaign_id, &record.application_id)
        {
            return Err(RepositoryError::Duplicate);
        }

        state
            .applications
            .insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(self.state()?.applications.get(id).cloned())
    }

    fn list(&self, filter: &ApplicationFilter) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let state = self.state()?;
        let mut records: Vec<ApplicationRecord> = state
            .applications
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.applied_at.cmp(&b.applied_at));
        Ok(records)
    }
}

impl ReviewRepository for MemoryStore {
    fn insert(&self, review: ReviewSubmission) -> Result<ReviewSubmission, RepositoryError> {
        let mut state = self.state()?;
        if state.reviews.contains_key(&review.application_id) {
            return Err(RepositoryError::Duplicate);
        }
        state
            .reviews
            .insert(review.application_id.clone(), review.clone());
        Ok(review)
    }

    fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<ReviewSubmission>, RepositoryError> {
        Ok(self.state()?.reviews.get(application_id).cloned())
    }

    fn update(
        &self,
        review: ReviewSubmission,
        expected_revision: u32,
    ) -> Result<ReviewSubmission, RepositoryError> {
        let mut state = self.state()?;
        let stored = state
            .reviews
            .get_mut(&review.application_id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.revision != expected_revision {
            return Err(RepositoryError::StaleState {
                current: format!("revision {}", stored.revision),
            });
        }
        *stored = review.clone();
        Ok(review)
    }
}

impl LedgerRepository for MemoryStore {
    fn append(&self, entry: PointsLedgerEntry) -> Result<PointsLedgerEntry, RepositoryError> {
        let mut state = self.state()?;
        if state
            .ledger
            .iter()
            .any(|existing| existing.application_id == entry.application_id)
        {
            return Err(RepositoryError::Duplicate);
        }
        state.ledger.push(entry.clone());
        Ok(entry)
    }

    fn list(&self, filter: &LedgerFilter) -> Result<Vec<PointsLedgerEntry>, RepositoryError> {
        Ok(self
            .state()?
            .ledger
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect())
    }

    fn update_status(
        &self,
        entry_id: &EntryId,
        expected: LedgerStatus,
        next: LedgerStatus,
        at: DateTime<Utc>,
    ) -> Result<PointsLedgerEntry, RepositoryError> {
        let mut state = self.state()?;
        let entry = state
            .ledger
            .iter_mut()
            .find(|entry| &entry.entry_id == entry_id)
            .ok_or(RepositoryError::NotFound)?;
        if entry.status != expected {
            return Err(RepositoryError::StaleState {
                current: entry.status.label().to_string(),
            });
        }
        entry.status = next;
        entry.settled_at = Some(at);
        Ok(entry.clone())
    }
}

impl WithdrawalRepository for MemoryStore {
    fn insert_within_balance(
        &self,
        request: WithdrawalRequest,
        credited: u64,
    ) -> Result<WithdrawalRequest, RepositoryError> {
        let mut state = self.state()?;
        let requested = state.requested_total(&request.user_id);
        let available = credited.saturating_sub(requested);
        if request.amount > available {
            return Err(RepositoryError::BalanceExceeded {
                available,
                requested: request.amount,
            });
        }
        state.withdrawals.push(request.clone());
        Ok(request)
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<WithdrawalRequest>, RepositoryError> {
        Ok(self
            .state()?
            .withdrawals
            .iter()
            .filter(|request| &request.user_id == user_id)
            .cloned()
            .collect())
    }

    fn total_requested(&self, user_id: &UserId) -> Result<u64, RepositoryError> {
        Ok(self.state()?.requested_total(user_id))
    }
}

impl BankAccountRegistry for MemoryStore {
    fn verified_account(&self, user_id: &UserId) -> Result<Option<BankAccount>, RepositoryError> {
        Ok(self.state()?.bank_accounts.get(user_id).cloned())
    }
}

/// Campaign directory held in memory, typically filled from a CSV export at start-up.
#[derive(Default)]
pub struct MemoryCampaignDirectory {
    campaigns: RwLock<BTreeMap<CampaignId, CampaignSnapshot>>,
}

impl MemoryCampaignDirectory {
    pub fn new(campaigns: Vec<CampaignSnapshot>) -> Self {
        Self {
            campaigns: RwLock::new(
                campaigns
                    .into_iter()
                    .map(|campaign| (campaign.campaign_id.clone(), campaign))
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.campaigns.read().map(|campaigns| campaigns.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CampaignDirectory for MemoryCampaignDirectory {
    fn get(&self, campaign_id: &CampaignId) -> Result<Option<CampaignSnapshot>, DirectoryError> {
        let campaigns = self
            .campaigns
            .read()
            .map_err(|_| DirectoryError::Unavailable("directory lock poisoned".to_string()))?;
        Ok(campaigns.get(campaign_id).cloned())
    }
}
