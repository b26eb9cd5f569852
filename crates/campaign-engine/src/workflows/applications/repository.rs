use crate::workflows::actors::UserId;
use crate::workflows::campaigns::CampaignId;
use crate::workflows::store::RepositoryError;

use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus};

/// Preconditions a store evaluates under the same lock (or transaction) as the write itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCondition {
    /// The write only lands if the stored record still has this status.
    pub expected_status: Option<ApplicationStatus>,
    /// Participant slots of the campaign. On insert the write is refused once this many
    /// applications are admitted; on update only when the write itself admits the record.
    pub admission_limit: Option<u32>,
}

impl WriteCondition {
    pub fn expecting(status: ApplicationStatus) -> Self {
        Self {
            expected_status: Some(status),
            admission_limit: None,
        }
    }

    pub fn with_admission_limit(mut self, limit: Option<u32>) -> Self {
        self.admission_limit = limit;
        self
    }
}

/// Listing filter; every populated field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub user_id: Option<UserId>,
    pub campaign_id: Option<CampaignId>,
    pub active_only: bool,
}

impl ApplicationFilter {
    pub fn for_user(user_id: &UserId) -> Self {
        Self {
            user_id: Some(user_id.clone()),
            ..Self::default()
        }
    }

    pub fn for_campaign(campaign_id: &CampaignId) -> Self {
        Self {
            campaign_id: Some(campaign_id.clone()),
            ..Self::default()
        }
    }

    pub fn active(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn matches(&self, record: &ApplicationRecord) -> bool {
        self.user_id
            .as_ref()
            .map_or(true, |user_id| &record.user_id == user_id)
            && self
                .campaign_id
                .as_ref()
                .map_or(true, |campaign_id| &record.campaign_id == campaign_id)
            && (!self.active_only || record.status.is_active())
    }
}

/// Application store. There is deliberately no delete.
pub trait ApplicationRepository: Send + Sync {
    /// Must refuse with `Duplicate` when an active application already exists for the same
    /// (user, campaign) pair.
    fn insert(
        &self,
        record: ApplicationRecord,
        condition: WriteCondition,
    ) -> Result<ApplicationRecord, RepositoryError>;

    /// Replaces the stored record; `StaleState` when `expected_status` no longer matches.
    fn update(
        &self,
        record: ApplicationRecord,
        condition: WriteCondition,
    ) -> Result<ApplicationRecord, RepositoryError>;

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;

    fn list(&self, filter: &ApplicationFilter) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}
