use chrono::{DateTime, FixedOffset, Utc};

use super::domain::ApplicationRecord;
use crate::workflows::actors::UserId;
use crate::workflows::campaigns::{CampaignSnapshot, CampaignStatus};
use crate::workflows::error::{ConflictReason, WorkflowError};

/// Why an application was refused before anything was written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionRejection {
    #[error("an active application already exists for this campaign")]
    Duplicate,
    #[error("campaign is full ({admitted} of {max} participants admitted)")]
    Full { max: u32, admitted: usize },
    #[error("applications are closed: {0}")]
    Closed(String),
}

impl AdmissionRejection {
    pub const fn reason(&self) -> ConflictReason {
        match self {
            AdmissionRejection::Duplicate => ConflictReason::Duplicate,
            AdmissionRejection::Full { .. } => ConflictReason::Full,
            AdmissionRejection::Closed(_) => ConflictReason::Closed,
        }
    }
}

impl From<AdmissionRejection> for WorkflowError {
    fn from(value: AdmissionRejection) -> Self {
        WorkflowError::conflict(value.reason(), value.to_string())
    }
}

/// Duplicate, capacity and deadline rules evaluated before an application is created.
/// The store repeats the duplicate and capacity checks at write time.
#[derive(Debug, Clone)]
pub struct AdmissionGuard {
    business_offset: FixedOffset,
}

impl AdmissionGuard {
    pub fn new(business_offset: FixedOffset) -> Self {
        Self { business_offset }
    }

    /// `campaign_applications` must hold every application of the campaign.
    pub fn check(
        &self,
        campaign: &CampaignSnapshot,
        user_id: &UserId,
        campaign_applications: &[ApplicationRecord],
        now: DateTime<Utc>,
    ) -> Result<(), AdmissionRejection> {
        let duplicate = campaign_applications
            .iter()
            .any(|record| &record.user_id == user_id && record.status.is_active());
        if duplicate {
            return Err(AdmissionRejection::Duplicate);
        }

        let admitted = campaign_applications
            .iter()
            .filter(|record| record.status.is_admitted())
            .count();
        if admitted >= campaign.max_participants as usize {
            return Err(AdmissionRejection::Full {
                max: campaign.max_participants,
                admitted,
            });
        }

        if campaign.status != CampaignStatus::Recruiting {
            return Err(AdmissionRejection::Closed(format!(
                "campaign is {}",
                campaign.status.label()
            )));
        }
        if !campaign
            .application_end
            .is_open_at(now, self.business_offset)
        {
            return Err(AdmissionRejection::Closed(format!(
                "deadline {} has passed",
                campaign.application_end
            )));
        }

        Ok(())
    }
}
