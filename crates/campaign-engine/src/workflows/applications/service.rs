use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::admission::AdmissionGuard;
use super::domain::{ApplicationId, ApplicationRecord, ApplicationSubmission};
use super::lifecycle::{StatusWriter, Transition};
use super::repository::{ApplicationFilter, ApplicationRepository, WriteCondition};
use crate::workflows::actors::{Actor, StaffId, UserId};
use crate::workflows::campaigns::{require_campaign, CampaignDirectory, CampaignId};
use crate::workflows::clock::Clock;
use crate::workflows::error::{ValidationError, WorkflowError};

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Applicant-reported delivery progress for shipped campaigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentMilestone {
    ProductPurchased,
    Shipping,
    Delivered,
}

impl FulfillmentMilestone {
    const fn transition(self) -> Transition {
        match self {
            FulfillmentMilestone::ProductPurchased => Transition::MarkPurchased,
            FulfillmentMilestone::Shipping => Transition::MarkShipping,
            FulfillmentMilestone::Delivered => Transition::MarkDelivered,
        }
    }
}

/// Service composing the admission guard, the application store and the state machine.
pub struct ApplicationService {
    campaigns: Arc<dyn CampaignDirectory>,
    guard: AdmissionGuard,
    writer: StatusWriter,
}

impl ApplicationService {
    pub fn new(
        campaigns: Arc<dyn CampaignDirectory>,
        repository: Arc<dyn ApplicationRepository>,
        clock: Arc<dyn Clock>,
        business_offset: FixedOffset,
    ) -> Self {
        Self {
            campaigns,
            guard: AdmissionGuard::new(business_offset),
            writer: StatusWriter::new(repository, clock),
        }
    }

    fn repository(&self) -> &Arc<dyn ApplicationRepository> {
        self.writer.repository()
    }

    /// Runs the admission guard and creates the application in `pending`.
    pub fn apply(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
        submission: ApplicationSubmission,
    ) -> Result<ApplicationRecord, WorkflowError> {
        submission.validate()?;

        let campaign = require_campaign(self.campaigns.as_ref(), campaign_id)?;
        let existing = self
            .repository()
            .list(&ApplicationFilter::for_campaign(campaign_id))?;
        let now = self.writer.now();

        if let Err(rejection) = self.guard.check(&campaign, user_id, &existing, now) {
            info!(
                %user_id,
                %campaign_id,
                reason = rejection.reason().code(),
                "application refused"
            );
            return Err(rejection.into());
        }

        let record = ApplicationRecord::new(
            next_application_id(),
            user_id.clone(),
            campaign_id.clone(),
            campaign.fulfillment,
            submission,
            now,
        );

        let condition = WriteCondition {
            expected_status: None,
            admission_limit: Some(campaign.max_participants),
        };
        let stored = self.repository().insert(record, condition)?;

        info!(
            application_id = %stored.application_id,
            %user_id,
            %campaign_id,
            "application created"
        );
        Ok(stored)
    }

    pub fn cancel(
        &self,
        user_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, WorkflowError> {
        let current = self.writer.load_owned(application_id, user_id)?;
        self.writer.advance(
            &current,
            &Actor::Applicant(user_id.clone()),
            Transition::Cancel,
            None,
            |record, now| record.cancelled_at = Some(now),
        )
    }

    /// Approval re-checks capacity at write time; a directory outage refuses the approval.
    pub fn approve(
        &self,
        staff_id: &StaffId,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, WorkflowError> {
        let current = self.writer.load(application_id)?;
        let campaign = require_campaign(self.campaigns.as_ref(), &current.campaign_id)?;

        self.writer.advance(
            &current,
            &Actor::Staff(staff_id.clone()),
            Transition::Approve,
            Some(campaign.max_participants),
            |record, now| record.processed_at = Some(now),
        )
    }

    pub fn reject(
        &self,
        staff_id: &StaffId,
        application_id: &ApplicationId,
        reason: &str,
    ) -> Result<ApplicationRecord, WorkflowError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::MissingReason.into());
        }

        let current = self.writer.load(application_id)?;
        self.writer.advance(
            &current,
            &Actor::Staff(staff_id.clone()),
            Transition::Reject,
            None,
            |record, now| {
                record.processed_at = Some(now);
                record.rejected_at = Some(now);
                record.rejection_reason = Some(reason.to_string());
            },
        )
    }

    pub fn report_fulfillment(
        &self,
        user_id: &UserId,
        application_id: &ApplicationId,
        milestone: FulfillmentMilestone,
    ) -> Result<ApplicationRecord, WorkflowError> {
        let current = self.writer.load_owned(application_id, user_id)?;
        self.writer.advance(
            &current,
            &Actor::Applicant(user_id.clone()),
            milestone.transition(),
            None,
            |_, _| {},
        )
    }

    pub fn get(&self, application_id: &ApplicationId) -> Result<ApplicationRecord, WorkflowError> {
        self.writer.load(application_id)
    }

    pub fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApplicationRecord>, WorkflowError> {
        Ok(self.repository().list(&ApplicationFilter::for_user(user_id))?)
    }

    pub fn list_for_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<ApplicationRecord>, WorkflowError> {
        Ok(self
            .repository()
            .list(&ApplicationFilter::for_campaign(campaign_id))?)
    }
}
