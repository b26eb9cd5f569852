use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::actors::{Actor, UserId};
use crate::workflows::campaigns::{CampaignId, Fulfillment};
use crate::workflows::error::ValidationError;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle states of an application, from submission to point settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    ProductPurchased,
    Shipping,
    Delivered,
    ReviewInProgress,
    ReviewRejected,
    ReviewResubmitted,
    ReviewCompleted,
    PointRequested,
    PointCompleted,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Cancelled => "cancelled",
            ApplicationStatus::ProductPurchased => "product_purchased",
            ApplicationStatus::Shipping => "shipping",
            ApplicationStatus::Delivered => "delivered",
            ApplicationStatus::ReviewInProgress => "review_in_progress",
            ApplicationStatus::ReviewRejected => "review_rejected",
            ApplicationStatus::ReviewResubmitted => "review_resubmitted",
            ApplicationStatus::ReviewCompleted => "review_completed",
            ApplicationStatus::PointRequested => "point_requested",
            ApplicationStatus::PointCompleted => "point_completed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Cancelled | ApplicationStatus::Rejected | ApplicationStatus::PointCompleted
        )
    }

    /// Counts against the duplicate rule: everything except a cancelled application.
    pub const fn is_active(self) -> bool {
        !matches!(self, ApplicationStatus::Cancelled)
    }

    /// Occupies a participant slot: approved or any later stage.
    pub const fn is_admitted(self) -> bool {
        !matches!(
            self,
            ApplicationStatus::Pending | ApplicationStatus::Rejected | ApplicationStatus::Cancelled
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Social channels the applicant intends to publish on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsHandles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

/// Applicant contact snapshot taken at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub sns: SnsHandles,
}

/// Applicant-provided payload for a new application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub profile: ApplicantProfile,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_comment: Option<String>,
}

impl ApplicationSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.profile.name.trim().is_empty() {
            return Err(ValidationError::MissingField("profile.name"));
        }
        if self.profile.phone.trim().is_empty() {
            return Err(ValidationError::MissingField("profile.phone"));
        }
        Ok(())
    }
}

/// Entry in the append-only status history of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: Option<ApplicationStatus>,
    pub to: ApplicationStatus,
    pub actor: Actor,
    pub at: DateTime<Utc>,
}

/// Stored application, one per (user, campaign) while not cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application_id: ApplicationId,
    pub user_id: UserId,
    pub campaign_id: CampaignId,
    pub status: ApplicationStatus,
    pub fulfillment: Fulfillment,
    pub profile: ApplicantProfile,
    pub reason: String,
    pub plan: String,
    pub notes: String,
    pub applicant_comment: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<StatusChange>,
}

impl ApplicationRecord {
    pub fn new(
        application_id: ApplicationId,
        user_id: UserId,
        campaign_id: CampaignId,
        fulfillment: Fulfillment,
        submission: ApplicationSubmission,
        applied_at: DateTime<Utc>,
    ) -> Self {
        let ApplicationSubmission {
            profile,
            reason,
            plan,
            notes,
            applicant_comment,
        } = submission;

        let history = vec![StatusChange {
            from: None,
            to: ApplicationStatus::Pending,
            actor: Actor::Applicant(user_id.clone()),
            at: applied_at,
        }];

        Self {
            application_id,
            user_id,
            campaign_id,
            status: ApplicationStatus::Pending,
            fulfillment,
            profile,
            reason,
            plan,
            notes,
            applicant_comment: applicant_comment.filter(|comment| !comment.trim().is_empty()),
            applied_at,
            processed_at: None,
            cancelled_at: None,
            rejection_reason: None,
            rejected_at: None,
            updated_at: applied_at,
            history,
        }
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.application_id.clone(),
            campaign_id: self.campaign_id.clone(),
            status: self.status.label(),
            applied_at: self.applied_at,
            processed_at: self.processed_at,
            rejection_reason: self.rejection_reason.clone(),
            applicant_comment: self.applicant_comment.clone(),
        }
    }
}

/// Public representation of an application; contact details stay private.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub campaign_id: CampaignId,
    pub status: &'static str,
    pub applied_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_comment: Option<String>,
}
