use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{ReviewContent, ReviewDraft, ReviewId, ReviewStatus, ReviewSubmission};
use super::repository::ReviewRepository;
use crate::workflows::actors::{Actor, StaffId, UserId};
use crate::workflows::applications::{
    ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationStatus, StatusWriter,
    Transition,
};
use crate::workflows::clock::Clock;
use crate::workflows::error::{ConflictReason, ValidationError, WorkflowError};
use crate::workflows::notifications::{notify_staff, NotificationPublisher, StaffNotification};

static REVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_review_id() -> ReviewId {
    let id = REVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReviewId(format!("rev-{id:06}"))
}

/// What a submit call did to the stored review and the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    /// First submission; application moved to `review_in_progress`.
    Created,
    /// Content overwritten after a rejection; application moved to `review_resubmitted`.
    Resubmitted,
    /// Content overwritten while awaiting a decision, no transition.
    Updated,
    /// Same content submitted again, nothing written.
    Unchanged,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewReceipt {
    pub outcome: ReviewOutcome,
    pub application_status: ApplicationStatus,
    pub review: ReviewSubmission,
}

pub struct ReviewService {
    writer: StatusWriter,
    reviews: Arc<dyn ReviewRepository>,
    notifications: Arc<dyn NotificationPublisher>,
}

impl ReviewService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        reviews: Arc<dyn ReviewRepository>,
        notifications: Arc<dyn NotificationPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            writer: StatusWriter::new(applications, clock),
            reviews,
            notifications,
        }
    }

    /// Creates, resubmits or re-saves the review depending on the stored submission and the
    /// application state.
    pub fn submit(
        &self,
        user_id: &UserId,
        application_id: &ApplicationId,
        draft: ReviewDraft,
    ) -> Result<ReviewReceipt, WorkflowError> {
        let content = draft.validate()?;
        let current = self.writer.load_owned(application_id, user_id)?;
        let actor = Actor::Applicant(user_id.clone());

        match (self.reviews.find_by_application(application_id)?, current.status) {
            (None, _) => self.create(&current, &actor, content),
            (Some(review), ApplicationStatus::ReviewRejected) => {
                self.resubmit(&current, &actor, review, content)
            }
            (
                Some(review),
                ApplicationStatus::ReviewInProgress | ApplicationStatus::ReviewResubmitted,
            ) => self.resave(&current, review, content),
            // Once staff accepted the evidence (review_completed and the payout states after
            // it) the stored review is what was approved, so it is no longer editable.
            (Some(_), status) => Err(WorkflowError::conflict(
                ConflictReason::StateConflict,
                format!("review is locked once the application is {status}"),
            )),
        }
    }

    fn create(
        &self,
        current: &ApplicationRecord,
        actor: &Actor,
        content: ReviewContent,
    ) -> Result<ReviewReceipt, WorkflowError> {
        let advanced = self
            .writer
            .advance(current, actor, Transition::SubmitReview, None, |_, _| {})?;

        let now = advanced.updated_at;
        let review = ReviewSubmission {
            review_id: next_review_id(),
            application_id: current.application_id.clone(),
            campaign_id: current.campaign_id.clone(),
            user_id: current.user_id.clone(),
            blog_url: content.blog_url,
            images: content.images,
            notes: content.notes,
            status: ReviewStatus::Submitted,
            submitted_at: now,
            updated_at: now,
            revision: 1,
        };

        let stored = match self.reviews.insert(review) {
            Ok(stored) => stored,
            Err(err) => {
                self.writer.restore(current, advanced.status);
                return Err(err.into());
            }
        };

        info!(
            review_id = %stored.review_id,
            application_id = %stored.application_id,
            "review submitted"
        );
        notify_staff(
            self.notifications.as_ref(),
            StaffNotification::new("review_submitted", &stored.user_id)
                .for_application(&stored.application_id)
                .detail("campaign_id", &stored.campaign_id),
        );

        Ok(ReviewReceipt {
            outcome: ReviewOutcome::Created,
            application_status: advanced.status,
            review: stored,
        })
    }

    fn resubmit(
        &self,
        current: &ApplicationRecord,
        actor: &Actor,
        review: ReviewSubmission,
        content: ReviewContent,
    ) -> Result<ReviewReceipt, WorkflowError> {
        let advanced = self.writer.advance(
            current,
            actor,
            Transition::ResubmitReview,
            None,
            |record, _| {
                record.rejection_reason = None;
                record.rejected_at = None;
            },
        )?;

        let expected_revision = review.revision;
        let mut next = review;
        next.overwrite(content, advanced.updated_at);

        let stored = match self.reviews.update(next, expected_revision) {
            Ok(stored) => stored,
            Err(err) => {
                self.writer.restore(current, advanced.status);
                return Err(err.into());
            }
        };

        info!(
            review_id = %stored.review_id,
            application_id = %stored.application_id,
            revision = stored.revision,
            "review resubmitted"
        );
        notify_staff(
            self.notifications.as_ref(),
            StaffNotification::new("review_resubmitted", &stored.user_id)
                .for_application(&stored.application_id)
                .detail("revision", stored.revision),
        );

        Ok(ReviewReceipt {
            outcome: ReviewOutcome::Resubmitted,
            application_status: advanced.status,
            review: stored,
        })
    }

    fn resave(
        &self,
        current: &ApplicationRecord,
        review: ReviewSubmission,
        content: ReviewContent,
    ) -> Result<ReviewReceipt, WorkflowError> {
        if review.matches(&content) {
            debug!(review_id = %review.review_id, "review unchanged");
            return Ok(ReviewReceipt {
                outcome: ReviewOutcome::Unchanged,
                application_status: current.status,
                review,
            });
        }

        let expected_revision = review.revision;
        let mut next = review;
        next.overwrite(content, self.writer.now());
        let stored = self.reviews.update(next, expected_revision)?;

        info!(
            review_id = %stored.review_id,
            revision = stored.revision,
            "review updated"
        );
        Ok(ReviewReceipt {
            outcome: ReviewOutcome::Updated,
            application_status: current.status,
            review: stored,
        })
    }

    pub fn approve_review(
        &self,
        staff_id: &StaffId,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, WorkflowError> {
        let current = self.writer.load(application_id)?;
        self.require_review(application_id)?;
        self.writer.advance(
            &current,
            &Actor::Staff(staff_id.clone()),
            Transition::CompleteReview,
            None,
            |_, _| {},
        )
    }

    pub fn reject_review(
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
        self.require_review(application_id)?;
        self.writer.advance(
            &current,
            &Actor::Staff(staff_id.clone()),
            Transition::RejectReview,
            None,
            |record, now| {
                record.rejection_reason = Some(reason.to_string());
                record.rejected_at = Some(now);
            },
        )
    }

    /// The applicant's own review for an application.
    pub fn get(
        &self,
        user_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<ReviewSubmission, WorkflowError> {
        self.writer.load_owned(application_id, user_id)?;
        self.require_review(application_id)
    }

    fn require_review(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ReviewSubmission, WorkflowError> {
        self.reviews
            .find_by_application(application_id)?
            .ok_or_else(|| WorkflowError::not_found("review", application_id))
    }
}
