//! Central transition table for the application state machine and the single write path
//! every workflow uses to move an application between states.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus, StatusChange};
use super::repository::{ApplicationRepository, WriteCondition};
use crate::workflows::actors::{Actor, ActorRole, UserId};
use crate::workflows::campaigns::Fulfillment;
use crate::workflows::clock::Clock;
use crate::workflows::error::{ConflictReason, WorkflowError};

/// Named triggers of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Approve,
    Reject,
    Cancel,
    MarkPurchased,
    MarkShipping,
    MarkDelivered,
    SubmitReview,
    CompleteReview,
    RejectReview,
    ResubmitReview,
    RequestPoints,
    CompletePoints,
}

impl Transition {
    pub const fn label(self) -> &'static str {
        match self {
            Transition::Approve => "approve",
            Transition::Reject => "reject",
            Transition::Cancel => "cancel",
            Transition::MarkPurchased => "mark_purchased",
            Transition::MarkShipping => "mark_shipping",
            Transition::MarkDelivered => "mark_delivered",
            Transition::SubmitReview => "submit_review",
            Transition::CompleteReview => "complete_review",
            Transition::RejectReview => "reject_review",
            Transition::ResubmitReview => "resubmit_review",
            Transition::RequestPoints => "request_points",
            Transition::CompletePoints => "complete_points",
        }
    }

    /// The only role allowed to trigger this transition.
    pub const fn role(self) -> ActorRole {
        match self {
            Transition::Approve
            | Transition::Reject
            | Transition::CompleteReview
            | Transition::RejectReview
            | Transition::CompletePoints => ActorRole::Staff,
            Transition::Cancel
            | Transition::MarkPurchased
            | Transition::MarkShipping
            | Transition::MarkDelivered
            | Transition::SubmitReview
            | Transition::ResubmitReview
            | Transition::RequestPoints => ActorRole::Applicant,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct Edge {
    from: ApplicationStatus,
    transition: Transition,
    to: ApplicationStatus,
    /// `None` applies to every campaign.
    only_for: Option<Fulfillment>,
}

const fn edge(
    from: ApplicationStatus,
    transition: Transition,
    to: ApplicationStatus,
    only_for: Option<Fulfillment>,
) -> Edge {
    Edge {
        from,
        transition,
        to,
        only_for,
    }
}

use ApplicationStatus as S;

const EDGES: [Edge; 15] = [
    edge(S::Pending, Transition::Approve, S::Approved, None),
    edge(S::Pending, Transition::Reject, S::Rejected, None),
    edge(S::Pending, Transition::Cancel, S::Cancelled, None),
    edge(
        S::Approved,
        Transition::MarkPurchased,
        S::ProductPurchased,
        Some(Fulfillment::Delivery),
    ),
    edge(
        S::ProductPurchased,
        Transition::MarkShipping,
        S::Shipping,
        Some(Fulfillment::Delivery),
    ),
    edge(
        S::Shipping,
        Transition::MarkDelivered,
        S::Delivered,
        Some(Fulfillment::Delivery),
    ),
    edge(
        S::Delivered,
        Transition::SubmitReview,
        S::ReviewInProgress,
        Some(Fulfillment::Delivery),
    ),
    edge(
        S::Approved,
        Transition::SubmitReview,
        S::ReviewInProgress,
        Some(Fulfillment::NoShipment),
    ),
    edge(
        S::ReviewInProgress,
        Transition::CompleteReview,
        S::ReviewCompleted,
        None,
    ),
    edge(
        S::ReviewInProgress,
        Transition::RejectReview,
        S::ReviewRejected,
        None,
    ),
    edge(
        S::ReviewRejected,
        Transition::ResubmitReview,
        S::ReviewResubmitted,
        None,
    ),
    edge(
        S::ReviewResubmitted,
        Transition::CompleteReview,
        S::ReviewCompleted,
        None,
    ),
    edge(
        S::ReviewResubmitted,
        Transition::RejectReview,
        S::ReviewRejected,
        None,
    ),
    edge(
        S::ReviewCompleted,
        Transition::RequestPoints,
        S::PointRequested,
        None,
    ),
    edge(
        S::PointRequested,
        Transition::CompletePoints,
        S::PointCompleted,
        None,
    ),
];

/// Raised when the table has no edge for the requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {transition} an application that is {from}")]
pub struct TransitionError {
    pub from: ApplicationStatus,
    pub transition: Transition,
}

impl From<TransitionError> for WorkflowError {
    fn from(value: TransitionError) -> Self {
        WorkflowError::conflict(ConflictReason::StateConflict, value.to_string())
    }
}

/// Looks up the target state; anything not in the table is rejected.
pub fn next_status(
    from: ApplicationStatus,
    transition: Transition,
    fulfillment: Fulfillment,
) -> Result<ApplicationStatus, TransitionError> {
    EDGES
        .iter()
        .find(|edge| {
            edge.from == from
                && edge.transition == transition
                && edge.only_for.map_or(true, |only| only == fulfillment)
        })
        .map(|edge| edge.to)
        .ok_or(TransitionError { from, transition })
}

/// Transitions currently available from `from`, in table order.
pub fn available_transitions(
    from: ApplicationStatus,
    fulfillment: Fulfillment,
) -> Vec<Transition> {
    EDGES
        .iter()
        .filter(|edge| edge.from == from && edge.only_for.map_or(true, |only| only == fulfillment))
        .map(|edge| edge.transition)
        .collect()
}

/// Shared write path: role and ownership checks, table lookup, history, conditional update.
#[derive(Clone)]
pub(crate) struct StatusWriter {
    repository: Arc<dyn ApplicationRepository>,
    clock: Arc<dyn Clock>,
}

impl StatusWriter {
    pub(crate) fn new(repository: Arc<dyn ApplicationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn repository(&self) -> &Arc<dyn ApplicationRepository> {
        &self.repository
    }

    pub(crate) fn load(&self, id: &ApplicationId) -> Result<ApplicationRecord, WorkflowError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| WorkflowError::not_found("application", id))
    }

    pub(crate) fn load_owned(
        &self,
        id: &ApplicationId,
        user_id: &UserId,
    ) -> Result<ApplicationRecord, WorkflowError> {
        let record = self.load(id)?;
        if &record.user_id != user_id {
            return Err(WorkflowError::Forbidden);
        }
        Ok(record)
    }

    /// Moves `current` along `transition`. The write only lands if the stored status still
    /// equals `current.status`.
    pub(crate) fn advance<F>(
        &self,
        current: &ApplicationRecord,
        actor: &Actor,
        transition: Transition,
        admission_limit: Option<u32>,
        edit: F,
    ) -> Result<ApplicationRecord, WorkflowError>
    where
        F: FnOnce(&mut ApplicationRecord, DateTime<Utc>),
    {
        if actor.role() != transition.role() {
            return Err(WorkflowError::Forbidden);
        }
        if let Actor::Applicant(user_id) = actor {
            if user_id != &current.user_id {
                return Err(WorkflowError::Forbidden);
            }
        }

        let to = next_status(current.status, transition, current.fulfillment)?;
        let now = self.clock.now();

        let mut next = current.clone();
        next.status = to;
        next.updated_at = now;
        next.history.push(StatusChange {
            from: Some(current.status),
            to,
            actor: actor.clone(),
            at: now,
        });
        edit(&mut next, now);

        let condition =
            WriteCondition::expecting(current.status).with_admission_limit(admission_limit);
        let stored = self.repository.update(next, condition)?;

        info!(
            application_id = %stored.application_id,
            campaign_id = %stored.campaign_id,
            from = %current.status,
            to = %stored.status,
            actor = actor.role().label(),
            "application status changed"
        );
        Ok(stored)
    }

    /// Compensates an `advance` whose follow-up write failed: puts `previous` back as long as
    /// nobody moved the record past `written`. A failed rollback is logged; the caller still
    /// reports the original error.
    pub(crate) fn restore(&self, previous: &ApplicationRecord, written: ApplicationStatus) {
        match self
            .repository
            .update(previous.clone(), WriteCondition::expecting(written))
        {
            Ok(_) => info!(
                application_id = %previous.application_id,
                restored = %previous.status,
                "application status rolled back"
            ),
            Err(err) => error!(
                application_id = %previous.application_id,
                error = %err,
                "failed to roll back application status"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ApplicationStatus; 13] = [
        S::Pending,
        S::Approved,
        S::Rejected,
        S::Cancelled,
        S::ProductPurchased,
        S::Shipping,
        S::Delivered,
        S::ReviewInProgress,
        S::ReviewRejected,
        S::ReviewResubmitted,
        S::ReviewCompleted,
        S::PointRequested,
        S::PointCompleted,
    ];

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for status in ALL.into_iter().filter(|status| status.is_terminal()) {
            for fulfillment in [Fulfillment::Delivery, Fulfillment::NoShipment] {
                assert!(
                    available_transitions(status, fulfillment).is_empty(),
                    "{status} should be terminal"
                );
            }
        }
    }

    #[test]
    fn every_transient_state_can_progress() {
        for status in ALL.into_iter().filter(|status| !status.is_terminal()) {
            let delivery = available_transitions(status, Fulfillment::Delivery);
            let no_shipment = available_transitions(status, Fulfillment::NoShipment);
            assert!(
                !delivery.is_empty() || !no_shipment.is_empty(),
                "{status} has no way forward"
            );
        }
    }

    #[test]
    fn cancel_is_only_allowed_while_pending() {
        assert_eq!(
            next_status(S::Pending, Transition::Cancel, Fulfillment::Delivery),
            Ok(S::Cancelled)
        );
        for status in ALL.into_iter().filter(|status| *status != S::Pending) {
            assert!(next_status(status, Transition::Cancel, Fulfillment::Delivery).is_err());
        }
    }

    #[test]
    fn fulfillment_milestones_require_delivery_campaigns() {
        assert_eq!(
            next_status(S::Approved, Transition::MarkPurchased, Fulfillment::Delivery),
            Ok(S::ProductPurchased)
        );
        assert!(next_status(S::Approved, Transition::MarkPurchased, Fulfillment::NoShipment).is_err());
        assert!(next_status(S::Approved, Transition::SubmitReview, Fulfillment::Delivery).is_err());
        assert_eq!(
            next_status(S::Approved, Transition::SubmitReview, Fulfillment::NoShipment),
            Ok(S::ReviewInProgress)
        );
    }

    #[test]
    fn milestones_cannot_be_skipped_or_reversed() {
        assert!(next_status(S::ProductPurchased, Transition::MarkDelivered, Fulfillment::Delivery).is_err());
        assert!(next_status(S::Delivered, Transition::MarkShipping, Fulfillment::Delivery).is_err());
    }

    #[test]
    fn review_cycle_reenters_through_resubmission() {
        let rejected =
            next_status(S::ReviewInProgress, Transition::RejectReview, Fulfillment::NoShipment)
                .expect("reject");
        let resubmitted =
            next_status(rejected, Transition::ResubmitReview, Fulfillment::NoShipment)
                .expect("resubmit");
        assert_eq!(resubmitted, S::ReviewResubmitted);
        assert_eq!(
            next_status(resubmitted, Transition::RejectReview, Fulfillment::NoShipment),
            Ok(S::ReviewRejected)
        );
        assert_eq!(
            next_status(resubmitted, Transition::CompleteReview, Fulfillment::NoShipment),
            Ok(S::ReviewCompleted)
        );
    }

    #[test]
    fn payout_request_requires_completed_review() {
        for status in ALL.into_iter().filter(|status| *status != S::ReviewCompleted) {
            assert!(next_status(status, Transition::RequestPoints, Fulfillment::NoShipment).is_err());
        }
    }

    #[test]
    fn transition_roles_split_between_staff_and_applicant() {
        assert_eq!(Transition::Approve.role(), ActorRole::Staff);
        assert_eq!(Transition::Cancel.role(), ActorRole::Applicant);
        assert_eq!(Transition::RequestPoints.role(), ActorRole::Applicant);
        assert_eq!(Transition::CompletePoints.role(), ActorRole::Staff);
    }
}
