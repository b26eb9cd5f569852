use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::balance::PointsSummary;
use super::ledger::{EntryId, LedgerFilter, LedgerRepository, LedgerStatus, PointsLedgerEntry};
use crate::workflows::actors::{Actor, StaffId, UserId};
use crate::workflows::applications::{
    ApplicationId, ApplicationRepository, ApplicationStatusView, StatusWriter, Transition,
};
use crate::workflows::campaigns::{require_campaign, CampaignDirectory};
use crate::workflows::clock::Clock;
use crate::workflows::error::{ConflictReason, WorkflowError};
use crate::workflows::notifications::{notify_staff, NotificationPublisher, StaffNotification};
use crate::workflows::withdrawals::WithdrawalRepository;

static ENTRY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_entry_id() -> EntryId {
    let id = ENTRY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EntryId(format!("pts-{id:06}"))
}

#[derive(Debug, Clone, Serialize)]
pub struct PayoutReceipt {
    pub application: ApplicationStatusView,
    pub entry: PointsLedgerEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointsStatement {
    pub summary: PointsSummary,
    pub entries: Vec<PointsLedgerEntry>,
}

/// Payout requests, staff settlement and per-user balances.
pub struct PointsService {
    writer: StatusWriter,
    campaigns: Arc<dyn CampaignDirectory>,
    ledger: Arc<dyn LedgerRepository>,
    withdrawals: Arc<dyn WithdrawalRepository>,
    notifications: Arc<dyn NotificationPublisher>,
}

impl PointsService {
    pub fn new(
        campaigns: Arc<dyn CampaignDirectory>,
        applications: Arc<dyn ApplicationRepository>,
        ledger: Arc<dyn LedgerRepository>,
        withdrawals: Arc<dyn WithdrawalRepository>,
        notifications: Arc<dyn NotificationPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            writer: StatusWriter::new(applications, clock),
            campaigns,
            ledger,
            withdrawals,
            notifications,
        }
    }

    /// `review_completed` → `point_requested`, then one pending ledger entry for the campaign
    /// reward. The reward is read before anything is written; a failed append rolls the
    /// application back.
    pub fn request_payout(
        &self,
        user_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<PayoutReceipt, WorkflowError> {
        let current = self.writer.load_owned(application_id, user_id)?;
        let campaign = require_campaign(self.campaigns.as_ref(), &current.campaign_id)?;

        let advanced = self.writer.advance(
            &current,
            &Actor::Applicant(user_id.clone()),
            Transition::RequestPoints,
            None,
            |_, _| {},
        )?;

        let entry = PointsLedgerEntry {
            entry_id: next_entry_id(),
            user_id: current.user_id.clone(),
            campaign_id: current.campaign_id.clone(),
            application_id: current.application_id.clone(),
            points_amount: campaign.reward_points,
            status: LedgerStatus::Pending,
            description: format!("{} review reward", campaign.title),
            transaction_date: advanced.updated_at,
            settled_at: None,
        };

        let entry = match self.ledger.append(entry) {
            Ok(entry) => entry,
            Err(err) => {
                self.writer.restore(&current, advanced.status);
                return Err(err.into());
            }
        };

        info!(
            entry_id = %entry.entry_id,
            %application_id,
            %user_id,
            points = entry.points_amount,
            "payout requested"
        );
        notify_staff(
            self.notifications.as_ref(),
            StaffNotification::new("payout_requested", user_id)
                .for_application(application_id)
                .detail("campaign_id", &entry.campaign_id)
                .detail("points", entry.points_amount),
        );

        Ok(PayoutReceipt {
            application: advanced.status_view(),
            entry,
        })
    }

    /// `point_requested` → `point_completed` together with marking the single pending ledger
    /// entry paid.
    pub fn complete_payout(
        &self,
        staff_id: &StaffId,
        application_id: &ApplicationId,
    ) -> Result<PayoutReceipt, WorkflowError> {
        let current = self.writer.load(application_id)?;

        let mut filter = LedgerFilter::for_application(application_id);
        filter.status = Some(LedgerStatus::Pending);
        let pending = self.ledger.list(&filter)?;
        let entry = match <[PointsLedgerEntry; 1]>::try_from(pending) {
            Ok([entry]) => entry,
            Err(found) => {
                return Err(WorkflowError::conflict(
                    ConflictReason::StateConflict,
                    format!(
                        "expected exactly one pending ledger entry, found {}",
                        found.len()
                    ),
                ))
            }
        };

        let advanced = self.writer.advance(
            &current,
            &Actor::Staff(staff_id.clone()),
            Transition::CompletePoints,
            None,
            |_, _| {},
        )?;

        let entry = match self.ledger.update_status(
            &entry.entry_id,
            LedgerStatus::Pending,
            LedgerStatus::Paid,
            advanced.updated_at,
        ) {
            Ok(entry) => entry,
            Err(err) => {
                self.writer.restore(&current, advanced.status);
                return Err(err.into());
            }
        };

        info!(
            entry_id = %entry.entry_id,
            %application_id,
            points = entry.points_amount,
            "payout settled"
        );
        Ok(PayoutReceipt {
            application: advanced.status_view(),
            entry,
        })
    }

    pub fn summary(&self, user_id: &UserId) -> Result<PointsSummary, WorkflowError> {
        let entries = self.ledger.list(&LedgerFilter::for_user(user_id))?;
        let withdrawn = self.withdrawals.total_requested(user_id)?;
        Ok(PointsSummary::from_entries(&entries, withdrawn))
    }

    pub fn statement(&self, user_id: &UserId) -> Result<PointsStatement, WorkflowError> {
        let entries = self.ledger.list(&LedgerFilter::for_user(user_id))?;
        let withdrawn = self.withdrawals.total_requested(user_id)?;
        Ok(PointsStatement {
            summary: PointsSummary::from_entries(&entries, withdrawn),
            entries,
        })
    }
}
