use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{WithdrawalId, WithdrawalRequest, WithdrawalStatus, WithdrawalView};
use super::repository::{BankAccountRegistry, WithdrawalRepository};
use super::schedule::payout_date_at;
use super::wizard::{AmountStep, WithdrawalDraft};
use crate::workflows::actors::UserId;
use crate::workflows::clock::Clock;
use crate::workflows::error::WorkflowError;
use crate::workflows::notifications::{notify_staff, NotificationPublisher, StaffNotification};
use crate::workflows::points::PointsService;

static WITHDRAWAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_withdrawal_id() -> WithdrawalId {
    let id = WITHDRAWAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    WithdrawalId(format!("wd-{id:06}"))
}

/// Request metadata used to resolve the caller's address for the consent record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionContext {
    pub forwarded_for: Option<String>,
    pub real_ip: Option<String>,
    pub peer: Option<IpAddr>,
}

impl SubmissionContext {
    /// First `X-Forwarded-For` hop, then `X-Real-IP`, then the socket peer.
    pub fn client_ip(&self) -> Option<IpAddr> {
        let forwarded = self
            .forwarded_for
            .as_deref()
            .and_then(|value| value.split(',').next())
            .and_then(|hop| hop.trim().parse::<IpAddr>().ok());
        let real = || {
            self.real_ip
                .as_deref()
                .and_then(|value| value.trim().parse::<IpAddr>().ok())
        };
        forwarded.or_else(real).or(self.peer)
    }
}

/// Amount step outcome shown before the user commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WithdrawalPreview {
    pub amount: u64,
    pub tax_amount: u64,
    pub final_amount: u64,
    pub available: u64,
    pub scheduled_payout_on: NaiveDate,
}

pub struct WithdrawalService {
    points: Arc<PointsService>,
    withdrawals: Arc<dyn WithdrawalRepository>,
    bank_accounts: Arc<dyn BankAccountRegistry>,
    notifications: Arc<dyn NotificationPublisher>,
    clock: Arc<dyn Clock>,
    business_offset: FixedOffset,
    minimum_points: u64,
}

impl WithdrawalService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        points: Arc<PointsService>,
        withdrawals: Arc<dyn WithdrawalRepository>,
        bank_accounts: Arc<dyn BankAccountRegistry>,
        notifications: Arc<dyn NotificationPublisher>,
        clock: Arc<dyn Clock>,
        business_offset: FixedOffset,
        minimum_points: u64,
    ) -> Self {
        Self {
            points,
            withdrawals,
            bank_accounts,
            notifications,
            clock,
            business_offset,
            minimum_points,
        }
    }

    pub fn preview(&self, user_id: &UserId, amount: u64) -> Result<WithdrawalPreview, WorkflowError> {
        let summary = self.points.summary(user_id)?;
        let breakdown = AmountStep { amount }.validate(self.minimum_points, summary.available)?;

        Ok(WithdrawalPreview {
            amount: breakdown.amount,
            tax_amount: breakdown.tax_amount,
            final_amount: breakdown.final_amount,
            available: summary.available,
            scheduled_payout_on: payout_date_at(self.clock.now(), self.business_offset),
        })
    }

    /// Validates all three steps and writes the request in one conditional insert.
    pub fn submit(
        &self,
        user_id: &UserId,
        draft: WithdrawalDraft,
        context: &SubmissionContext,
    ) -> Result<WithdrawalRequest, WorkflowError> {
        let WithdrawalDraft {
            amount,
            bank_account,
            consent,
        } = draft;

        let summary = self.points.summary(user_id)?;
        let breakdown = AmountStep { amount }.validate(self.minimum_points, summary.available)?;
        let verified = self.bank_accounts.verified_account(user_id)?;
        let bank_account = bank_account.resolve(verified)?;
        let resident_number = consent.validate()?;

        let agreement_ip = context.client_ip();
        if agreement_ip.is_none() {
            warn!(%user_id, "client ip unresolved, recording consent without it");
        }

        let now = self.clock.now();
        let request = WithdrawalRequest {
            request_id: next_withdrawal_id(),
            user_id: user_id.clone(),
            amount: breakdown.amount,
            tax_amount: breakdown.tax_amount,
            final_amount: breakdown.final_amount,
            bank_account,
            resident_number,
            agreements: consent.agreements,
            agreed_at: now,
            agreement_ip,
            scheduled_payout_on: payout_date_at(now, self.business_offset),
            status: WithdrawalStatus::Requested,
            created_at: now,
        };

        let stored = self
            .withdrawals
            .insert_within_balance(request, summary.credited)?;

        info!(
            request_id = %stored.request_id,
            %user_id,
            amount = stored.amount,
            tax_amount = stored.tax_amount,
            scheduled_payout_on = %stored.scheduled_payout_on,
            "withdrawal requested"
        );
        notify_staff(
            self.notifications.as_ref(),
            StaffNotification::new("withdrawal_requested", user_id)
                .detail("request_id", &stored.request_id)
                .detail("amount", stored.amount)
                .detail("final_amount", stored.final_amount)
                .detail("scheduled_payout_on", stored.scheduled_payout_on),
        );

        Ok(stored)
    }

    pub fn list(&self, user_id: &UserId) -> Result<Vec<WithdrawalView>, WorkflowError> {
        Ok(self
            .withdrawals
            .list_for_user(user_id)?
            .iter()
            .map(WithdrawalRequest::view)
            .collect())
    }
}
