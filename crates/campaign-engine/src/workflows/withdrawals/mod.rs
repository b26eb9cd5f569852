//! Withdrawal wizard, withholding tax, payout scheduling and the withdrawal request store.

pub mod domain;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod service;
pub mod tax;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    BankAccount, LegalAgreements, ResidentNumber, WithdrawalId, WithdrawalRequest,
    WithdrawalStatus, WithdrawalView,
};
pub use repository::{BankAccountRegistry, WithdrawalRepository};
pub use router::withdrawal_router;
pub use schedule::{payout_date, payout_date_at};
pub use service::{SubmissionContext, WithdrawalPreview, WithdrawalService};
pub use tax::{TaxBreakdown, WITHHOLDING_PER_MILLE};
pub use wizard::{AmountStep, BankAccountStep, ConsentStep, WithdrawalDraft};
