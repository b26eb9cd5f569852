use crate::workflows::actors::UserId;
use crate::workflows::store::RepositoryError;

use super::domain::{BankAccount, WithdrawalRequest};

/// Withdrawal request store. Requests are only ever created here.
pub trait WithdrawalRepository: Send + Sync {
    /// Writes the request only if the user's requested total, this one included, stays within
    /// `credited`; `BalanceExceeded` otherwise. Check and write happen atomically.
    fn insert_within_balance(
        &self,
        request: WithdrawalRequest,
        credited: u64,
    ) -> Result<WithdrawalRequest, RepositoryError>;

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<WithdrawalRequest>, RepositoryError>;

    /// Gross amount of every request the user has made.
    fn total_requested(&self, user_id: &UserId) -> Result<u64, RepositoryError>;
}

/// Source of bank accounts the user already verified.
pub trait BankAccountRegistry: Send + Sync {
    fn verified_account(&self, user_id: &UserId) -> Result<Option<BankAccount>, RepositoryError>;
}
