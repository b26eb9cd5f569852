use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

use crate::workflows::actors::UserId;
use crate::workflows::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WithdrawalId(pub String);

impl fmt::Display for WithdrawalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const RESIDENT_NUMBER_DIGITS: usize = 13;

fn is_separator(c: char) -> bool {
    c == '-' || c.is_whitespace()
}

/// 13-digit resident / tax identification number. Opaque: `Debug` is redacted and only the
/// masked form ever leaves the engine.
#[derive(Clone, PartialEq, Eq)]
pub struct ResidentNumber(String);

impl ResidentNumber {
    /// Accepts the digits with `-` or whitespace separators in any position.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let digits: String = raw.chars().filter(|c| !is_separator(*c)).collect();
        let count = digits.chars().filter(char::is_ascii_digit).count();

        if count != RESIDENT_NUMBER_DIGITS || digits.len() != count {
            return Err(ValidationError::MalformedResidentNumber { digits: count });
        }
        Ok(Self(digits))
    }

    /// Birth date and gender digit, the rest hidden: `YYMMDD-G******`.
    pub fn masked(&self) -> String {
        format!("{}-{}******", &self.0[..6], &self.0[6..7])
    }
}

impl fmt::Debug for ResidentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResidentNumber(<redacted>)")
    }
}

/// Payout destination, either typed by the user or taken from a verified registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}

impl BankAccount {
    /// Trims every field; the account number may contain `-` or space separators.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let bank_name = self.bank_name.trim().to_string();
        if bank_name.is_empty() {
            return Err(ValidationError::InvalidBankAccount { field: "bank_name" });
        }

        let account_holder = self.account_holder.trim().to_string();
        if account_holder.is_empty() {
            return Err(ValidationError::InvalidBankAccount {
                field: "account_holder",
            });
        }

        let account_number = self.account_number.trim().to_string();
        let digits = account_number.chars().filter(char::is_ascii_digit).count();
        let well_formed = account_number
            .chars()
            .all(|c| c.is_ascii_digit() || is_separator(c));
        if !well_formed || !(6..=20).contains(&digits) {
            return Err(ValidationError::InvalidBankAccount {
                field: "account_number",
            });
        }

        Ok(Self {
            bank_name,
            account_number,
            account_holder,
        })
    }

    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self
            .account_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let visible = digits.len().saturating_sub(4);
        digits
            .iter()
            .enumerate()
            .map(|(index, digit)| if index < visible { '*' } else { *digit })
            .collect()
    }
}

/// The three legal consents collected by the last wizard step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalAgreements {
    pub privacy_collection: bool,
    pub tax_reporting: bool,
    pub withholding: bool,
}

impl LegalAgreements {
    pub const fn all() -> Self {
        Self {
            privacy_collection: true,
            tax_reporting: true,
            withholding: true,
        }
    }

    pub const fn is_complete(self) -> bool {
        self.privacy_collection && self.tax_reporting && self.withholding
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Requested,
}

/// Stored withdrawal request; immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRequest {
    pub request_id: WithdrawalId,
    pub user_id: UserId,
    pub amount: u64,
    pub tax_amount: u64,
    pub final_amount: u64,
    pub bank_account: BankAccount,
    pub resident_number: ResidentNumber,
    pub agreements: LegalAgreements,
    pub agreed_at: DateTime<Utc>,
    pub agreement_ip: Option<IpAddr>,
    pub scheduled_payout_on: NaiveDate,
    pub status: WithdrawalStatus,
    pub created_at: DateTime<Utc>,
}

impl WithdrawalRequest {
    pub fn view(&self) -> WithdrawalView {
        WithdrawalView {
            request_id: self.request_id.clone(),
            amount: self.amount,
            tax_amount: self.tax_amount,
            final_amount: self.final_amount,
            bank_name: self.bank_account.bank_name.clone(),
            account_number: self.bank_account.masked_number(),
            account_holder: self.bank_account.account_holder.clone(),
            resident_number: self.resident_number.masked(),
            agreement_ip: self.agreement_ip,
            scheduled_payout_on: self.scheduled_payout_on,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Masked representation returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalView {
    pub request_id: WithdrawalId,
    pub amount: u64,
    pub tax_amount: u64,
    pub final_amount: u64,
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub resident_number: String,
    pub agreement_ip: Option<IpAddr>,
    pub scheduled_payout_on: NaiveDate,
    pub status: WithdrawalStatus,
    pub created_at: DateTime<Utc>,
}
