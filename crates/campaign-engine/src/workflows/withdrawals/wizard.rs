//! The three withdrawal wizard steps. Each validates on its own; the draft combines them into
//! one submission.

use serde::{Deserialize, Serialize};

use super::domain::{BankAccount, LegalAgreements, ResidentNumber};
use super::tax::TaxBreakdown;
use crate::workflows::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountStep {
    pub amount: u64,
}

impl AmountStep {
    /// Minimum first, then the balance check, so an oversized request is refused even when it
    /// clears the minimum.
    pub fn validate(self, minimum: u64, available: u64) -> Result<TaxBreakdown, ValidationError> {
        if self.amount < minimum {
            return Err(ValidationError::AmountBelowMinimum {
                minimum,
                requested: self.amount,
            });
        }
        if self.amount > available {
            return Err(ValidationError::AmountExceedsBalance {
                available,
                requested: self.amount,
            });
        }
        Ok(TaxBreakdown::for_amount(self.amount))
    }
}

/// Either reuse the verified account on file or type one in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BankAccountStep {
    Verified,
    Manual(BankAccount),
}

impl BankAccountStep {
    /// A verified account always wins over typed-in details.
    pub fn resolve(self, verified: Option<BankAccount>) -> Result<BankAccount, ValidationError> {
        match (verified, self) {
            (Some(account), _) => Ok(account),
            (None, BankAccountStep::Manual(account)) => account.validate(),
            (None, BankAccountStep::Verified) => Err(ValidationError::InvalidBankAccount {
                field: "verified_account",
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentStep {
    #[serde(default)]
    pub agreements: LegalAgreements,
    #[serde(default)]
    pub resident_number: String,
}

impl ConsentStep {
    pub fn agree_to_all(&mut self) {
        self.agreements = LegalAgreements::all();
    }

    pub fn validate(&self) -> Result<ResidentNumber, ValidationError> {
        if !self.agreements.is_complete() {
            return Err(ValidationError::AgreementsIncomplete);
        }
        ResidentNumber::parse(&self.resident_number)
    }
}

/// Full wizard payload submitted in one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalDraft {
    pub amount: u64,
    pub bank_account: BankAccountStep,
    pub consent: ConsentStep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_is_inclusive() {
        assert!(AmountStep { amount: 1_000 }.validate(1_000, 5_000).is_ok());
        assert_eq!(
            AmountStep { amount: 999 }.validate(1_000, 5_000),
            Err(ValidationError::AmountBelowMinimum {
                minimum: 1_000,
                requested: 999
            })
        );
    }

    #[test]
    fn amount_above_balance_is_refused() {
        assert_eq!(
            AmountStep { amount: 6_000 }.validate(1_000, 5_000),
            Err(ValidationError::AmountExceedsBalance {
                available: 5_000,
                requested: 6_000
            })
        );
    }

    #[test]
    fn agree_to_all_sets_every_flag() {
        let mut consent = ConsentStep {
            agreements: LegalAgreements {
                privacy_collection: true,
                ..LegalAgreements::default()
            },
            resident_number: "900101-1234567".to_string(),
        };
        assert_eq!(
            consent.validate(),
            Err(ValidationError::AgreementsIncomplete)
        );

        consent.agree_to_all();
        assert!(consent.validate().is_ok());
    }

    #[test]
    fn verified_account_skips_manual_entry() {
        let verified = BankAccount {
            bank_name: "Shinhan".to_string(),
            account_number: "110-123-456789".to_string(),
            account_holder: "Lee".to_string(),
        };
        let manual = BankAccountStep::Manual(BankAccount {
            bank_name: String::new(),
            account_number: String::new(),
            account_holder: String::new(),
        });

        assert_eq!(manual.resolve(Some(verified.clone())), Ok(verified));
        assert_eq!(
            BankAccountStep::Verified.resolve(None),
            Err(ValidationError::InvalidBankAccount {
                field: "verified_account"
            })
        );
    }

    #[test]
    fn draft_deserializes_tagged_bank_step() {
        let draft: WithdrawalDraft = serde_json::from_value(serde_json::json!({
            "amount": 5000,
            "bank_account": {
                "mode": "manual",
                "bank_name": "KB",
                "account_number": "123456-01-234567",
                "account_holder": "Park"
            },
            "consent": {
                "agreements": {
                    "privacy_collection": true,
                    "tax_reporting": true,
                    "withholding": true
                },
                "resident_number": "900101-1234567"
            }
        }))
        .expect("draft parses");

        assert!(matches!(draft.bank_account, BankAccountStep::Manual(_)));
        assert!(draft.consent.validate().is_ok());
    }
}
