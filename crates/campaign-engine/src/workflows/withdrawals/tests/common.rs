use serde_json::{json, Value};

pub(super) use crate::workflows::testing::*;

use crate::workflows::campaigns::{CampaignSnapshot, Fulfillment};
use crate::workflows::withdrawals::{
    BankAccount, BankAccountStep, ConsentStep, LegalAgreements, WithdrawalDraft,
};

pub(super) fn rich_campaign(id: &str, reward_points: u64) -> CampaignSnapshot {
    CampaignSnapshot {
        reward_points,
        ..campaign(id, 10, Fulfillment::NoShipment)
    }
}

/// Harness in which `u1` has `credited` points settled and available.
pub(super) fn funded(credited: u64) -> Harness {
    let harness = Harness::new(vec![rich_campaign("visit", credited)]);
    harness.credited("u1", "visit");
    harness
}

pub(super) fn manual_account() -> BankAccount {
    BankAccount {
        bank_name: "Kookmin".to_string(),
        account_number: "123456-01-234567".to_string(),
        account_holder: "Kim".to_string(),
    }
}

pub(super) fn draft(amount: u64) -> WithdrawalDraft {
    WithdrawalDraft {
        amount,
        bank_account: BankAccountStep::Manual(manual_account()),
        consent: ConsentStep {
            agreements: LegalAgreements::all(),
            resident_number: "900101-1234567".to_string(),
        },
    }
}

pub(super) fn draft_json(amount: u64) -> Value {
    json!({
        "amount": amount,
        "bank_account": {
            "mode": "manual",
            "bank_name": "Kookmin",
            "account_number": "123456-01-234567",
            "account_holder": "Kim"
        },
        "consent": {
            "agreements": {
                "privacy_collection": true,
                "tax_reporting": true,
                "withholding": true
            },
            "resident_number": "900101-1234567"
        }
    })
}
