use crate::infra::{load_campaigns, parse_date, InMemoryNotificationPublisher};
use campaign_engine::config::{AppConfig, EngineConfig};
use campaign_engine::error::AppError;
use campaign_engine::workflows::actors::{StaffId, UserId};
use campaign_engine::workflows::applications::{
    ApplicantProfile, ApplicationId, ApplicationSubmission, FulfillmentMilestone, SnsHandles,
};
use campaign_engine::workflows::campaigns::{
    ApplicationEnd, CampaignId, CampaignSnapshot, CampaignStatus, Fulfillment,
};
use campaign_engine::workflows::reviews::ReviewDraft;
use campaign_engine::workflows::store::{MemoryCampaignDirectory, MemoryStore};
use campaign_engine::workflows::withdrawals::{
    payout_date, payout_date_at, BankAccount, BankAccountStep, ConsentStep, LegalAgreements,
    SubmissionContext, TaxBreakdown, WithdrawalDraft,
};
use campaign_engine::workflows::{EngineServices, EngineStores, WorkflowError};
use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PayoutDateArgs {
    /// Request date (YYYY-MM-DD). Defaults to today in business time.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct WithholdingArgs {
    /// Points to withdraw
    #[arg(long)]
    pub(crate) amount: u64,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Campaign directory CSV export; the first recruiting campaign is used.
    #[arg(long)]
    pub(crate) campaigns: Option<PathBuf>,
    /// Skip the withdrawal portion of the demo.
    #[arg(long)]
    pub(crate) skip_withdrawal: bool,
}

pub(crate) fn run_payout_date(args: PayoutDateArgs) -> Result<(), AppError> {
    let (requested_on, payout_on) = match args.today {
        Some(today) => (today, payout_date(today)),
        None => {
            let config = AppConfig::load()?;
            let now = Utc::now();
            (
                now.with_timezone(&config.engine.business_offset).date_naive(),
                payout_date_at(now, config.engine.business_offset),
            )
        }
    };
    println!("Requested on {requested_on} -> paid out on {payout_on}");
    Ok(())
}

pub(crate) fn run_withholding(args: WithholdingArgs) -> Result<(), AppError> {
    let breakdown = TaxBreakdown::for_amount(args.amount);
    println!("Withdrawal amount: {}", breakdown.amount);
    println!("Withholding (3.3%): {}", breakdown.tax_amount);
    println!("Paid to account:    {}", breakdown.final_amount);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = EngineConfig::default();
    let campaign = match load_campaigns(args.campaigns.as_deref(), &config)?
        .into_iter()
        .find(|campaign| campaign.status == CampaignStatus::Recruiting)
    {
        Some(campaign) => campaign,
        None => demo_campaign(&config),
    };

    println!("Campaign engine demo");
    println!(
        "- Campaign {} \"{}\" | {} slots | closes {} | {} points | {}",
        campaign.campaign_id,
        campaign.title,
        campaign.max_participants,
        campaign.application_end,
        campaign.reward_points,
        campaign.fulfillment.label()
    );

    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let stores = EngineStores::in_memory(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryCampaignDirectory::new(vec![campaign.clone()])),
    )
    .with_notifications(notifications.clone());
    let services = EngineServices::new(stores, &config);

    let applicant = UserId("demo-applicant".to_string());
    let staff = StaffId("demo-staff".to_string());

    if let Err(err) = walk_application(&services, &campaign, &applicant, &staff) {
        println!("  Stopped: {err}");
        return Ok(());
    }

    if !args.skip_withdrawal {
        if let Err(err) = walk_withdrawal(&services, &applicant, campaign.reward_points) {
            println!("  Withdrawal stopped: {err}");
        }
    }

    let events = notifications.events();
    if events.is_empty() {
        println!("\nStaff notifications: none dispatched");
    } else {
        println!("\nStaff notifications:");
        for event in events {
            println!("  - template={} user={}", event.template, event.user_id);
        }
    }

    Ok(())
}

fn walk_application(
    services: &EngineServices,
    campaign: &CampaignSnapshot,
    applicant: &UserId,
    staff: &StaffId,
) -> Result<ApplicationId, WorkflowError> {
    println!("\nApplication lifecycle");
    let record = services
        .applications
        .apply(applicant, &campaign.campaign_id, demo_submission())?;
    let id = record.application_id.clone();
    println!("- Applied {} -> {}", id, record.status.label());

    let record = services.applications.approve(staff, &id)?;
    println!("- Staff approved -> {}", record.status.label());

    if record.fulfillment == Fulfillment::Delivery {
        for milestone in [
            FulfillmentMilestone::ProductPurchased,
            FulfillmentMilestone::Shipping,
            FulfillmentMilestone::Delivered,
        ] {
            let record = services
                .applications
                .report_fulfillment(applicant, &id, milestone)?;
            println!("- Fulfillment update -> {}", record.status.label());
        }
    }

    let receipt = services.reviews.submit(
        applicant,
        &id,
        ReviewDraft {
            blog_url: Some("https://blog.example.com/demo/first-visit".to_string()),
            images: Vec::new(),
            notes: String::new(),
        },
    )?;
    println!(
        "- Review {:?} -> {}",
        receipt.outcome,
        receipt.application_status.label()
    );

    let record = services
        .reviews
        .reject_review(staff, &id, "Please add photos of the product")?;
    println!(
        "- Staff rejected review ({}) -> {}",
        record.rejection_reason.as_deref().unwrap_or("-"),
        record.status.label()
    );

    let receipt = services.reviews.submit(
        applicant,
        &id,
        ReviewDraft {
            blog_url: None,
            images: vec!["https://cdn.example.com/demo/product.jpg".to_string()],
            notes: "Photos added".to_string(),
        },
    )?;
    println!(
        "- Review {:?} with images only -> {}",
        receipt.outcome,
        receipt.application_status.label()
    );

    let record = services.reviews.approve_review(staff, &id)?;
    println!("- Staff accepted review -> {}", record.status.label());

    let payout = services.points.request_payout(applicant, &id)?;
    println!(
        "- Payout requested: {} points ({}) -> {}",
        payout.entry.points_amount,
        payout.entry.status.label(),
        payout.application.status
    );
    let settled = services.points.complete_payout(staff, &id)?;
    println!(
        "- Payout settled ({}) -> {}",
        settled.entry.status.label(),
        settled.application.status
    );

    Ok(id)
}

fn walk_withdrawal(
    services: &EngineServices,
    applicant: &UserId,
    credited: u64,
) -> Result<(), WorkflowError> {
    println!("\nWithdrawal (sensitive fields masked)");
    let preview = services.withdrawals.preview(applicant, credited)?;
    println!(
        "- Preview: {} points -> tax {} -> {} paid on {}",
        preview.amount, preview.tax_amount, preview.final_amount, preview.scheduled_payout_on
    );

    let mut consent = ConsentStep {
        agreements: LegalAgreements::default(),
        resident_number: "900101-1234567".to_string(),
    };
    consent.agree_to_all();

    let request = services.withdrawals.submit(
        applicant,
        WithdrawalDraft {
            amount: credited,
            bank_account: BankAccountStep::Manual(BankAccount {
                bank_name: "Demo Bank".to_string(),
                account_number: "110-123-456789".to_string(),
                account_holder: "Demo Applicant".to_string(),
            }),
            consent,
        },
        &SubmissionContext {
            forwarded_for: None,
            real_ip: None,
            peer: Some([127, 0, 0, 1].into()),
        },
    )?;

    match serde_json::to_string_pretty(&request.view()) {
        Ok(json) => println!("  Stored request:\n{json}"),
        Err(err) => println!("  Stored request unavailable: {err}"),
    }

    let summary = services.points.summary(applicant)?;
    println!(
        "- Balance after withdrawal: {} available / {} withdrawn",
        summary.available, summary.withdrawn
    );
    Ok(())
}

fn demo_campaign(config: &EngineConfig) -> CampaignSnapshot {
    let today = Utc::now().with_timezone(&config.business_offset).date_naive();
    CampaignSnapshot {
        campaign_id: CampaignId("demo-cafe".to_string()),
        title: "Neighborhood cafe visit".to_string(),
        max_participants: 5,
        application_end: ApplicationEnd::Date(today + Duration::days(14)),
        reward_points: 30_000,
        status: CampaignStatus::Recruiting,
        fulfillment: Fulfillment::NoShipment,
    }
}

fn demo_submission() -> ApplicationSubmission {
    ApplicationSubmission {
        profile: ApplicantProfile {
            name: "Demo Applicant".to_string(),
            phone: "010-0000-0000".to_string(),
            email: Some("applicant@example.com".to_string()),
            shipping_address: Some("Seoul".to_string()),
            sns: SnsHandles {
                blog: Some("https://blog.example.com/demo".to_string()),
                instagram: None,
                youtube: None,
            },
        },
        reason: "Curious about the menu".to_string(),
        plan: "One blog post with photos".to_string(),
        notes: String::new(),
        applicant_comment: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_end_to_end_without_a_campaign_export() {
        run_demo(DemoArgs::default()).expect("demo completes");
    }

    #[test]
    fn withholding_prints_without_config() {
        run_withholding(WithholdingArgs { amount: 100_000 }).expect("prints");
    }

    #[test]
    fn payout_date_with_explicit_day_skips_config() {
        run_payout_date(PayoutDateArgs {
            today: NaiveDate::from_ymd_opt(2025, 3, 12),
        })
        .expect("prints");
    }
}
