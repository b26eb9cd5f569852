use chrono::{Duration, NaiveDate};

use super::common::*;
use crate::workflows::applications::{
    AdmissionGuard, AdmissionRejection, ApplicationId, ApplicationRecord, ApplicationStatus,
};
use crate::workflows::campaigns::{ApplicationEnd, CampaignStatus, Fulfillment};
use crate::workflows::error::ConflictReason;

fn existing(id: &str, user_id: &str, status: ApplicationStatus) -> ApplicationRecord {
    let mut record = ApplicationRecord::new(
        ApplicationId(id.to_string()),
        user(user_id),
        campaign("camp-1", 2, Fulfillment::NoShipment).campaign_id,
        Fulfillment::NoShipment,
        submission("Lee"),
        start_instant(),
    );
    record.status = status;
    record
}

fn guard() -> AdmissionGuard {
    AdmissionGuard::new(business_offset())
}

#[test]
fn admits_when_every_check_passes() {
    let campaign = campaign("camp-1", 2, Fulfillment::NoShipment);
    let others = vec![existing("a", "u2", ApplicationStatus::Approved)];

    assert_eq!(
        guard().check(&campaign, &user("u1"), &others, start_instant()),
        Ok(())
    );
}

#[test]
fn duplicate_is_reported_before_capacity() {
    let campaign = campaign("camp-1", 1, Fulfillment::NoShipment);
    let others = vec![existing("a", "u1", ApplicationStatus::Approved)];

    let rejection = guard()
        .check(&campaign, &user("u1"), &others, start_instant())
        .unwrap_err();
    assert_eq!(rejection, AdmissionRejection::Duplicate);
    assert_eq!(rejection.reason(), ConflictReason::Duplicate);
}

#[test]
fn cancelled_application_does_not_count_as_duplicate() {
    let campaign = campaign("camp-1", 2, Fulfillment::NoShipment);
    let others = vec![existing("a", "u1", ApplicationStatus::Cancelled)];

    assert!(guard()
        .check(&campaign, &user("u1"), &others, start_instant())
        .is_ok());
}

#[test]
fn rejected_application_still_blocks_reapplying() {
    let campaign = campaign("camp-1", 2, Fulfillment::NoShipment);
    let others = vec![existing("a", "u1", ApplicationStatus::Rejected)];

    assert_eq!(
        guard().check(&campaign, &user("u1"), &others, start_instant()),
        Err(AdmissionRejection::Duplicate)
    );
}

#[test]
fn only_admitted_applications_fill_capacity() {
    let campaign = campaign("camp-1", 2, Fulfillment::NoShipment);
    let pending_only = vec![
        existing("a", "u2", ApplicationStatus::Pending),
        existing("b", "u3", ApplicationStatus::Pending),
        existing("c", "u4", ApplicationStatus::Rejected),
    ];
    assert!(guard()
        .check(&campaign, &user("u1"), &pending_only, start_instant())
        .is_ok());

    let full = vec![
        existing("a", "u2", ApplicationStatus::Approved),
        existing("b", "u3", ApplicationStatus::ReviewCompleted),
    ];
    assert_eq!(
        guard().check(&campaign, &user("u1"), &full, start_instant()),
        Err(AdmissionRejection::Full {
            max: 2,
            admitted: 2
        })
    );
}

#[test]
fn campaign_not_recruiting_is_closed() {
    let mut campaign = campaign("camp-1", 2, Fulfillment::NoShipment);
    campaign.status = CampaignStatus::Draft;

    let rejection = guard()
        .check(&campaign, &user("u1"), &[], start_instant())
        .unwrap_err();
    assert_eq!(rejection.reason(), ConflictReason::Closed);
}

#[test]
fn deadline_day_is_inclusive() {
    let mut campaign = campaign("camp-1", 2, Fulfillment::NoShipment);
    campaign.application_end =
        ApplicationEnd::Date(NaiveDate::from_ymd_opt(2025, 3, 12).expect("valid date"));

    // start_instant is 10:00 on the 12th in business time
    let late_evening = start_instant() + Duration::hours(13) + Duration::minutes(59);
    assert!(guard()
        .check(&campaign, &user("u1"), &[], late_evening)
        .is_ok());

    let next_morning = start_instant() + Duration::hours(14);
    let rejection = guard()
        .check(&campaign, &user("u1"), &[], next_morning)
        .unwrap_err();
    assert_eq!(rejection.reason(), ConflictReason::Closed);
}
