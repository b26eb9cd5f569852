//! Fixtures and doubles shared by the workflow test modules.

use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use super::actors::{StaffId, UserId};
use super::applications::{
    ApplicantProfile, ApplicationId, ApplicationStatus, ApplicationSubmission, FulfillmentMilestone,
    SnsHandles,
};
use super::campaigns::{
    ApplicationEnd, CampaignDirectory, CampaignId, CampaignSnapshot, CampaignStatus,
    DirectoryError, Fulfillment,
};
use super::clock::FixedClock;
use super::engine::{EngineServices, EngineStores};
use super::notifications::{NotificationError, NotificationPublisher, StaffNotification};
use super::reviews::ReviewDraft;
use super::store::{MemoryCampaignDirectory, MemoryStore};
use crate::config::EngineConfig;

pub(crate) fn business_offset() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("valid offset")
}

pub(crate) fn engine_config() -> EngineConfig {
    EngineConfig {
        business_offset: business_offset(),
        minimum_withdrawal_points: 1_000,
        campaign_csv: None,
    }
}

/// 2025-03-12 10:00 in UTC+9.
pub(crate) fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 1, 0, 0)
        .single()
        .expect("valid instant")
}

pub(crate) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(crate) fn staff(id: &str) -> StaffId {
    StaffId(id.to_string())
}

pub(crate) fn campaign(id: &str, max_participants: u32, fulfillment: Fulfillment) -> CampaignSnapshot {
    CampaignSnapshot {
        campaign_id: CampaignId(id.to_string()),
        title: format!("Campaign {id}"),
        max_participants,
        application_end: ApplicationEnd::Date(
            NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date"),
        ),
        reward_points: 5_000,
        status: CampaignStatus::Recruiting,
        fulfillment,
    }
}

pub(crate) fn submission(name: &str) -> ApplicationSubmission {
    ApplicationSubmission {
        profile: ApplicantProfile {
            name: name.to_string(),
            phone: "010-1234-5678".to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            shipping_address: Some("12 Teheran-ro, Seoul".to_string()),
            sns: SnsHandles {
                blog: Some(format!("https://blog.example.com/{}", name.to_lowercase())),
                instagram: None,
                youtube: None,
            },
        },
        reason: "Long-time customer".to_string(),
        plan: "One blog post with photos".to_string(),
        notes: String::new(),
        applicant_comment: Some("Excited to try it".to_string()),
    }
}

pub(crate) fn blog_review(slug: &str) -> ReviewDraft {
    ReviewDraft {
        blog_url: Some(format!("https://blog.example.com/{slug}")),
        images: Vec::new(),
        notes: "Honest review".to_string(),
    }
}

pub(crate) fn image_review(image: &str) -> ReviewDraft {
    ReviewDraft {
        blog_url: None,
        images: vec![format!("https://cdn.example.com/{image}")],
        notes: String::new(),
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Publisher that keeps every notification for assertions.
#[derive(Default)]
pub(crate) struct RecordingPublisher {
    events: Mutex<Vec<StaffNotification>>,
}

impl RecordingPublisher {
    pub(crate) fn templates(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .iter()
            .map(|event| event.template.clone())
            .collect()
    }
}

impl NotificationPublisher for RecordingPublisher {
    fn publish(&self, notification: StaffNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(crate) struct FailingPublisher;

impl NotificationPublisher for FailingPublisher {
    fn publish(&self, _notification: StaffNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay offline".to_string()))
    }
}

pub(crate) struct UnavailableDirectory;

impl CampaignDirectory for UnavailableDirectory {
    fn get(&self, _campaign_id: &CampaignId) -> Result<Option<CampaignSnapshot>, DirectoryError> {
        Err(DirectoryError::Unavailable("directory timeout".to_string()))
    }
}

/// In-memory engine with a fixed clock and recorded notifications.
pub(crate) struct Harness {
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) directory: Arc<MemoryCampaignDirectory>,
    pub(crate) clock: Arc<FixedClock>,
    pub(crate) notifications: Arc<RecordingPublisher>,
    pub(crate) services: EngineServices,
}

impl Harness {
    pub(crate) fn new(campaigns: Vec<CampaignSnapshot>) -> Self {
        Self::customized(campaigns, |stores| stores)
    }

    /// Lets a test swap individual collaborators before the services are built.
    pub(crate) fn customized<F>(campaigns: Vec<CampaignSnapshot>, customize: F) -> Self
    where
        F: FnOnce(EngineStores) -> EngineStores,
    {
        let store = Arc::new(MemoryStore::new());
        let directory = Arc::new(MemoryCampaignDirectory::new(campaigns));
        let clock = Arc::new(FixedClock::new(start_instant()));
        let notifications = Arc::new(RecordingPublisher::default());

        let stores = EngineStores::in_memory(store.clone(), directory.clone())
            .with_clock(clock.clone())
            .with_notifications(notifications.clone());
        let services = EngineServices::new(customize(stores), &engine_config());

        Self {
            store,
            directory,
            clock,
            notifications,
            services,
        }
    }

    pub(crate) fn apply(&self, user_id: &str, campaign_id: &str) -> ApplicationId {
        self.services
            .applications
            .apply(&user(user_id), &CampaignId(campaign_id.to_string()), submission("Kim"))
            .expect("application accepted")
            .application_id
    }

    pub(crate) fn approved(&self, user_id: &str, campaign_id: &str) -> ApplicationId {
        let id = self.apply(user_id, campaign_id);
        self.services
            .applications
            .approve(&staff("staff-1"), &id)
            .expect("approval succeeds");
        id
    }

    /// Walks an application of `campaign_id` to `review_in_progress`, shipping first when the
    /// campaign delivers a product.
    pub(crate) fn reviewing(&self, user_id: &str, campaign_id: &str) -> ApplicationId {
        let id = self.approved(user_id, campaign_id);
        let record = self.services.applications.get(&id).expect("stored");
        if record.fulfillment == Fulfillment::Delivery {
            for milestone in [
                FulfillmentMilestone::ProductPurchased,
                FulfillmentMilestone::Shipping,
                FulfillmentMilestone::Delivered,
            ] {
                self.services
                    .applications
                    .report_fulfillment(&user(user_id), &id, milestone)
                    .expect("milestone accepted");
            }
        }
        self.services
            .reviews
            .submit(&user(user_id), &id, blog_review(user_id))
            .expect("review accepted");
        id
    }

    pub(crate) fn review_completed(&self, user_id: &str, campaign_id: &str) -> ApplicationId {
        let id = self.reviewing(user_id, campaign_id);
        self.services
            .reviews
            .approve_review(&staff("staff-1"), &id)
            .expect("review approved");
        id
    }

    /// Settled payout worth the campaign reward.
    pub(crate) fn credited(&self, user_id: &str, campaign_id: &str) -> ApplicationId {
        let id = self.review_completed(user_id, campaign_id);
        self.services
            .points
            .request_payout(&user(user_id), &id)
            .expect("payout requested");
        self.services
            .points
            .complete_payout(&staff("staff-1"), &id)
            .expect("payout settled");
        id
    }

    pub(crate) fn status(&self, id: &ApplicationId) -> ApplicationStatus {
        self.services
            .applications
            .get(id)
            .expect("application stored")
            .status
    }
}
