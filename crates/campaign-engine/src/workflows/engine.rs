use std::sync::Arc;

use axum::Router;

use super::applications::{application_router, ApplicationRepository, ApplicationService};
use super::campaigns::CampaignDirectory;
use super::clock::{Clock, SystemClock};
use super::notifications::{LogNotificationPublisher, NotificationPublisher};
use super::points::{points_router, LedgerRepository, PointsService};
use super::reviews::{review_router, ReviewRepository, ReviewService};
use super::store::{MemoryCampaignDirectory, MemoryStore};
use super::withdrawals::{
    withdrawal_router, BankAccountRegistry, WithdrawalRepository, WithdrawalService,
};
use crate::config::EngineConfig;

/// Collaborators the workflow services are built from.
#[derive(Clone)]
pub struct EngineStores {
    pub campaigns: Arc<dyn CampaignDirectory>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub ledger: Arc<dyn LedgerRepository>,
    pub withdrawals: Arc<dyn WithdrawalRepository>,
    pub bank_accounts: Arc<dyn BankAccountRegistry>,
    pub notifications: Arc<dyn NotificationPublisher>,
    pub clock: Arc<dyn Clock>,
}

impl EngineStores {
    /// Every store backed by one `MemoryStore`, log-only notifications and the system clock.
    pub fn in_memory(store: Arc<MemoryStore>, campaigns: Arc<MemoryCampaignDirectory>) -> Self {
        Self {
            campaigns,
            applications: store.clone(),
            reviews: store.clone(),
            ledger: store.clone(),
            withdrawals: store.clone(),
            bank_accounts: store,
            notifications: Arc::new(LogNotificationPublisher),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifications(mut self, notifications: Arc<dyn NotificationPublisher>) -> Self {
        self.notifications = notifications;
        self
    }
}

#[derive(Clone)]
pub struct EngineServices {
    pub applications: Arc<ApplicationService>,
    pub reviews: Arc<ReviewService>,
    pub points: Arc<PointsService>,
    pub withdrawals: Arc<WithdrawalService>,
}

impl EngineServices {
    pub fn new(stores: EngineStores, config: &EngineConfig) -> Self {
        let applications = Arc::new(ApplicationService::new(
            stores.campaigns.clone(),
            stores.applications.clone(),
            stores.clock.clone(),
            config.business_offset,
        ));
        let reviews = Arc::new(ReviewService::new(
            stores.applications.clone(),
            stores.reviews.clone(),
            stores.notifications.clone(),
            stores.clock.clone(),
        ));
        let points = Arc::new(PointsService::new(
            stores.campaigns.clone(),
            stores.applications.clone(),
            stores.ledger.clone(),
            stores.withdrawals.clone(),
            stores.notifications.clone(),
            stores.clock.clone(),
        ));
        let withdrawals = Arc::new(WithdrawalService::new(
            points.clone(),
            stores.withdrawals,
            stores.bank_accounts,
            stores.notifications,
            stores.clock,
            config.business_offset,
            config.minimum_withdrawal_points,
        ));

        Self {
            applications,
            reviews,
            points,
            withdrawals,
        }
    }
}

/// All workflow routes merged into one router.
pub fn engine_router(services: &EngineServices) -> Router {
    application_router(services.applications.clone())
        .merge(review_router(services.reviews.clone()))
        .merge(points_router(services.points.clone()))
        .merge(withdrawal_router(services.withdrawals.clone()))
}
