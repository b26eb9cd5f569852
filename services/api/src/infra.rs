use campaign_engine::config::EngineConfig;
use campaign_engine::error::AppError;
use campaign_engine::workflows::campaigns::{CampaignImporter, CampaignSnapshot};
use campaign_engine::workflows::notifications::{
    NotificationError, NotificationPublisher, StaffNotification,
};
use campaign_engine::workflows::store::{MemoryCampaignDirectory, MemoryStore};
use campaign_engine::workflows::{EngineServices, EngineStores};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keeps staff notifications in memory so the demo can print what would have been sent.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<StaffNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: StaffNotification) -> Result<(), NotificationError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotificationError::Transport("notification buffer poisoned".to_string()))?;
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<StaffNotification> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

/// Reads the configured campaign export, or starts with an empty directory.
pub(crate) fn load_campaigns(
    path: Option<&Path>,
    config: &EngineConfig,
) -> Result<Vec<CampaignSnapshot>, AppError> {
    match path {
        Some(path) => {
            let campaigns = CampaignImporter::from_path(path, config.business_offset)?;
            info!(
                path = %path.display(),
                campaigns = campaigns.len(),
                "campaign directory imported"
            );
            Ok(campaigns)
        }
        None => Ok(Vec::new()),
    }
}

/// In-process engine over one shared memory store.
pub(crate) fn in_memory_engine(
    campaigns: Vec<CampaignSnapshot>,
    config: &EngineConfig,
) -> (EngineServices, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let directory = Arc::new(MemoryCampaignDirectory::new(campaigns));
    let services = EngineServices::new(EngineStores::in_memory(store.clone(), directory), config);
    (services, store)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
