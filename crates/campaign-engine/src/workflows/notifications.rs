use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::actors::UserId;
use super::applications::ApplicationId;

/// Outbound staff-facing notification hook (admin inbox, chat, e-mail adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: StaffNotification) -> Result<(), NotificationError>;
}

/// Payload handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffNotification {
    pub template: String,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<ApplicationId>,
    pub details: BTreeMap<String, String>,
}

impl StaffNotification {
    pub fn new(template: &str, user_id: &UserId) -> Self {
        Self {
            template: template.to_string(),
            user_id: user_id.clone(),
            application_id: None,
            details: BTreeMap::new(),
        }
    }

    pub fn for_application(mut self, application_id: &ApplicationId) -> Self {
        self.application_id = Some(application_id.clone());
        self
    }

    pub fn detail(mut self, key: &str, value: impl ToString) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Fire and forget: a failed notification never affects the triggering operation.
pub(crate) fn notify_staff(publisher: &dyn NotificationPublisher, notification: StaffNotification) {
    let template = notification.template.clone();
    match publisher.publish(notification) {
        Ok(()) => debug!(%template, "staff notification dispatched"),
        Err(err) => warn!(%template, error = %err, "staff notification dropped"),
    }
}

/// Publisher that only records notifications in the log stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationPublisher;

impl NotificationPublisher for LogNotificationPublisher {
    fn publish(&self, notification: StaffNotification) -> Result<(), NotificationError> {
        tracing::info!(
            template = %notification.template,
            user_id = %notification.user_id,
            application_id = notification
                .application_id
                .as_ref()
                .map(|id| id.0.as_str())
                .unwrap_or("-"),
            "staff notification"
        );
        Ok(())
    }
}
