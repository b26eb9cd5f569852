use tracing::warn;

use super::domain::{CampaignId, CampaignSnapshot};
use crate::workflows::error::WorkflowError;

/// Read-only campaign metadata source. Implementations must not hide outages as `Ok(None)`.
pub trait CampaignDirectory: Send + Sync {
    fn get(&self, campaign_id: &CampaignId) -> Result<Option<CampaignSnapshot>, DirectoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("campaign directory unavailable: {0}")]
    Unavailable(String),
}

/// Fetches a campaign or fails closed: outages become `Dependency`, unknown ids `NotFound`.
pub(crate) fn require_campaign(
    directory: &dyn CampaignDirectory,
    campaign_id: &CampaignId,
) -> Result<CampaignSnapshot, WorkflowError> {
    match directory.get(campaign_id) {
        Ok(Some(campaign)) => Ok(campaign),
        Ok(None) => Err(WorkflowError::not_found("campaign", campaign_id)),
        Err(err) => {
            warn!(%campaign_id, error = %err, "campaign directory lookup failed");
            Err(WorkflowError::Dependency(err.to_string()))
        }
    }
}
