//! Read-only view of the campaign directory, normalized once at the import boundary.

pub mod directory;
pub mod domain;
mod import;

pub use directory::{CampaignDirectory, DirectoryError};
pub(crate) use directory::require_campaign;
pub use domain::{ApplicationEnd, CampaignId, CampaignSnapshot, CampaignStatus, Fulfillment};
pub use import::{CampaignImportError, CampaignImporter};
