mod normalizer;
mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::FixedOffset;

use super::domain::CampaignSnapshot;

#[derive(Debug)]
pub enum CampaignImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, reason: String },
}

impl std::fmt::Display for CampaignImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignImportError::Io(err) => write!(f, "failed to read campaign export: {}", err),
            CampaignImportError::Csv(err) => write!(f, "invalid campaign CSV data: {}", err),
            CampaignImportError::InvalidRow { row, reason } => {
                write!(f, "campaign row {}: {}", row, reason)
            }
        }
    }
}

impl std::error::Error for CampaignImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CampaignImportError::Io(err) => Some(err),
            CampaignImportError::Csv(err) => Some(err),
            CampaignImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for CampaignImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CampaignImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads directory exports whose column names drifted over time into canonical snapshots.
pub struct CampaignImporter;

impl CampaignImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        business_offset: FixedOffset,
    ) -> Result<Vec<CampaignSnapshot>, CampaignImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, business_offset)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        business_offset: FixedOffset,
    ) -> Result<Vec<CampaignSnapshot>, CampaignImportError> {
        let mut seen = HashSet::new();
        let mut campaigns = Vec::new();

        for (index, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            // header is line 1
            let line = index + 2;
            let snapshot = row
                .into_snapshot(business_offset)
                .map_err(|reason| CampaignImportError::InvalidRow { row: line, reason })?;

            if !seen.insert(snapshot.campaign_id.clone()) {
                return Err(CampaignImportError::InvalidRow {
                    row: line,
                    reason: format!("duplicate campaign id `{}`", snapshot.campaign_id),
                });
            }
            campaigns.push(snapshot);
        }

        Ok(campaigns)
    }
}
