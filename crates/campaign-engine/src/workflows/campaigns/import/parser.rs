use std::io::Read;

use chrono::FixedOffset;
use serde::{Deserialize, Deserializer};

use super::normalizer::{normalize_fulfillment, normalize_status, parse_application_end};
use crate::workflows::campaigns::domain::{CampaignId, CampaignSnapshot, CampaignStatus};

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<CampaignRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<CampaignRow>() {
        rows.push(record?);
    }

    Ok(rows)
}

/// One export row. Every concept maps to a single field regardless of the header spelling.
#[derive(Debug, Deserialize)]
pub(crate) struct CampaignRow {
    #[serde(alias = "id", alias = "campaignId")]
    campaign_id: String,
    #[serde(default, alias = "name")]
    title: String,
    #[serde(
        alias = "maxParticipants",
        alias = "recruitment_count",
        alias = "max_applicants"
    )]
    max_participants: u32,
    #[serde(
        default,
        alias = "applicationEndAt",
        alias = "application_end_date",
        alias = "applicationEndDate",
        alias = "recruitment_end_date",
        alias = "deadline",
        alias = "end_date",
        deserialize_with = "empty_string_as_none"
    )]
    application_end_at: Option<String>,
    #[serde(
        default,
        alias = "reward_amount",
        alias = "rewardAmount",
        alias = "rewardPoints",
        alias = "point_reward"
    )]
    reward_points: u64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(
        default,
        alias = "campaign_type",
        deserialize_with = "empty_string_as_none"
    )]
    fulfillment: Option<String>,
}

impl CampaignRow {
    pub(crate) fn into_snapshot(
        self,
        business_offset: FixedOffset,
    ) -> Result<CampaignSnapshot, String> {
        let campaign_id = self.campaign_id.trim().to_string();
        if campaign_id.is_empty() {
            return Err("missing campaign id".to_string());
        }

        let raw_end = self
            .application_end_at
            .ok_or_else(|| "missing application end date".to_string())?;
        let application_end = parse_application_end(&raw_end, business_offset)
            .ok_or_else(|| format!("unrecognized application end `{raw_end}`"))?;

        let status = match self.status.as_deref() {
            Some(raw) => {
                normalize_status(raw).ok_or_else(|| format!("unrecognized status `{raw}`"))?
            }
            None => CampaignStatus::Recruiting,
        };

        Ok(CampaignSnapshot {
            title: if self.title.is_empty() {
                campaign_id.clone()
            } else {
                self.title
            },
            campaign_id: CampaignId(campaign_id),
            max_participants: self.max_participants,
            application_end,
            reward_points: self.reward_points,
            status,
            fulfillment: normalize_fulfillment(self.fulfillment.as_deref()),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
