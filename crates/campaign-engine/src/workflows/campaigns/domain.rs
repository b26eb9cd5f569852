use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CampaignId(pub String);

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Publication state of a campaign as reported by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Recruiting,
    Closed,
    Draft,
}

impl CampaignStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CampaignStatus::Recruiting => "recruiting",
            CampaignStatus::Closed => "closed",
            CampaignStatus::Draft => "draft",
        }
    }
}

/// Whether participants receive a shipped product before reviewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fulfillment {
    Delivery,
    NoShipment,
}

impl Fulfillment {
    pub const fn label(self) -> &'static str {
        match self {
            Fulfillment::Delivery => "delivery",
            Fulfillment::NoShipment => "no_shipment",
        }
    }
}

/// End of the application window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ApplicationEnd {
    /// Open through the end of this calendar day in business time.
    Date(NaiveDate),
    Instant(DateTime<Utc>),
}

impl ApplicationEnd {
    pub fn is_open_at(&self, now: DateTime<Utc>, business_offset: FixedOffset) -> bool {
        match self {
            ApplicationEnd::Date(last_day) => {
                now.with_timezone(&business_offset).date_naive() <= *last_day
            }
            ApplicationEnd::Instant(closes_at) => now <= *closes_at,
        }
    }
}

impl fmt::Display for ApplicationEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationEnd::Date(date) => write!(f, "{date} (end of day)"),
            ApplicationEnd::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
        }
    }
}

/// Canonical campaign metadata consumed by the engine. The engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub campaign_id: CampaignId,
    pub title: String,
    pub max_participants: u32,
    pub application_end: ApplicationEnd,
    pub reward_points: u64,
    pub status: CampaignStatus,
    pub fulfillment: Fulfillment,
}
