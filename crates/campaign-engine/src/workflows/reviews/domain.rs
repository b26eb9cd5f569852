use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::actors::UserId;
use crate::workflows::applications::ApplicationId;
use crate::workflows::campaigns::CampaignId;
use crate::workflows::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewId(pub String);

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Submitted,
}

/// Evidence payload sent by the applicant on every submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    #[serde(default)]
    pub blog_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// Draft after trimming, with blank image slots removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewContent {
    pub blog_url: Option<String>,
    pub images: Vec<String>,
    pub notes: String,
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}

impl ReviewDraft {
    /// Requires a blog url or at least one image; every url must be http(s).
    pub fn validate(self) -> Result<ReviewContent, ValidationError> {
        let blog_url = self
            .blog_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        let images: Vec<String> = self
            .images
            .into_iter()
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty())
            .collect();

        if blog_url.is_none() && images.is_empty() {
            return Err(ValidationError::MissingReviewEvidence);
        }
        if let Some(url) = &blog_url {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl { field: "blog_url" });
            }
        }
        if images.iter().any(|image| !is_http_url(image)) {
            return Err(ValidationError::InvalidUrl { field: "images" });
        }

        Ok(ReviewContent {
            blog_url,
            images,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Stored review evidence; one per application, overwritten in place on resubmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub review_id: ReviewId,
    pub application_id: ApplicationId,
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub blog_url: Option<String>,
    pub images: Vec<String>,
    pub notes: String,
    pub status: ReviewStatus,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped on every content overwrite; stores use it as the update precondition.
    pub revision: u32,
}

impl ReviewSubmission {
    pub fn matches(&self, content: &ReviewContent) -> bool {
        self.blog_url == content.blog_url
            && self.images == content.images
            && self.notes == content.notes
    }

    pub(crate) fn overwrite(&mut self, content: ReviewContent, at: DateTime<Utc>) {
        self.blog_url = content.blog_url;
        self.images = content.images;
        self.notes = content.notes;
        self.submitted_at = at;
        self.updated_at = at;
        self.revision += 1;
    }
}
