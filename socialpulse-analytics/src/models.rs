//! Wire types for the analytics collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The platforms the collaborator can scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Tiktok,
}

impl Platform {
    pub const ALL: [Self; 3] = [Self::Youtube, Self::Instagram, Self::Tiktok];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Instagram => "instagram",
            Self::Tiktok => "tiktok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Onboarding request: who the creator is plus any platform handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
}

impl FetchRequest {
    /// Handle for a platform, if the creator supplied one.
    #[must_use]
    pub fn handle(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Youtube => self.youtube.as_deref(),
            Platform::Instagram => self.instagram.as_deref(),
            Platform::Tiktok => self.tiktok.as_deref(),
        }
    }
}

/// Parsed metrics for one platform account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformMetrics {
    #[serde(default)]
    pub username: String,
    pub followers: u64,
    pub total_views: u64,
    #[serde(default)]
    pub engagement_rate: f64,
    #[serde(default)]
    pub posts: u32,
}

/// Each requested platform resolves independently to metrics or an error
/// payload; the untagged shape matches the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlatformOutcome {
    Metrics(PlatformMetrics),
    Error { error: String },
}

impl PlatformOutcome {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
}

/// Per-platform results keyed the way the HTTP contract lays them out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformReports {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<PlatformOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<PlatformOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<PlatformOutcome>,
}

impl PlatformReports {
    pub fn set(&mut self, platform: Platform, outcome: PlatformOutcome) {
        match platform {
            Platform::Youtube => self.youtube = Some(outcome),
            Platform::Instagram => self.instagram = Some(outcome),
            Platform::Tiktok => self.tiktok = Some(outcome),
        }
    }

    #[must_use]
    pub const fn get(&self, platform: Platform) -> Option<&PlatformOutcome> {
        match platform {
            Platform::Youtube => self.youtube.as_ref(),
            Platform::Instagram => self.instagram.as_ref(),
            Platform::Tiktok => self.tiktok.as_ref(),
        }
    }
}

/// The aggregate answer handed back to the onboarding flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub user: UserInfo,
    pub platforms: PlatformReports,
    pub fetched_at: DateTime<Utc>,
}

// Scrape-job API shapes ----------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSubmitResponse {
    pub run_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResultsResponse {
    #[serde(default)]
    pub items: Vec<PlatformMetrics>,
}
