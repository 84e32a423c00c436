//! SocialPulse Analytics Collaborator Client
//!
//! Async client for the third-party scraping service that backs creator
//! onboarding: submit a scrape run per platform handle, poll it to
//! completion under a hard deadline, and aggregate per-platform
//! metrics-or-error outcomes into one report.

pub mod client;
pub mod error;
pub mod models;
pub mod registry;

pub use client::{AnalyticsClient, HttpTransport, JobTransport, PollConfig};
pub use error::{Error, Result};
pub use models::{
    AnalyticsReport, FetchRequest, JobId, JobStatus, Platform, PlatformMetrics, PlatformOutcome,
    PlatformReports, UserInfo,
};
pub use registry::DeviceTokenRegistry;
