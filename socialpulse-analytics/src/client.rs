//! Analytics fetch client.
//!
//! The collaborator exposes an asynchronous scrape-job API: submit a run,
//! poll its status at a fixed interval, then fetch the first result item.
//! The whole operation runs under an overall deadline and is cancelled by
//! dropping the future; each platform resolves independently so one
//! failure never blocks the others.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::error::{Error, Result};
use crate::models::{
    AnalyticsReport, FetchRequest, JobId, JobResultsResponse, JobStatus, JobStatusResponse,
    JobSubmitResponse, Platform, PlatformMetrics, PlatformOutcome, PlatformReports, UserInfo,
};

/// Polling cadence and bounds for one platform fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
    /// Overall wall-clock bound for submit + polls + results.
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 30,
            deadline: Duration::from_secs(330),
        }
    }
}

/// Seam over the scrape-job API so the poll loop is testable without a
/// live service.
#[async_trait]
pub trait JobTransport: Send + Sync {
    /// Submit a scrape run for one platform handle.
    async fn submit(&self, platform: Platform, handle: &str) -> Result<JobId>;

    /// Poll the current status of a run.
    async fn status(&self, job: &JobId) -> Result<JobStatusResponse>;

    /// Fetch the first result item of a succeeded run.
    async fn results(&self, job: &JobId) -> Result<PlatformMetrics>;
}

/// HTTP transport against the real collaborator.
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl JobTransport for HttpTransport {
    async fn submit(&self, platform: Platform, handle: &str) -> Result<JobId> {
        let url = format!("{}/runs", self.base_url);
        debug!("submitting {platform} scrape for {handle}");
        let response: JobSubmitResponse = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "platform": platform, "handle": handle }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(JobId(response.run_id))
    }

    async fn status(&self, job: &JobId) -> Result<JobStatusResponse> {
        let url = format!("{}/runs/{}", self.base_url, job.0);
        Ok(self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn results(&self, job: &JobId) -> Result<PlatformMetrics> {
        let url = format!("{}/runs/{}/results", self.base_url, job.0);
        let response: JobResultsResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("run succeeded with no result items".to_string()))
    }
}

/// Client over any transport, applying the bounded poll discipline.
pub struct AnalyticsClient<T: JobTransport> {
    transport: T,
    config: PollConfig,
}

impl<T: JobTransport> AnalyticsClient<T> {
    pub const fn new(transport: T, config: PollConfig) -> Self {
        Self { transport, config }
    }

    /// Fetch metrics for a single platform handle, bounded by the overall
    /// deadline. Dropping the returned future cancels the fetch.
    ///
    /// # Errors
    ///
    /// Returns an error when the job fails, polling exhausts its attempts,
    /// the deadline passes, or the transport errors.
    pub async fn fetch_platform(
        &self,
        platform: Platform,
        handle: &str,
    ) -> Result<PlatformMetrics> {
        timeout(self.config.deadline, self.run_job(platform, handle))
            .await
            .map_err(|_| Error::DeadlineExceeded(self.config.deadline))?
    }

    async fn run_job(&self, platform: Platform, handle: &str) -> Result<PlatformMetrics> {
        let job = self.transport.submit(platform, handle).await?;

        for attempt in 1..=self.config.max_attempts {
            let status = self.transport.status(&job).await?;
            match status.status {
                JobStatus::Succeeded => return self.transport.results(&job).await,
                JobStatus::Failed => {
                    return Err(Error::JobFailed(
                        status.error.unwrap_or_else(|| "unspecified".to_string()),
                    ));
                }
                JobStatus::Queued | JobStatus::Running => {
                    debug!("{platform} run pending (poll {attempt}/{})", self.config.max_attempts);
                    sleep(self.config.interval).await;
                }
            }
        }

        Err(Error::AttemptsExhausted(self.config.max_attempts))
    }

    /// Resolve every requested platform independently. A platform that
    /// fails lands in the report as its error payload; successes are
    /// untouched by sibling failures.
    pub async fn fetch_all(&self, request: &FetchRequest) -> AnalyticsReport {
        let mut platforms = PlatformReports::default();

        let (youtube, instagram, tiktok) = tokio::join!(
            self.fetch_optional(Platform::Youtube, request.handle(Platform::Youtube)),
            self.fetch_optional(Platform::Instagram, request.handle(Platform::Instagram)),
            self.fetch_optional(Platform::Tiktok, request.handle(Platform::Tiktok)),
        );
        if let Some(outcome) = youtube {
            platforms.set(Platform::Youtube, outcome);
        }
        if let Some(outcome) = instagram {
            platforms.set(Platform::Instagram, outcome);
        }
        if let Some(outcome) = tiktok {
            platforms.set(Platform::Tiktok, outcome);
        }

        AnalyticsReport {
            user: UserInfo {
                name: request.name.clone(),
                email: request.email.clone(),
            },
            platforms,
            fetched_at: Utc::now(),
        }
    }

    async fn fetch_optional(
        &self,
        platform: Platform,
        handle: Option<&str>,
    ) -> Option<PlatformOutcome> {
        let handle = handle?;
        match self.fetch_platform(platform, handle).await {
            Ok(metrics) => Some(PlatformOutcome::Metrics(metrics)),
            Err(err) => {
                warn!("{platform} fetch failed: {err}");
                Some(PlatformOutcome::Error {
                    error: err.to_string(),
                })
            }
        }
    }
}
