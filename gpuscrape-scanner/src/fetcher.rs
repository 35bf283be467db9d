use crate::agent::{USER_AGENTS, UserAgentMode};
use crate::error::{Result, ScanError};
use crate::pacer::PauseRange;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// What to do when a GET fails or comes back with anything but 200.
#[derive(Debug, Clone)]
pub enum RetryPolicy {
    /// Log and abandon the URL.
    FailFast,
    /// Wait a fixed time and retry on 429; abandon on anything else.
    WaitOn429 { wait: Duration },
    /// Retry every failure, sleeping `base^retries + jitter` seconds.
    /// Without `max_retries` this never gives up.
    Backoff {
        base: f64,
        jitter: PauseRange,
        max_retries: Option<u32>,
        max_delay: Option<Duration>,
    },
}

impl RetryPolicy {
    /// Unbounded exponential backoff with jitter, no caps.
    pub fn backoff(base: f64, jitter: PauseRange) -> Self {
        RetryPolicy::Backoff {
            base,
            jitter,
            max_retries: None,
            max_delay: None,
        }
    }

    /// Delay before retry number `retries` (1-based). Zero for policies
    /// that do not back off.
    pub fn backoff_delay(&self, retries: u32) -> Duration {
        match self {
            RetryPolicy::Backoff {
                base,
                jitter,
                max_delay,
                ..
            } => {
                let exp = base.max(0.0).powi(retries.min(i32::MAX as u32) as i32);
                let mut exp = Duration::try_from_secs_f64(exp).unwrap_or(Duration::MAX);
                if let Some(cap) = max_delay {
                    exp = exp.min(*cap);
                }
                exp.saturating_add(jitter.sample())
            }
            RetryPolicy::WaitOn429 { wait } => *wait,
            RetryPolicy::FailFast => Duration::ZERO,
        }
    }
}

/// Sequential HTTP GET with user-agent rotation and a retry policy.
pub struct Fetcher {
    client: Client,
    user_agent: UserAgentMode,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            user_agent: UserAgentMode::per_process(&USER_AGENTS[..3]),
            policy: RetryPolicy::FailFast,
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_user_agent(mut self, user_agent: UserAgentMode) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// One GET. Anything other than 200 is an error.
    pub async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.next())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScanError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    /// GET `url` under the configured retry policy.
    ///
    /// An `Err` means the URL was abandoned and the caller should skip it.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let mut retries = 0u32;

        loop {
            debug!("GET {}", url);
            let err = match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) => e,
            };

            match &self.policy {
                RetryPolicy::FailFast => {
                    warn!("Request for {} failed: {}", url, err);
                    return Err(err);
                }
                RetryPolicy::WaitOn429 { wait } => {
                    if err.status() != Some(429) {
                        warn!("Request for {} failed: {}", url, err);
                        return Err(err);
                    }
                    retries += 1;
                    warn!(
                        "Received 429 Too Many Requests for {}. Retrying in {:.0}s (attempt {})",
                        url,
                        wait.as_secs_f64(),
                        retries
                    );
                    sleep(*wait).await;
                }
                RetryPolicy::Backoff { max_retries, .. } => {
                    retries += 1;
                    if let Some(max) = max_retries
                        && retries > *max
                    {
                        warn!("Giving up on {} after {} retries: {}", url, max, err);
                        return Err(ScanError::RetriesExhausted(*max));
                    }
                    let delay = self.policy.backoff_delay(retries);
                    warn!(
                        "Request for {} failed: {}. Retrying in {:.2}s (retry {})",
                        url,
                        err,
                        delay.as_secs_f64(),
                        retries
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
