//! Bounded HTTP probes
//!
//! Any status code is data here. Only transport problems, oversized bodies
//! and redirects into private networks become a [`FetchFailure`].

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use thiserror::Error;
use url::Url;

use crate::validation::non_public_host;

use super::config::AuditConfig;
use super::errors::{AuditError, AuditResult};

/// Response captured from the primary request
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
    /// Time until response headers arrived
    pub elapsed: Duration,
}

impl FetchedPage {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Transport-level failure of a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Timeout,
    /// Name resolution failed
    HostNotFound,
    /// Connection refused or reset
    Unreachable,
    TooManyRedirects,
    /// A redirect pointed at a loopback, private or link-local host
    BlockedRedirect(String),
    /// Body exceeded the configured limit
    TooLarge { limit: usize },
    Other(String),
}

/// Redirect-policy error for a hop into a non-public host
#[derive(Debug, Error)]
#[error("redirect to non-public host {0}")]
struct NonPublicRedirect(String);

impl FetchFailure {
    fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchFailure::Timeout;
        }
        if err.is_redirect() {
            if let Some(blocked) = find_source::<NonPublicRedirect>(err) {
                return FetchFailure::BlockedRedirect(blocked.0.clone());
            }
            return FetchFailure::TooManyRedirects;
        }
        if err.is_connect() {
            if mentions_dns(err) {
                return FetchFailure::HostNotFound;
            }
            return FetchFailure::Unreachable;
        }
        if mentions_dns(err) {
            return FetchFailure::HostNotFound;
        }
        FetchFailure::Other(err.to_string())
    }

    /// Remediation message shown to the participant
    pub fn remediation(&self) -> String {
        match self {
            FetchFailure::Timeout => {
                "Your project took too long to respond. Make sure it is deployed and not sleeping, then resubmit.".to_string()
            }
            FetchFailure::HostNotFound => {
                "We could not find that domain. Check the link for typos and confirm the deployment is live.".to_string()
            }
            FetchFailure::Unreachable => {
                "We could not connect to your project. Make sure the server is running and publicly reachable.".to_string()
            }
            FetchFailure::TooManyRedirects => {
                "Your project redirected too many times. Check for a redirect loop and resubmit.".to_string()
            }
            FetchFailure::BlockedRedirect(host) => {
                format!("Your project redirected to {}, which is not publicly reachable. Submit the public deployment URL.", host)
            }
            FetchFailure::TooLarge { limit } => {
                format!("Your project's response was larger than {} KB. Serve a lighter landing page and resubmit.", limit / 1024)
            }
            FetchFailure::Other(detail) => {
                format!("We could not reach your project ({}). Check the deployment and resubmit.", detail)
            }
        }
    }
}

fn find_source<'a, T: StdError + 'static>(err: &'a reqwest::Error) -> Option<&'a T> {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(inner) = source {
        if let Some(found) = inner.downcast_ref::<T>() {
            return Some(found);
        }
        source = inner.source();
    }
    None
}

fn mentions_dns(err: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(inner) = source {
        let text = inner.to_string().to_ascii_lowercase();
        if text.contains("dns") || text.contains("failed to lookup") || text.contains("name or service not known") {
            return true;
        }
        source = inner.source();
    }
    false
}

/// HTTP client with the audit's timeout and redirect bounds
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    max_body_bytes: usize,
}

/// Follows up to `max` redirects, refusing any hop into a non-public host
fn redirect_policy(max: usize) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max {
            return attempt.error("too many redirects");
        }
        match non_public_host(attempt.url()) {
            Some(host) => attempt.error(NonPublicRedirect(host)),
            None => attempt.follow(),
        }
    })
}

impl Prober {
    pub fn new(config: &AuditConfig) -> AuditResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(redirect_policy(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AuditError::Client(e.to_string()))?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// GET the target and read its body
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchFailure> {
        let started = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchFailure::classify(&e))?;
        let elapsed = started.elapsed();

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = self.read_body(response).await?;

        Ok(FetchedPage {
            status,
            headers,
            body,
            elapsed,
        })
    }

    /// Read the body chunk by chunk, stopping at the size limit
    async fn read_body(&self, mut response: Response) -> Result<String, FetchFailure> {
        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchFailure::TooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchFailure::classify(&e))?
        {
            if body.len() + chunk.len() > limit {
                return Err(FetchFailure::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// GET without reading the body, returning the status
    pub async fn status_of(&self, url: &Url) -> Result<u16, FetchFailure> {
        self.client
            .get(url.clone())
            .send()
            .await
            .map(|r| r.status().as_u16())
            .map_err(|e| FetchFailure::classify(&e))
    }

    /// POST a JSON payload, returning the status
    pub async fn post_json(
        &self,
        url: &Url,
        payload: &serde_json::Value,
    ) -> Result<u16, FetchFailure> {
        self.client
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map(|r| r.status().as_u16())
            .map_err(|e| FetchFailure::classify(&e))
    }
}
