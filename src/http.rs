//! Retry handling shared by the YouTube and Spotify clients.
//!
//! The policy is a plain value injected into each client at construction, so
//! the transfer core never sees retries, sleeps or rate limits.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::error::ApiError;

/// How often and how patiently a request is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Never below 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for every further attempt.
    pub base_delay: Duration,
    /// Upper bound for any single wait, including server-sent `Retry-After`.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Backoff before attempt `attempt + 1`, where `attempt` starts at 1.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Whether a response status is worth another attempt.
    pub fn is_retryable(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS
            || status == StatusCode::BAD_GATEWAY
            || status == StatusCode::SERVICE_UNAVAILABLE
            || status == StatusCode::GATEWAY_TIMEOUT
            || status == StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Sends the request built by `build`, retrying on rate limits, gateway
    /// errors and transport failures. For idempotent requests.
    ///
    /// `build` is called once per attempt because a `RequestBuilder` can only
    /// be sent once. A `Retry-After` header overrides the computed backoff;
    /// when it exceeds `max_delay` the response is returned as an error
    /// instead of blocking for minutes.
    pub async fn send<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        self.send_with(build, Idempotency::Safe).await
    }

    /// Like [`send`](Self::send) for requests that must not be replayed once
    /// the server may have processed them: only rate limits and connection
    /// failures are retried.
    pub async fn send_write<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        self.send_with(build, Idempotency::Unsafe).await
    }

    async fn send_with<F>(&self, build: F, idempotency: Idempotency) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 1;
        loop {
            let last = attempt >= self.max_attempts;
            match build().send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    if last || !idempotency.retries(status) {
                        return Err(error_from(response).await);
                    }

                    let wait = match retry_after(&response) {
                        Some(wait) if wait > self.max_delay => {
                            tracing::warn!(
                                "retry-after of {}s exceeds the {}s limit, giving up",
                                wait.as_secs(),
                                self.max_delay.as_secs()
                            );
                            return Err(error_from(response).await);
                        }
                        Some(wait) => wait,
                        None => self.backoff(attempt),
                    };
                    tracing::debug!(%status, attempt, ?wait, "retrying request");
                    sleep(wait).await;
                }
                Err(err) if !last && idempotency.retries_transport(&err) => {
                    let wait = self.backoff(attempt);
                    tracing::debug!(error = %err, attempt, ?wait, "retrying after transport error");
                    sleep(wait).await;
                }
                Err(err) => return Err(ApiError::Transport(err)),
            }
            attempt += 1;
        }
    }

    /// [`send`](Self::send) followed by JSON decoding of the body.
    pub async fn send_json<T, F>(&self, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let response = self.send(build).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Idempotency {
    Safe,
    Unsafe,
}

impl Idempotency {
    fn retries(self, status: StatusCode) -> bool {
        match self {
            Idempotency::Safe => RetryPolicy::is_retryable(status),
            Idempotency::Unsafe => status == StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn retries_transport(self, err: &reqwest::Error) -> bool {
        match self {
            Idempotency::Safe => err.is_connect() || err.is_timeout(),
            Idempotency::Unsafe => err.is_connect(),
        }
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

async fn error_from(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ApiError::Status { status, body }
}
