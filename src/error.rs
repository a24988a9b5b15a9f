//! Error types for every boundary of the transfer pipeline.
//!
//! Per-item lookup misses are not errors: they are recorded as
//! [`MatchOutcome::NotFound`](crate::types::MatchOutcome) and reported in
//! the transfer report. Everything in this module is a hard failure for the
//! operation that produced it.

use reqwest::StatusCode;
use thiserror::Error;

/// The playlist reference given by the user could not be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("playlist reference is empty")]
    Empty,
    #[error("no playlist id found in '{0}'")]
    Unrecognized(String),
}

/// Failures of the playlist lister. Surfaced to the caller, never caught by
/// the orchestrator.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("playlist '{0}' not found")]
    NotFound(String),
    #[error("YouTube rejected the credentials: {0}")]
    Auth(String),
    #[error("YouTube request failed: {0}")]
    Transient(String),
}

/// Low-level failure of a single API call after the retry policy gave up.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }
}

impl From<ApiError> for ListError {
    fn from(err: ApiError) -> Self {
        match err.status() {
            Some(StatusCode::NOT_FOUND) => ListError::NotFound(err.to_string()),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN) => {
                ListError::Auth(err.to_string())
            }
            _ => ListError::Transient(err.to_string()),
        }
    }
}

/// A write to the destination playlist did not succeed.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("destination rejected the request: {0}")]
    Api(#[from] ApiError),
    #[error("not authorized: {0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Other(String),
}

/// Whole-run failure of a transfer. No report is produced.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("writing batch {batch} of {batches} failed: {source}")]
    Write {
        batch: usize,
        batches: usize,
        #[source]
        source: WriteError,
    },
}

/// Spotify authorization failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no cached token, run `yt2spot auth` first ({0})")]
    MissingToken(String),
    #[error("token exchange failed: {0}")]
    Exchange(String),
    #[error("token refresh failed: {0}")]
    Refresh(String),
    #[error("token cache error: {0}")]
    Cache(String),
}

/// Invalid or missing configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}
