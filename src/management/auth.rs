use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{config, error::AuthError, spotify, types::Token};

/// Refresh this many seconds before the token actually expires.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Owns the cached Spotify token and keeps it fresh.
pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            path: Self::token_path(),
        }
    }

    /// Uses `path` instead of the default cache location.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    pub async fn load() -> Result<Self, AuthError> {
        Self::load_from(Self::token_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self, AuthError> {
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| AuthError::MissingToken(e.to_string()))?;
        let token: Token =
            serde_json::from_str(&content).map_err(|e| AuthError::Cache(e.to_string()))?;
        Ok(Self { token, path })
    }

    pub async fn persist(&self) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::Cache(e.to_string()))?;
        }

        let json =
            serde_json::to_string_pretty(&self.token).map_err(|e| AuthError::Cache(e.to_string()))?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| AuthError::Cache(e.to_string()))
    }

    /// Returns an access token, refreshing and re-persisting it first when it
    /// is about to expire.
    pub async fn get_valid_token(&mut self, http: &Client) -> Result<String, AuthError> {
        if self.is_expired() {
            tracing::debug!("access token expired, refreshing");
            let fresh = spotify::auth::refresh_token(
                http,
                &config::spotify_apitoken_url(),
                &self.token.refresh_token,
            )
            .await?;
            self.token = fresh;
            if let Err(e) = self.persist().await {
                tracing::warn!(error = %e, "could not persist refreshed token");
            }
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp().max(0) as u64;
        let expires_at = self.token.obtained_at + self.token.expires_in;
        now >= expires_at.saturating_sub(EXPIRY_MARGIN_SECS)
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
