//! # Spotify Integration
//!
//! Spotify Web API client used as the destination side of a transfer. It
//! implements both collaborator traits the transfer core needs:
//!
//! - [`CandidateCatalog`](crate::transfer::CandidateCatalog) via track search
//!   (`GET /search`), see [`search`].
//! - [`DestinationWriter`](crate::transfer::DestinationWriter) via playlist
//!   creation and track insertion, see [`playlist`].
//!
//! Authorization is OAuth 2.0 with PKCE ([`auth`]); the resulting token is
//! cached by [`TokenManager`] and refreshed transparently before it expires.
//!
//! ```text
//! Transfer core
//!      ↓  (traits)
//! SpotifyClient ── RetryPolicy ── reqwest
//!      ↓
//! TokenManager (cache/token.json)
//! ```
//!
//! The client is an explicit value handed to the transfer, never a global.
//! Every request goes through the injected [`RetryPolicy`], which handles
//! `429 Too Many Requests` and gateway errors.
//!
//! ## Endpoints
//!
//! - `GET /me` - owner of the token, used when `SPOTIFY_USER_ID` is unset
//! - `GET /me/playlists` - duplicate name check
//! - `GET /search?type=track` - candidate lookup
//! - `POST /users/{user_id}/playlists` - create the destination playlist
//! - `POST /playlists/{playlist_id}/tracks` - add up to 100 tracks
//! - `POST /api/token` - code exchange and refresh

pub mod auth;
pub mod playlist;
pub mod search;

use reqwest::{Client, RequestBuilder};
use tokio::sync::Mutex;

use crate::{config, error::AuthError, http::RetryPolicy, management::TokenManager};

pub struct SpotifyClient {
    http: Client,
    api_url: String,
    retry: RetryPolicy,
    tokens: Mutex<TokenManager>,
    public_playlists: bool,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: String, retry: RetryPolicy, tokens: TokenManager) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            retry,
            tokens: Mutex::new(tokens),
            public_playlists: true,
        }
    }

    /// Builds a client from configuration and the cached token.
    pub async fn from_env() -> crate::Res<Self> {
        let tokens = TokenManager::load().await?;
        Ok(Self::new(
            config::http_client()?,
            config::spotify_apiurl(),
            config::retry_policy()?,
            tokens,
        ))
    }

    /// Whether playlists created by this client are public.
    pub fn with_public_playlists(mut self, public: bool) -> Self {
        self.public_playlists = public;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn access_token(&self) -> Result<String, AuthError> {
        self.tokens.lock().await.get_valid_token(&self.http).await
    }

    /// GET builder with bearer auth, for use inside retry closures.
    fn get(&self, url: &str, token: &str) -> RequestBuilder {
        self.http.get(url).bearer_auth(token)
    }

    fn post(&self, url: &str, token: &str) -> RequestBuilder {
        self.http.post(url).bearer_auth(token)
    }
}
