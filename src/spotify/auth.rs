use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    config,
    error::AuthError,
    management::TokenManager,
    server::start_api_server,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

/// How long to wait for the browser to hit the callback.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs the OAuth 2.0 PKCE flow and persists the resulting token.
///
/// 1. Generates a code verifier and its S256 challenge.
/// 2. Starts the local callback server on `SERVER_ADDRESS`.
/// 3. Opens the authorization URL in the browser (or prints it).
/// 4. Waits up to 60 seconds for the callback to exchange the code.
/// 5. Saves the token through [`TokenManager`].
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token, AuthError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorization_url(&code_challenge)?;

    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state)
        .await
        .ok_or_else(|| AuthError::Exchange("authorization timed out".to_string()))?;

    TokenManager::new(token.clone()).persist().await?;
    Ok(token)
}

/// Builds the authorize URL with all parameters percent-encoded.
pub fn authorization_url(code_challenge: &str) -> Result<Url, AuthError> {
    let client_id =
        config::spotify_client_id().map_err(|e| AuthError::Exchange(e.to_string()))?;
    let redirect_uri = config::spotify_redirect_uri();
    let scope = config::spotify_scope();
    Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", scope.as_str()),
        ],
    )
    .map_err(|e| AuthError::Exchange(e.to_string()))
}

/// HTTP client for the token endpoint, built from the same timeout and TLS
/// settings as the API clients.
pub fn token_client() -> Result<Client, AuthError> {
    config::http_client().map_err(|e| AuthError::Exchange(e.to_string()))
}

async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    let start = std::time::Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|p| p.token.clone()) {
                return Some(token);
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a fresh access token. Spotify may omit the
/// refresh token in the response, in which case the old one is kept.
pub async fn refresh_token(
    http: &Client,
    token_url: &str,
    refresh_token: &str,
) -> Result<Token, AuthError> {
    let client_id =
        config::spotify_client_id().map_err(|e| AuthError::Refresh(e.to_string()))?;

    let response = http
        .post(token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AuthError::Refresh(e.to_string()))?;

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| AuthError::Refresh(e.to_string()))?;

    Ok(into_token(body, refresh_token))
}

/// Completes the PKCE flow: trades the callback `code` plus the original
/// verifier for a token.
pub async fn exchange_code_pkce(
    http: &Client,
    code: &str,
    verifier: &str,
) -> Result<Token, AuthError> {
    let client_id =
        config::spotify_client_id().map_err(|e| AuthError::Exchange(e.to_string()))?;
    let redirect_uri = config::spotify_redirect_uri();

    let response = http
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AuthError::Exchange(e.to_string()))?;

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| AuthError::Exchange(e.to_string()))?;

    Ok(into_token(body, ""))
}

fn into_token(body: TokenResponse, previous_refresh: &str) -> Token {
    Token {
        access_token: body.access_token,
        refresh_token: body
            .refresh_token
            .unwrap_or_else(|| previous_refresh.to_string()),
        scope: body.scope,
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp().max(0) as u64,
    }
}
