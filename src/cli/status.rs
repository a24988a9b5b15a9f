use crate::{config, info, management::TokenManager, success, warning};

/// Reports which parts of the configuration and authorization are in place.
pub async fn status() {
    info!("Data directory: {}", config::data_dir().display());

    match config::youtube_api_key() {
        Ok(_) => success!("YouTube API key configured"),
        Err(e) => warning!("YouTube: {}", e),
    }

    match config::spotify_client_id() {
        Ok(_) => success!("Spotify client id configured"),
        Err(e) => warning!("Spotify: {}", e),
    }

    match (config::http_timeout(), config::ssl_verify(), config::retry_policy()) {
        (Ok(timeout), Ok(verify), Ok(retry)) => info!(
            "HTTP timeout {}s, TLS verification {}, up to {} attempts per request",
            timeout.as_secs(),
            if verify { "on" } else { "off" },
            retry.max_attempts
        ),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => warning!("Network settings: {}", e),
    }

    match TokenManager::load().await {
        Ok(manager) if manager.is_expired() => {
            warning!("Spotify token expired; it will be refreshed on the next transfer")
        }
        Ok(_) => success!("Spotify token cached and valid"),
        Err(e) => warning!("{}", e),
    }
}
