use axum::{Extension, Router, routing::get};
use std::{io, net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, types::PkceToken};

/// Routes of the local authorization server.
pub fn router(state: Arc<Mutex<Option<PkceToken>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves the callback routes on `SERVER_ADDRESS` until the process exits.
pub async fn start_api_server(state: Arc<Mutex<Option<PkceToken>>>) -> io::Result<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::debug!(%addr, "callback server listening");
    axum::serve(listener, router(state)).await
}
