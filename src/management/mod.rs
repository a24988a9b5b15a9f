//! Local state kept between runs. Currently only the Spotify token cache.

mod auth;

pub use auth::TokenManager;
