use crate::{
    transfer::CandidateCatalog,
    types::{CandidateTrack, SearchResponse},
};

use super::SpotifyClient;

/// Spotify's page size ceiling for `/search`.
const MAX_SEARCH_LIMIT: usize = 50;

/// Builds the `q` parameter. An artist hint becomes an `artist:` filter.
pub fn search_query(query: &str, artist_hint: Option<&str>) -> String {
    match artist_hint.map(str::trim).filter(|a| !a.is_empty()) {
        Some(artist) => format!("{} artist:{}", query.trim(), artist),
        None => query.trim().to_string(),
    }
}

impl SpotifyClient {
    /// One `/search?type=track` request.
    pub async fn search_tracks(&self, q: &str, limit: usize) -> crate::Res<Vec<CandidateTrack>> {
        let token = self.access_token().await?;
        let url = self.url("/search");
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT).to_string();

        let response: SearchResponse = self
            .retry
            .send_json(|| {
                self.get(&url, &token).query(&[
                    ("q", q),
                    ("type", "track"),
                    ("limit", limit.as_str()),
                ])
            })
            .await?;

        Ok(response
            .tracks
            .items
            .into_iter()
            .map(CandidateTrack::from)
            .collect())
    }
}

impl CandidateCatalog for SpotifyClient {
    /// Searches with the artist filter first and retries once without it when
    /// that finds nothing. Errors end the lookup as a miss.
    async fn search(
        &self,
        query: &str,
        artist_hint: Option<&str>,
        limit: usize,
    ) -> Vec<CandidateTrack> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let filtered = search_query(query, artist_hint);
        let result = match self.search_tracks(&filtered, limit).await {
            Ok(tracks) if tracks.is_empty() && filtered != query.trim() => {
                tracing::debug!(query, "no hit with artist filter, retrying without");
                self.search_tracks(query.trim(), limit).await
            }
            other => other,
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(query, error = %e, "track search failed");
            Vec::new()
        })
    }
}
