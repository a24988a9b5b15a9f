use serde::{Deserialize, Serialize};
use tabled::Tabled;

// ---------------------------------------------------------------------------
// Domain model
// ---------------------------------------------------------------------------

/// One video of the source playlist, already filtered of removed and
/// private entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceItem {
    pub id: String,
    pub raw_title: String,
    pub channel_or_uploader: String,
}

impl SourceItem {
    pub fn new(
        id: impl Into<String>,
        raw_title: impl Into<String>,
        channel_or_uploader: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            raw_title: raw_title.into(),
            channel_or_uploader: channel_or_uploader.into(),
        }
    }
}

/// Search-friendly form of a source title. Recomputed per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub search_title: String,
    pub candidate_artist: Option<String>,
}

/// A catalog search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTrack {
    pub external_id: String,
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    Found(String),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub source_item: SourceItem,
    pub outcome: MatchOutcome,
}

/// Outcome of a whole transfer, built once from the per-item results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferReport {
    pub total_items: usize,
    pub found_ids: Vec<String>,
    pub failed_titles: Vec<String>,
    pub success_rate: f64,
}

impl TransferReport {
    /// Partitions results into found ids and failed raw titles, keeping
    /// input order in both.
    pub fn from_results(results: &[MatchResult]) -> Self {
        let mut found_ids = Vec::new();
        let mut failed_titles = Vec::new();
        for result in results {
            match &result.outcome {
                MatchOutcome::Found(id) => found_ids.push(id.clone()),
                MatchOutcome::NotFound => failed_titles.push(result.source_item.raw_title.clone()),
            }
        }

        let total_items = results.len();
        let success_rate = if total_items == 0 {
            0.0
        } else {
            found_ids.len() as f64 / total_items as f64
        };

        Self {
            total_items,
            found_ids,
            failed_titles,
            success_rate,
        }
    }
}

/// Destination playlist handle returned by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

/// Basic information about the source playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcePlaylist {
    pub id: String,
    pub title: String,
    pub description: String,
    pub item_count: u64,
    pub channel_title: String,
}

#[derive(Tabled)]
pub struct FailedTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
}

#[derive(Tabled)]
pub struct InspectTableRow {
    pub field: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Spotify authorization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Raw token endpoint response. `refresh_token` is omitted on refreshes
/// that don't rotate it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
}

// ---------------------------------------------------------------------------
// Spotify Web API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub artists: Vec<SimpleArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub id: Option<String>,
    pub name: String,
}

impl From<SpotifyTrack> for CandidateTrack {
    fn from(track: SpotifyTrack) -> Self {
        let artist = track
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default();
        CandidateTrack {
            external_id: track.id,
            title: track.name,
            artist,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplePlaylist {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// YouTube Data API v3
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub id: String,
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    pub video_owner_channel_title: Option<String>,
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistResource>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResource {
    pub id: String,
    pub snippet: PlaylistSnippet,
    pub content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistContentDetails {
    #[serde(default)]
    pub item_count: u64,
}
