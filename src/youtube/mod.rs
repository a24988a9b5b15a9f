//! # YouTube Integration
//!
//! Read-only YouTube Data API v3 client, authenticated with an API key. It is
//! the source side of a transfer and implements
//! [`PlaylistLister`](crate::transfer::PlaylistLister).
//!
//! Listing pages through `playlistItems.list` 50 items at a time until
//! `nextPageToken` runs out and drops entries YouTube reports as
//! "Deleted video" or "Private video".

mod reference;

pub use reference::{extract_playlist_id, is_playlist_url};

use reqwest::Client;

use crate::{
    config,
    error::ListError,
    http::RetryPolicy,
    transfer::PlaylistLister,
    types::{PlaylistItem, PlaylistItemListResponse, PlaylistListResponse, SourceItem, SourcePlaylist},
};

/// Titles YouTube substitutes for entries that can no longer be played.
pub const UNAVAILABLE_TITLES: [&str; 2] = ["Deleted video", "Private video"];

const PAGE_SIZE: usize = 50;

pub struct YouTubeClient {
    http: Client,
    api_url: String,
    api_key: String,
    retry: RetryPolicy,
    max_items: Option<usize>,
}

impl YouTubeClient {
    pub fn new(http: Client, api_url: String, api_key: String, retry: RetryPolicy) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            retry,
            max_items: None,
        }
    }

    pub fn from_env() -> crate::Res<Self> {
        Ok(Self::new(
            config::http_client()?,
            config::youtube_api_url(),
            config::youtube_api_key()?,
            config::retry_policy()?,
        ))
    }

    /// Stops listing once `max` playable items were collected.
    pub fn with_max_items(mut self, max: Option<usize>) -> Self {
        self.max_items = max;
        self
    }

    /// Title, description and size of a playlist.
    pub async fn playlist_info(&self, playlist_id: &str) -> Result<SourcePlaylist, ListError> {
        let url = format!("{}/playlists", self.api_url);
        let response: PlaylistListResponse = self
            .retry
            .send_json(|| {
                self.http.get(&url).query(&[
                    ("part", "snippet,contentDetails"),
                    ("id", playlist_id),
                    ("key", self.api_key.as_str()),
                ])
            })
            .await?;

        let playlist = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ListError::NotFound(playlist_id.to_string()))?;

        Ok(SourcePlaylist {
            id: playlist.id,
            title: playlist.snippet.title,
            description: playlist.snippet.description,
            item_count: playlist.content_details.map(|d| d.item_count).unwrap_or(0),
            channel_title: playlist.snippet.channel_title,
        })
    }

    async fn page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, ListError> {
        let url = format!("{}/playlistItems", self.api_url);
        let page_size = PAGE_SIZE.to_string();

        let response = self
            .retry
            .send_json(|| {
                let request = self.http.get(&url).query(&[
                    ("part", "snippet"),
                    ("playlistId", playlist_id),
                    ("maxResults", page_size.as_str()),
                    ("key", self.api_key.as_str()),
                ]);
                match page_token {
                    Some(token) => request.query(&[("pageToken", token)]),
                    None => request,
                }
            })
            .await?;
        Ok(response)
    }
}

impl PlaylistLister for YouTubeClient {
    async fn list(&self, playlist_id: &str) -> Result<Vec<SourceItem>, ListError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.page(playlist_id, page_token.as_deref()).await?;
            items.extend(page.items.into_iter().filter_map(source_item));

            if let Some(max) = self.max_items {
                if items.len() >= max {
                    items.truncate(max);
                    break;
                }
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::info!(playlist = playlist_id, count = items.len(), "listed playlist");
        Ok(items)
    }
}

/// Maps a playlist entry to a source item; `None` for unavailable videos.
pub fn source_item(item: PlaylistItem) -> Option<SourceItem> {
    let snippet = item.snippet;
    if UNAVAILABLE_TITLES.contains(&snippet.title.as_str()) {
        return None;
    }

    let id = snippet
        .resource_id
        .and_then(|r| r.video_id)
        .unwrap_or(item.id);
    let uploader = snippet
        .video_owner_channel_title
        .filter(|c| !c.is_empty())
        .unwrap_or(snippet.channel_title);

    Some(SourceItem {
        id,
        raw_title: snippet.title,
        channel_or_uploader: uploader,
    })
}
