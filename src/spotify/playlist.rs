use crate::{
    error::WriteError,
    transfer::DestinationWriter,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUser, Paging, PlaylistRef, SimplePlaylist,
    },
};

use super::SpotifyClient;

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

impl SpotifyClient {
    /// The user the cached token belongs to.
    pub async fn current_user(&self) -> crate::Res<CurrentUser> {
        let token = self.access_token().await?;
        let url = self.url("/me");
        let user = self.retry.send_json(|| self.get(&url, &token)).await?;
        Ok(user)
    }

    /// Looks through the user's playlists for one named exactly `name`.
    pub async fn find_playlist(&self, name: &str) -> crate::Res<Option<PlaylistRef>> {
        let token = self.access_token().await?;
        let mut next = Some(format!("{}?limit=50", self.url("/me/playlists")));

        while let Some(url) = next {
            let page: Paging<Option<SimplePlaylist>> =
                self.retry.send_json(|| self.get(&url, &token)).await?;

            if let Some(found) = page.items.into_iter().flatten().find(|p| p.name == name) {
                return Ok(Some(PlaylistRef {
                    id: found.id,
                    name: found.name,
                    url: None,
                }));
            }
            next = page.next;
        }

        Ok(None)
    }

    pub async fn exists(&self, name: &str) -> crate::Res<bool> {
        Ok(self.find_playlist(name).await?.is_some())
    }
}

impl DestinationWriter for SpotifyClient {
    async fn create_playlist(
        &self,
        owner: &str,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRef, WriteError> {
        let token = self.access_token().await?;
        let url = self.url(&format!("/users/{}/playlists", owner));
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: self.public_playlists,
            collaborative: false,
        };

        let response = self
            .retry
            .send_write(|| self.post(&url, &token).json(&body))
            .await?;
        let created: CreatePlaylistResponse = response
            .json()
            .await
            .map_err(|e| WriteError::Other(e.to_string()))?;

        tracing::info!(id = %created.id, name = %created.name, "created playlist");
        Ok(PlaylistRef {
            id: created.id,
            name: created.name,
            url: created.external_urls.spotify,
        })
    }

    async fn add_tracks(&self, playlist: &PlaylistRef, track_ids: &[String]) -> Result<(), WriteError> {
        let token = self.access_token().await?;
        let url = self.url(&format!("/playlists/{}/tracks", playlist.id));
        let body = AddTrackToPlaylistRequest {
            uris: track_ids.iter().map(|id| track_uri(id)).collect(),
        };

        let response = self
            .retry
            .send_write(|| self.post(&url, &token).json(&body))
            .await?;
        let added: AddTrackToPlaylistResponse = response
            .json()
            .await
            .map_err(|e| WriteError::Other(e.to_string()))?;

        tracing::debug!(playlist = %playlist.id, count = track_ids.len(), snapshot = %added.snapshot_id, "tracks added");
        Ok(())
    }
}
