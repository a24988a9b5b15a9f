use std::future::Future;

use crate::{
    error::{ListError, WriteError},
    types::{CandidateTrack, PlaylistRef, SourceItem},
};

/// Lists the items of a source playlist.
///
/// Implementations page to completion and drop removed or private entries
/// before returning.
pub trait PlaylistLister {
    fn list(
        &self,
        playlist_id: &str,
    ) -> impl Future<Output = Result<Vec<SourceItem>, ListError>> + Send;
}

/// Searches the destination catalog.
///
/// Returns at most `limit` candidates, best first. Failures that survive the
/// implementation's own retries are reported as an empty result: a failed
/// lookup is a miss, not an error.
pub trait CandidateCatalog {
    fn search(
        &self,
        query: &str,
        artist_hint: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Vec<CandidateTrack>> + Send;
}

/// Creates and fills destination playlists.
pub trait DestinationWriter {
    fn create_playlist(
        &self,
        owner: &str,
        name: &str,
        description: &str,
    ) -> impl Future<Output = Result<PlaylistRef, WriteError>> + Send;

    /// Appends `track_ids` in order. Called once per batch.
    fn add_tracks(
        &self,
        playlist: &PlaylistRef,
        track_ids: &[String],
    ) -> impl Future<Output = Result<(), WriteError>> + Send;
}
