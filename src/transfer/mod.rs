//! # Transfer
//!
//! Drives a playlist conversion: every source item is turned into a catalog
//! query, looked up exactly once, and recorded as found or not found. The
//! found track ids are then written to the destination playlist in ordered
//! batches.
//!
//! ```text
//! SourceItem ─▶ split/normalize ─▶ CandidateCatalog::search ─▶ accept?
//!                                                                │
//!                          TransferReport ◀── aggregate ◀────────┘
//!                                │
//!                                └─▶ DestinationWriter::add_tracks (≤100 per batch)
//! ```
//!
//! The collaborators are traits so the orchestrator can run against the real
//! YouTube and Spotify clients or against in-memory fakes. Retries, rate
//! limits and pagination live inside the collaborators; this layer never
//! retries.
//!
//! ## Write failures
//!
//! A failing batch aborts the run with [`TransferError::Write`]; no report is
//! returned. Batches already written stay in the destination playlist.

mod collaborators;

pub use collaborators::{CandidateCatalog, DestinationWriter, PlaylistLister};

use std::sync::Arc;

use indicatif::ProgressBar;

use crate::{
    error::TransferError,
    matching,
    types::{CandidateTrack, MatchOutcome, MatchResult, PlaylistRef, SourceItem, TransferReport},
    warning,
};

/// Platform ceiling for tracks per add request.
pub const MAX_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct TransferOptions {
    /// Candidates requested per lookup. With 1 the top hit is accepted as is.
    pub candidates: usize,
    /// Minimum score for a candidate when more than one is requested.
    pub acceptance_threshold: f64,
    /// Tracks per write request, clamped to `1..=MAX_BATCH_SIZE`.
    pub batch_size: usize,
    /// Lookups in flight at once. 1 is fully sequential.
    pub concurrency: usize,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            candidates: 1,
            acceptance_threshold: 0.0,
            batch_size: MAX_BATCH_SIZE,
            concurrency: 1,
        }
    }
}

impl TransferOptions {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_BATCH_SIZE)
    }
}

pub struct Transfer<C, W> {
    catalog: Arc<C>,
    writer: Arc<W>,
    options: TransferOptions,
    progress: ProgressBar,
}

impl<C, W> Transfer<C, W>
where
    C: CandidateCatalog + Send + Sync + 'static,
    W: DestinationWriter + Send + Sync + 'static,
{
    pub fn new(catalog: Arc<C>, writer: Arc<W>, options: TransferOptions) -> Self {
        Self {
            catalog,
            writer,
            options,
            progress: ProgressBar::hidden(),
        }
    }

    /// Reports per-item progress on `progress` instead of a hidden bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    /// Matches every item, then writes the found tracks to `playlist`.
    pub async fn run(
        &self,
        items: &[SourceItem],
        playlist: &PlaylistRef,
    ) -> Result<TransferReport, TransferError> {
        let results = self.match_items(items).await;
        let report = TransferReport::from_results(&results);

        tracing::info!(
            total = report.total_items,
            found = report.found_ids.len(),
            failed = report.failed_titles.len(),
            "matching complete"
        );

        self.write(playlist, &report.found_ids).await?;
        Ok(report)
    }

    /// Looks every item up once and returns one result per item, in input
    /// order.
    ///
    /// Items are processed in windows of `concurrency` spawned lookups. Each
    /// result goes into the slot of its input index, so completion order never
    /// leaks into the output. A panicking lookup panics here as well.
    pub async fn match_items(&self, items: &[SourceItem]) -> Vec<MatchResult> {
        let window = self.options.concurrency.max(1);
        let mut slots: Vec<Option<MatchOutcome>> = vec![None; items.len()];

        self.progress.set_length(items.len() as u64);

        for (window_index, chunk) in items.chunks(window).enumerate() {
            let mut handles = Vec::with_capacity(chunk.len());

            for (offset, item) in chunk.iter().enumerate() {
                let index = window_index * window + offset;
                let catalog = Arc::clone(&self.catalog);
                let item = item.clone();
                let candidates = self.options.candidates.max(1);
                let threshold = self.options.acceptance_threshold;

                let handle = tokio::spawn(async move {
                    lookup(catalog.as_ref(), &item, candidates, threshold).await
                });
                handles.push((index, handle));
            }

            for (index, handle) in handles {
                let outcome = match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                    Err(e) => {
                        tracing::error!(title = %items[index].raw_title, error = %e, "lookup task cancelled");
                        warning!("Lookup task for '{}' failed: {}", items[index].raw_title, e);
                        MatchOutcome::NotFound
                    }
                };
                slots[index] = Some(outcome);
                self.progress.inc(1);
            }
        }

        self.progress.finish_and_clear();

        items
            .iter()
            .zip(slots)
            .map(|(item, outcome)| MatchResult {
                source_item: item.clone(),
                outcome: outcome.unwrap_or(MatchOutcome::NotFound),
            })
            .collect()
    }

    /// Writes `track_ids` to `playlist` in sequential batches. Nothing is
    /// sent when `track_ids` is empty.
    pub async fn write(
        &self,
        playlist: &PlaylistRef,
        track_ids: &[String],
    ) -> Result<(), TransferError> {
        if track_ids.is_empty() {
            tracing::info!("no tracks to write");
            return Ok(());
        }

        let batch_size = self.options.effective_batch_size();
        let batches = track_ids.len().div_ceil(batch_size);

        for (i, chunk) in track_ids.chunks(batch_size).enumerate() {
            let batch = i + 1;
            if let Err(source) = self.writer.add_tracks(playlist, chunk).await {
                tracing::error!(batch, batches, error = %source, "batch write failed");
                return Err(TransferError::Write {
                    batch,
                    batches,
                    source,
                });
            }
            tracing::debug!(batch, batches, size = chunk.len(), "batch written");
        }

        Ok(())
    }
}

/// One catalog call for one item, reduced to an outcome.
async fn lookup<C: CandidateCatalog>(
    catalog: &C,
    item: &SourceItem,
    candidates: usize,
    threshold: f64,
) -> MatchOutcome {
    let query = matching::query_for(item);
    let found = catalog
        .search(
            &query.search_title,
            query.candidate_artist.as_deref(),
            candidates,
        )
        .await;

    match select_candidate(&item.raw_title, found, candidates, threshold) {
        Some(track) => {
            tracing::debug!(title = %item.raw_title, track = %track.title, artist = %track.artist, "found");
            MatchOutcome::Found(track.external_id)
        }
        None => {
            tracing::debug!(title = %item.raw_title, query = %query.search_title, "not found");
            MatchOutcome::NotFound
        }
    }
}

/// Picks the accepted candidate, if any.
///
/// With a single requested candidate the first hit is accepted without
/// scoring. Otherwise the best score at or above `threshold` wins, the
/// earliest candidate on ties.
pub fn select_candidate(
    raw_title: &str,
    found: Vec<CandidateTrack>,
    requested: usize,
    threshold: f64,
) -> Option<CandidateTrack> {
    if requested <= 1 {
        return found.into_iter().next();
    }

    let mut best: Option<(f64, CandidateTrack)> = None;
    for candidate in found {
        let s = matching::score(raw_title, &candidate);
        if s < threshold {
            continue;
        }
        if best.as_ref().is_none_or(|(best_score, _)| s > *best_score) {
            best = Some((s, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}
