use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config, error, info, success,
    spotify::SpotifyClient,
    transfer::{DestinationWriter, PlaylistLister, Transfer, TransferOptions},
    types::{PlaylistRef, TransferReport},
    utils, warning,
    youtube::{self, YouTubeClient},
};

/// Everything the `transfer` command needs besides the clients.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub playlist: String,
    pub name: Option<String>,
    pub private: bool,
    pub max_items: Option<usize>,
    pub dry_run: bool,
    pub force: bool,
    pub json: bool,
    pub options: TransferOptions,
}

pub async fn transfer(request: TransferRequest) {
    let playlist_id = match youtube::extract_playlist_id(&request.playlist) {
        Ok(id) => id,
        Err(e) => error!("{}", e),
    };

    let youtube = match YouTubeClient::from_env() {
        Ok(client) => client.with_max_items(request.max_items),
        Err(e) => error!("Cannot set up YouTube client: {}", e),
    };

    info!("Fetching YouTube playlist {}...", playlist_id);
    let source = match youtube.playlist_info(&playlist_id).await {
        Ok(source) => source,
        Err(e) => error!("{}", e),
    };
    let items = match youtube.list(&playlist_id).await {
        Ok(items) => items,
        Err(e) => error!("{}", e),
    };

    if items.is_empty() {
        warning!("Playlist '{}' has no playable videos.", source.title);
        return;
    }
    info!("Found {} videos in '{}'", items.len(), source.title);

    let spotify = match SpotifyClient::from_env().await {
        Ok(client) => Arc::new(client.with_public_playlists(!request.private)),
        Err(e) => error!("Cannot set up Spotify client: {}. Run `auth` first.", e),
    };

    let transfer = Transfer::new(
        Arc::clone(&spotify),
        Arc::clone(&spotify),
        request.options.clone(),
    )
    .with_progress(progress_bar(items.len()));

    if request.dry_run {
        let results = transfer.match_items(&items).await;
        let report = TransferReport::from_results(&results);
        print_report(&report, None, request.json);
        return;
    }

    let name = request
        .name
        .clone()
        .unwrap_or_else(|| utils::playlist_name(Some(&source.title)));

    if !request.force {
        match spotify.exists(&name).await {
            Ok(true) => {
                warning!(
                    "A playlist named '{}' already exists. Use --force to create another one.",
                    name
                );
                return;
            }
            Ok(false) => {}
            Err(e) => warning!("Could not check existing playlists: {}", e),
        }
    }

    let owner = match config::spotify_user() {
        Some(user) => user,
        None => match spotify.current_user().await {
            Ok(user) => user.id,
            Err(e) => error!("Cannot resolve Spotify user: {}", e),
        },
    };

    let description = utils::playlist_description(&source.title);
    let playlist = match spotify.create_playlist(&owner, &name, &description).await {
        Ok(playlist) => playlist,
        Err(e) => error!("Failed to create playlist '{}': {}", name, e),
    };
    success!("Created Spotify playlist '{}'", playlist.name);

    match transfer.run(&items, &playlist).await {
        Ok(report) => print_report(&report, Some(&playlist), request.json),
        Err(e) => error!("Transfer aborted: {}", e),
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
    pb.set_style(style);
    pb.set_message("searching Spotify");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_report(report: &TransferReport, playlist: Option<&PlaylistRef>, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Cannot serialize report: {}", e),
        }
        return;
    }

    if let Some(playlist) = playlist {
        match &playlist.url {
            Some(url) => success!("Playlist '{}': {}", playlist.name, url),
            None => success!("Playlist '{}' updated", playlist.name),
        }
    }

    info!(
        "{} of {} tracks found ({})",
        report.found_ids.len(),
        report.total_items,
        utils::format_success_rate(report.success_rate)
    );

    if !report.failed_titles.is_empty() {
        warning!("{} titles could not be matched:", report.failed_titles.len());
        println!("{}", Table::new(utils::failed_rows(report)));
    }
}
