use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use yt2spot::{
    error::{ApiError, ListError},
    http::RetryPolicy,
    management::TokenManager,
    spotify::{SpotifyClient, search::search_query},
    transfer::{CandidateCatalog, DestinationWriter, PlaylistLister},
    types::{PlaylistRef, Token},
    youtube::YouTubeClient,
};

/// Shared state of a local test server: its base URL, what the handlers saw
/// and how often they were hit.
#[derive(Clone, Default)]
struct Recorder {
    base: String,
    seen: Arc<Mutex<Vec<String>>>,
    hits: Arc<AtomicUsize>,
}

impl Recorder {
    fn record(&self, entry: impl Into<String>) {
        self.seen.lock().unwrap().push(entry.into());
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn hit(&self) -> usize {
        self.hits.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn start<F>(routes: F) -> Recorder
where
    F: FnOnce(Router<Recorder>) -> Router<Recorder>,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let recorder = Recorder {
        base: format!("http://{}", listener.local_addr().unwrap()),
        ..Default::default()
    };
    let app = routes(Router::new()).with_state(recorder.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    recorder
}

fn http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_secs(1),
    }
}

fn spotify(base: &str) -> SpotifyClient {
    let token = Token {
        access_token: "test-token".to_string(),
        refresh_token: "refresh".to_string(),
        scope: String::new(),
        expires_in: 3600,
        obtained_at: Utc::now().timestamp() as u64,
    };
    SpotifyClient::new(http(), base.to_string(), fast_retry(), TokenManager::new(token))
}

fn youtube(base: &str) -> YouTubeClient {
    YouTubeClient::new(http(), base.to_string(), "key-123".to_string(), fast_retry())
}

fn track(id: &str, name: &str, artist: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "uri": format!("spotify:track:{}", id),
        "artists": [{ "id": "artist-id", "name": artist }]
    })
}

// ---------------------------------------------------------------------------
// Spotify catalog search
// ---------------------------------------------------------------------------

async fn search_only_bare(
    State(rec): State<Recorder>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    rec.record(q.clone());
    let items: Vec<Value> = if q.contains("artist:") {
        Vec::new()
    } else {
        vec![track("T1", "Song", "A")]
    };
    Json(json!({ "tracks": { "items": items, "next": null } }))
}

async fn search_always_hits(
    State(rec): State<Recorder>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    rec.record(params.get("q").cloned().unwrap_or_default());
    Json(json!({ "tracks": { "items": [track("T2", "Song", "A"), track("T3", "Song 2", "B")], "next": null } }))
}

async fn server_error(State(rec): State<Recorder>) -> StatusCode {
    rec.hit();
    StatusCode::INTERNAL_SERVER_ERROR
}

#[test]
fn test_search_query() {
    assert_eq!(search_query("Song", Some("A")), "Song artist:A");
    assert_eq!(search_query(" Song ", Some("  The Band ")), "Song artist:The Band");
    assert_eq!(search_query("Song", Some("  ")), "Song");
    assert_eq!(search_query("Song", None), "Song");
}

#[tokio::test]
async fn test_search_falls_back_to_bare_query() {
    let server = start(|r| r.route("/search", get(search_only_bare))).await;
    let client = spotify(&server.base);

    let found = client.search("Song", Some("A"), 1).await;

    assert_eq!(server.seen(), vec!["Song artist:A", "Song"]);
    let ids: Vec<&str> = found.iter().map(|t| t.external_id.as_str()).collect();
    assert_eq!(ids, vec!["T1"]);
    assert_eq!(found[0].artist, "A");
}

#[tokio::test]
async fn test_search_with_artist_hit_makes_one_request() {
    let server = start(|r| r.route("/search", get(search_always_hits))).await;
    let client = spotify(&server.base);

    let found = client.search("Song", Some("A"), 2).await;

    assert_eq!(server.seen(), vec!["Song artist:A"]);
    assert_eq!(found.len(), 2);
    assert_eq!(found[1].external_id, "T3");
}

#[tokio::test]
async fn test_search_without_hint_does_not_retry() {
    let server = start(|r| r.route("/search", get(search_only_bare))).await;
    let client = spotify(&server.base);

    let found = client.search("Song", None, 1).await;

    assert_eq!(server.seen(), vec!["Song"]);
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_blank_search_sends_nothing() {
    let server = start(|r| r.route("/search", get(search_always_hits))).await;
    let client = spotify(&server.base);

    assert!(client.search("   ", Some("A"), 1).await.is_empty());
    assert!(server.seen().is_empty());
}

#[tokio::test]
async fn test_search_error_is_a_miss() {
    let server = start(|r| r.route("/search", get(server_error))).await;
    let client = spotify(&server.base);

    let found = client.search("Song", Some("A"), 1).await;

    assert!(found.is_empty());
    assert_eq!(server.hits(), 3);
}

// ---------------------------------------------------------------------------
// Spotify playlists
// ---------------------------------------------------------------------------

async fn my_playlists(
    State(rec): State<Recorder>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let offset = params.get("offset").cloned().unwrap_or_default();
    rec.record(format!("offset={}", offset));
    if offset == "50" {
        Json(json!({
            "items": [{ "id": "p2", "name": "Road Trip (from YouTube)" }],
            "next": null
        }))
    } else {
        Json(json!({
            "items": [{ "id": "p1", "name": "Other" }, null],
            "next": format!("{}/me/playlists?offset=50&limit=50", rec.base)
        }))
    }
}

async fn me() -> Json<Value> {
    Json(json!({ "id": "user-1", "display_name": null }))
}

async fn create_playlist(
    State(rec): State<Recorder>,
    Path(owner): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    rec.record(format!("{}|{}|public={}", owner, auth, body["public"]));
    let name = body["name"].clone();
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "new",
            "name": name,
            "external_urls": { "spotify": "https://open.spotify.com/playlist/new" }
        })),
    )
}

async fn add_tracks(
    State(rec): State<Recorder>,
    Path(playlist): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let uris: Vec<&str> = body["uris"]
        .as_array()
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    rec.record(format!("{}:{}", playlist, uris.join(",")));
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "s1" })))
}

async fn bad_gateway(State(rec): State<Recorder>) -> StatusCode {
    rec.hit();
    StatusCode::BAD_GATEWAY
}

fn new_playlist() -> PlaylistRef {
    PlaylistRef {
        id: "new".to_string(),
        name: "Road Trip".to_string(),
        url: None,
    }
}

#[tokio::test]
async fn test_find_playlist_follows_next_pages() {
    let server = start(|r| r.route("/me/playlists", get(my_playlists))).await;
    let client = spotify(&server.base);

    let found = client.find_playlist("Road Trip (from YouTube)").await.unwrap();
    assert_eq!(found.map(|p| p.id).as_deref(), Some("p2"));
    assert_eq!(server.seen(), vec!["offset=", "offset=50"]);

    assert!(!client.exists("Missing").await.unwrap());
    assert_eq!(server.seen().len(), 4);

    // a match on the first page stops paging
    assert!(client.exists("Other").await.unwrap());
    assert_eq!(server.seen().len(), 5);
}

#[tokio::test]
async fn test_current_user() {
    let server = start(|r| r.route("/me", get(me))).await;
    let user = spotify(&server.base).current_user().await.unwrap();
    assert_eq!(user.id, "user-1");
}

#[tokio::test]
async fn test_create_playlist() {
    let server = start(|r| r.route("/users/{owner}/playlists", post(create_playlist))).await;
    let client = spotify(&server.base).with_public_playlists(false);

    let playlist = client
        .create_playlist("user-1", "Road Trip", "Converted from YouTube playlist: Road Trip")
        .await
        .unwrap();

    assert_eq!(playlist.id, "new");
    assert_eq!(playlist.name, "Road Trip");
    assert_eq!(playlist.url.as_deref(), Some("https://open.spotify.com/playlist/new"));
    assert_eq!(server.seen(), vec!["user-1|Bearer test-token|public=false"]);
}

#[tokio::test]
async fn test_add_tracks_sends_track_uris() {
    let server = start(|r| r.route("/playlists/{id}/tracks", post(add_tracks))).await;
    let client = spotify(&server.base);

    client
        .add_tracks(&new_playlist(), &["a".to_string(), "b".to_string()])
        .await
        .unwrap();

    assert_eq!(server.seen(), vec!["new:spotify:track:a,spotify:track:b"]);
}

#[tokio::test]
async fn test_add_tracks_not_replayed_on_gateway_error() {
    let server = start(|r| r.route("/playlists/{id}/tracks", post(bad_gateway))).await;
    let client = spotify(&server.base);

    let result = client.add_tracks(&new_playlist(), &["a".to_string()]).await;

    assert!(result.is_err());
    assert_eq!(server.hits(), 1);
}

// ---------------------------------------------------------------------------
// YouTube listing
// ---------------------------------------------------------------------------

fn video(id: &str, title: &str) -> Value {
    json!({
        "id": format!("item-{}", id),
        "snippet": {
            "title": title,
            "channelTitle": "Playlist Owner",
            "videoOwnerChannelTitle": "Uploader",
            "resourceId": { "kind": "youtube#video", "videoId": id }
        }
    })
}

async fn playlist_items(
    State(rec): State<Recorder>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let token = params.get("pageToken").cloned();
    rec.record(format!(
        "{}|{}|{}|{}",
        params.get("key").cloned().unwrap_or_default(),
        params.get("playlistId").cloned().unwrap_or_default(),
        params.get("maxResults").cloned().unwrap_or_default(),
        token.clone().unwrap_or_default()
    ));
    match token.as_deref() {
        None => Json(json!({
            "items": [video("v1", "Artist - One"), video("v2", "Deleted video"), video("v3", "Artist - Two")],
            "nextPageToken": "p2"
        })),
        Some("p2") => Json(json!({
            "items": [video("v4", "Private video"), video("v5", "Artist - Three")]
        })),
        Some(_) => Json(json!({ "items": [] })),
    }
}

async fn playlists(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("id").map(String::as_str) {
        Some("PLfound") => Json(json!({
            "items": [{
                "id": "PLfound",
                "snippet": { "title": "Road Trip", "description": "summer", "channelTitle": "Me" },
                "contentDetails": { "itemCount": 12 }
            }]
        }))
        .into_response(),
        Some("PLgone") => (StatusCode::NOT_FOUND, "gone").into_response(),
        Some("PLforbidden") => (StatusCode::FORBIDDEN, "quota").into_response(),
        _ => Json(json!({ "items": [] })).into_response(),
    }
}

#[tokio::test]
async fn test_list_pages_through_playlist() {
    let server = start(|r| r.route("/playlistItems", get(playlist_items))).await;

    let items = youtube(&server.base).list("PL1").await.unwrap();

    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["v1", "v3", "v5"]);
    assert_eq!(items[2].raw_title, "Artist - Three");
    assert_eq!(items[0].channel_or_uploader, "Uploader");
    assert_eq!(server.seen(), vec!["key-123|PL1|50|", "key-123|PL1|50|p2"]);
}

#[tokio::test]
async fn test_list_stops_at_max_items() {
    let server = start(|r| r.route("/playlistItems", get(playlist_items))).await;

    let items = youtube(&server.base)
        .with_max_items(Some(1))
        .list("PL1")
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "v1");
    assert_eq!(server.seen().len(), 1);
}

#[tokio::test]
async fn test_playlist_info() {
    let server = start(|r| r.route("/playlists", get(playlists))).await;
    let client = youtube(&server.base);

    let info = client.playlist_info("PLfound").await.unwrap();
    assert_eq!(info.title, "Road Trip");
    assert_eq!(info.item_count, 12);
    assert_eq!(info.channel_title, "Me");

    assert!(matches!(client.playlist_info("PLempty").await, Err(ListError::NotFound(_))));
    assert!(matches!(client.playlist_info("PLgone").await, Err(ListError::NotFound(_))));
    assert!(matches!(client.playlist_info("PLforbidden").await, Err(ListError::Auth(_))));
}

#[tokio::test]
async fn test_list_server_error_is_transient() {
    let server = start(|r| r.route("/playlistItems", get(server_error))).await;

    let result = youtube(&server.base).list("PL1").await;

    assert!(matches!(result, Err(ListError::Transient(_))));
    assert_eq!(server.hits(), 3);
}

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

async fn rate_limited_once(State(rec): State<Recorder>) -> Response {
    if rec.hit() == 1 {
        (StatusCode::TOO_MANY_REQUESTS, [(header::RETRY_AFTER, "0")], "slow down").into_response()
    } else {
        (StatusCode::OK, "ok").into_response()
    }
}

async fn rate_limited_long(State(rec): State<Recorder>) -> Response {
    rec.hit();
    (StatusCode::TOO_MANY_REQUESTS, [(header::RETRY_AFTER, "300")], "slow down").into_response()
}

#[tokio::test]
async fn test_retry_after_is_honoured() {
    let server = start(|r| r.route("/limited", get(rate_limited_once))).await;
    let client = http();
    let url = format!("{}/limited", server.base);

    let response = fast_retry().send(|| client.get(&url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_rate_limited_write_is_retried() {
    let server = start(|r| r.route("/limited", post(rate_limited_once))).await;
    let client = http();
    let url = format!("{}/limited", server.base);

    let response = fast_retry().send_write(|| client.post(&url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_long_retry_after_gives_up() {
    let server = start(|r| r.route("/limited", get(rate_limited_long))).await;
    let client = http();
    let url = format!("{}/limited", server.base);

    let err = fast_retry().send(|| client.get(&url)).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
    assert!(matches!(err, ApiError::Status { .. }));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_gateway_errors_retried_only_for_reads() {
    let server = start(|r| r.route("/flaky", get(bad_gateway).post(bad_gateway))).await;
    let client = http();
    let url = format!("{}/flaky", server.base);

    let err = fast_retry().send(|| client.get(&url)).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    assert_eq!(server.hits(), 3);

    assert!(fast_retry().send_write(|| client.post(&url)).await.is_err());
    assert_eq!(server.hits(), 4);

    assert!(RetryPolicy::none().send(|| client.get(&url)).await.is_err());
    assert_eq!(server.hits(), 5);
}
