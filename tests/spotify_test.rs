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
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{Value, json};
use timecapsule::{
    calendar::{Season, build_season_map, get_season_range},
    errors::{CapsuleError, FetchStage},
    selection::{build_seed, select_window},
    spotify::{
        Session,
        library::{aggregate, get_playlists},
        playlist::{MAX_TRACKS_PER_CALL, add_tracks, create_playlist, current_user_id},
        recommendations::{RECOMMENDATION_LIMIT, get_recommendations},
    },
    types::{Credential, PlaylistTracksResponse, RecommendationSeed},
};

#[derive(Default)]
struct CatalogOptions {
    playlists: usize,
    fail_playlists: bool,
    fail_tracks_of: Option<usize>,
    fail_create: bool,
    local_file_in: Option<usize>,
    slow_tracks_ms: Option<u64>,
}

/// In-process stand-in for the catalog service.
struct Catalog {
    base: String,
    options: CatalogOptions,
    hits: AtomicUsize,
    served_tracks: AtomicUsize,
    created: AtomicUsize,
    bearer: Mutex<Vec<String>>,
    listing_queries: Mutex<Vec<HashMap<String, String>>>,
    added: Mutex<Vec<(String, Value)>>,
    created_bodies: Mutex<Vec<Value>>,
    recommendation_queries: Mutex<Vec<HashMap<String, String>>>,
}

type Shared = Arc<Catalog>;

impl Catalog {
    fn hit(&self, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        if let Some(v) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
            self.bearer.lock().unwrap().push(v.to_string());
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn track_json(playlist: usize, item: usize) -> Value {
    json!({
        "id": format!("t{}-{}", playlist, item),
        "uri": format!("spotify:track:{}-{}", playlist, item),
        "name": format!("Song {}-{}", playlist, item),
        "artists": [{ "id": format!("a{}", playlist), "name": format!("Artist {}", playlist) }],
        "album": {
            "name": "Album",
            "images": [{ "url": format!("https://img.test/{}", playlist), "height": 64, "width": 64 }],
            "release_date": "2021-01-01"
        },
        "popularity": 40
    })
}

/// A playlist item pointing at a file on the user's disk.
fn local_file_item() -> Value {
    json!({
        "added_at": "2021-07-03T10:00:00Z",
        "is_local": true,
        "track": {
            "id": null,
            "uri": "spotify:local:Someone:Demos:Garage+Take:180",
            "name": "Garage Take",
            "artists": [{ "id": null, "name": "Someone", "uri": null }],
            "album": { "id": null, "name": null, "images": [], "release_date": null },
            "popularity": 0,
            "external_urls": {},
            "is_local": true
        }
    })
}

async fn me(State(c): State<Shared>, headers: HeaderMap) -> Json<Value> {
    c.hit(&headers);
    Json(json!({ "id": "owner", "display_name": "Owner" }))
}

async fn my_playlists(
    State(c): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    c.hit(&headers);
    c.listing_queries.lock().unwrap().push(query);

    if c.options.fail_playlists {
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    let items: Vec<Value> = (0..c.options.playlists)
        .map(|i| {
            json!({
                "id": format!("p{}", i),
                "name": format!("Playlist {}", i),
                "tracks": { "href": format!("{}/playlists/{}/tracks", c.base, i), "total": 2 }
            })
        })
        .collect();

    let total = items.len();
    Ok(Json(json!({ "items": items, "total": total })))
}

async fn playlist_tracks(
    State(c): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<usize>,
) -> Result<Json<Value>, StatusCode> {
    c.hit(&headers);

    if c.options.fail_tracks_of == Some(id) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    // earlier playlists answer last
    let delay = c
        .options
        .slow_tracks_ms
        .unwrap_or((c.options.playlists.saturating_sub(id) * 3) as u64);
    tokio::time::sleep(Duration::from_millis(delay)).await;

    let mut items = vec![
        json!({ "added_at": "2021-07-01T10:00:00Z", "track": track_json(id, 0) }),
        json!({ "added_at": "2021-07-02T10:00:00Z", "track": track_json(id, 1) }),
    ];
    if id == 0 {
        items.insert(1, json!({ "added_at": "2021-07-01T11:00:00Z", "track": null }));
    }
    if c.options.local_file_in == Some(id) {
        items.push(local_file_item());
    }

    c.served_tracks.fetch_add(1, Ordering::SeqCst);
    Ok(Json(json!({ "items": items })))
}

async fn create(
    State(c): State<Shared>,
    headers: HeaderMap,
    Path(owner): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    c.hit(&headers);
    if c.options.fail_create || owner != "owner" {
        return Err(StatusCode::FORBIDDEN);
    }

    let n = c.created.fetch_add(1, Ordering::SeqCst);
    let name = body["name"].clone();
    c.created_bodies.lock().unwrap().push(body);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": format!("pl-{}", n), "name": name })),
    ))
}

async fn add(
    State(c): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    c.hit(&headers);
    c.added.lock().unwrap().push((id, body));
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "snap" })))
}

async fn recommendations(
    State(c): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    c.hit(&headers);
    c.recommendation_queries.lock().unwrap().push(query);
    Json(json!({ "tracks": [track_json(7, 0), track_json(7, 1)], "seeds": [] }))
}

async fn spawn_catalog(options: CatalogOptions) -> Shared {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let catalog = Arc::new(Catalog {
        base,
        options,
        hits: AtomicUsize::new(0),
        served_tracks: AtomicUsize::new(0),
        created: AtomicUsize::new(0),
        bearer: Mutex::new(Vec::new()),
        listing_queries: Mutex::new(Vec::new()),
        added: Mutex::new(Vec::new()),
        created_bodies: Mutex::new(Vec::new()),
        recommendation_queries: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/me", get(me))
        .route("/me/playlists", get(my_playlists))
        .route("/playlists/{id}/tracks", get(playlist_tracks).post(add))
        .route("/users/{owner}/playlists", post(create))
        .route("/recommendations", get(recommendations))
        .with_state(Arc::clone(&catalog));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    catalog
}

fn session(catalog: &Catalog) -> Session {
    Session::new(
        format!("{}/", catalog.base),
        Some(Credential::new("tok", Utc::now() + ChronoDuration::hours(1))),
    )
}

#[tokio::test]
async fn test_aggregate_keeps_playlist_order_across_chunks() {
    let catalog = spawn_catalog(CatalogOptions {
        playlists: 20,
        ..Default::default()
    })
    .await;

    let snapshot = aggregate(&session(&catalog)).await.unwrap();

    let expected: Vec<String> = (0..20)
        .flat_map(|p| (0..2).map(move |i| format!("spotify:track:{}-{}", p, i)))
        .collect();
    let uris: Vec<String> = snapshot.tracks.iter().map(|t| t.uri.clone()).collect();
    assert_eq!(uris, expected);

    assert_eq!(snapshot.song_ids.len(), 40);
    assert_eq!(snapshot.artist_ids.len(), 40);
    assert_eq!(snapshot.artist_ids[0], "a0");
    assert!(snapshot.tracks.iter().all(|t| t.added_at.is_some()));

    // one listing call plus one call per playlist, all authorized
    assert_eq!(catalog.hits(), 21);
    assert!(
        catalog
            .bearer
            .lock()
            .unwrap()
            .iter()
            .all(|h| h == "Bearer tok")
    );

    let queries = catalog.listing_queries.lock().unwrap();
    assert_eq!(queries[0].get("limit").map(String::as_str), Some("50"));
}

#[tokio::test]
async fn test_aggregated_snapshot_feeds_selection() {
    let catalog = spawn_catalog(CatalogOptions {
        playlists: 3,
        ..Default::default()
    })
    .await;

    let snapshot = aggregate(&session(&catalog)).await.unwrap();
    let map = build_season_map([2021]).unwrap();

    let summer = get_season_range(&map, 2021, Season::Summer).unwrap();
    let sample = select_window(&snapshot, &summer, 4).unwrap();
    assert_eq!(sample.size, 4);

    let winter = get_season_range(&map, 2021, Season::Winter).unwrap();
    assert!(matches!(
        select_window(&snapshot, &winter, 4),
        Err(CapsuleError::EmptySelection)
    ));
}

#[tokio::test]
async fn test_empty_library_yields_empty_snapshot() {
    let catalog = spawn_catalog(CatalogOptions::default()).await;

    let snapshot = aggregate(&session(&catalog)).await.unwrap();
    assert!(snapshot.is_empty());
    assert!(snapshot.artist_ids.is_empty());

    let map = build_season_map([2021]).unwrap();
    let range = get_season_range(&map, 2021, Season::Spring).unwrap();
    assert!(matches!(
        select_window(&snapshot, &range, 10),
        Err(CapsuleError::EmptySelection)
    ));
    assert!(build_seed(&snapshot, &["chill".to_string()], 3).is_none());
}

#[tokio::test]
async fn test_failed_track_listing_aborts_aggregation() {
    let catalog = spawn_catalog(CatalogOptions {
        playlists: 12,
        fail_tracks_of: Some(9),
        ..Default::default()
    })
    .await;

    let err = aggregate(&session(&catalog)).await.unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Fetch {
            stage: FetchStage::Tracks,
            ..
        }
    ));
    assert!(err.to_string().contains("tracks"));
}

#[tokio::test]
async fn test_failed_playlist_listing() {
    let catalog = spawn_catalog(CatalogOptions {
        playlists: 3,
        fail_playlists: true,
        ..Default::default()
    })
    .await;

    let err = get_playlists(&session(&catalog)).await.unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Fetch {
            stage: FetchStage::Playlists,
            ..
        }
    ));

    let err = aggregate(&session(&catalog)).await.unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Fetch {
            stage: FetchStage::Playlists,
            ..
        }
    ));
    // no track listing was attempted
    assert_eq!(catalog.hits(), 2);
}

#[tokio::test]
async fn test_missing_credential_sends_nothing() {
    let catalog = spawn_catalog(CatalogOptions {
        playlists: 3,
        ..Default::default()
    })
    .await;
    let session = Session::new(catalog.base.clone(), None);

    assert!(matches!(
        aggregate(&session).await,
        Err(CapsuleError::MissingCredential)
    ));
    assert!(matches!(
        current_user_id(&session).await,
        Err(CapsuleError::MissingCredential)
    ));
    assert!(matches!(
        create_playlist(&session, "owner", "Name", "").await,
        Err(CapsuleError::MissingCredential)
    ));
    assert!(matches!(
        add_tracks(&session, "pl-0", &["spotify:track:1".to_string()], 100).await,
        Err(CapsuleError::MissingCredential)
    ));

    let seed = RecommendationSeed {
        track_id: "t".to_string(),
        artist_ids: vec!["a".to_string()],
        genres: vec!["chill".to_string()],
    };
    assert!(matches!(
        get_recommendations(&session, &seed, 20).await,
        Err(CapsuleError::MissingCredential)
    ));

    assert_eq!(catalog.hits(), 0);
}

#[tokio::test]
async fn test_expired_credential_sends_nothing() {
    let catalog = spawn_catalog(CatalogOptions {
        playlists: 3,
        ..Default::default()
    })
    .await;

    let expired = Session::new(
        catalog.base.clone(),
        Some(Credential::new("tok", Utc::now() - ChronoDuration::minutes(5))),
    );
    assert!(matches!(
        aggregate(&expired).await,
        Err(CapsuleError::MissingCredential)
    ));

    let blank = Session::new(
        catalog.base.clone(),
        Some(Credential::new("", Utc::now() + ChronoDuration::hours(1))),
    );
    assert!(matches!(
        get_playlists(&blank).await,
        Err(CapsuleError::MissingCredential)
    ));

    assert_eq!(catalog.hits(), 0);
}

#[tokio::test]
async fn test_create_playlist_for_owner() {
    let catalog = spawn_catalog(CatalogOptions::default()).await;
    let session = session(&catalog);

    let owner = current_user_id(&session).await.unwrap();
    assert_eq!(owner, "owner");

    let first = create_playlist(&session, &owner, "Summer '21", "made by timecapsule")
        .await
        .unwrap();
    let second = create_playlist(&session, &owner, "Summer '21", "made by timecapsule")
        .await
        .unwrap();

    assert_eq!(first.name, "Summer '21");
    assert_ne!(first.id, second.id);

    let bodies = catalog.created_bodies.lock().unwrap();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0]["name"], "Summer '21");
    assert_eq!(bodies[0]["description"], "made by timecapsule");
}

#[tokio::test]
async fn test_create_playlist_failure() {
    let catalog = spawn_catalog(CatalogOptions {
        fail_create: true,
        ..Default::default()
    })
    .await;

    let err = create_playlist(&session(&catalog), "owner", "Name", "")
        .await
        .unwrap_err();
    assert!(matches!(err, CapsuleError::Create(_)));
    assert_eq!(err.to_string(), "Failed to create playlist.");
}

#[tokio::test]
async fn test_add_tracks_truncates_to_one_call() {
    let catalog = spawn_catalog(CatalogOptions::default()).await;
    let uris: Vec<String> = (0..150).map(|i| format!("spotify:track:{}", i)).collect();

    let outcome = add_tracks(&session(&catalog), "pl-0", &uris, MAX_TRACKS_PER_CALL)
        .await
        .unwrap();
    assert_eq!(outcome.submitted, 100);
    assert_eq!(outcome.dropped, 50);

    let added = catalog.added.lock().unwrap();
    assert_eq!(added.len(), 1);

    let (playlist, body) = &added[0];
    assert_eq!(playlist, "pl-0");
    assert_eq!(body["position"], 0);

    let sent: Vec<&str> = body["uris"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(sent.len(), 100);
    assert_eq!(sent[0], "spotify:track:0");
    assert_eq!(sent[99], "spotify:track:99");
}

#[tokio::test]
async fn test_add_tracks_within_limit() {
    let catalog = spawn_catalog(CatalogOptions::default()).await;
    let uris = vec!["spotify:track:a".to_string(), "spotify:track:b".to_string()];

    let outcome = add_tracks(&session(&catalog), "pl-3", &uris, MAX_TRACKS_PER_CALL)
        .await
        .unwrap();
    assert_eq!(outcome.submitted, 2);
    assert_eq!(outcome.dropped, 0);
}

#[tokio::test]
async fn test_recommendations_query() {
    let catalog = spawn_catalog(CatalogOptions::default()).await;
    let seed = RecommendationSeed {
        track_id: "t1".to_string(),
        artist_ids: vec!["a1".to_string()],
        genres: vec!["chill".to_string(), "disco".to_string()],
    };

    let tracks = get_recommendations(&session(&catalog), &seed, RECOMMENDATION_LIMIT)
        .await
        .unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].uri, "spotify:track:7-0");
    assert_eq!(tracks[0].artist_names(), "Artist 7");
    assert_eq!(tracks[0].image_url(), Some("https://img.test/7"));
    assert!(tracks[0].added_at.is_none());

    let queries = catalog.recommendation_queries.lock().unwrap();
    let query = &queries[0];
    assert_eq!(query["seed_artists"], "a1");
    assert_eq!(query["seed_genres"], "chill,disco");
    assert_eq!(query["seed_tracks"], "t1");
    assert_eq!(query["limit"], "20");
}

#[tokio::test]
async fn test_local_files_do_not_break_aggregation() {
    let catalog = spawn_catalog(CatalogOptions {
        playlists: 2,
        local_file_in: Some(1),
        ..Default::default()
    })
    .await;

    let snapshot = aggregate(&session(&catalog)).await.unwrap();
    assert_eq!(snapshot.tracks.len(), 5);

    let local = snapshot.tracks.last().unwrap();
    assert_eq!(local.uri, "spotify:local:Someone:Demos:Garage+Take:180");
    assert!(local.id.is_none());
    assert_eq!(local.album.name, "");
    assert_eq!(local.album.release_date, "");
    assert!(local.image_url().is_none());
    assert!(local.added_at.is_some());

    // no id and no artist id, so no seed values either
    assert_eq!(snapshot.song_ids.len(), 4);
    assert_eq!(snapshot.artist_ids.len(), 4);
}

#[test]
fn test_null_metadata_decodes_to_defaults() {
    let page: PlaylistTracksResponse = serde_json::from_value(json!({
        "items": [
            local_file_item(),
            { "added_at": "2021-07-01T10:00:00Z", "track": track_json(0, 0) }
        ]
    }))
    .unwrap();

    assert_eq!(page.items.len(), 2);
    let local = page.items[0].track.as_ref().unwrap();
    assert_eq!(local.artists[0].name, "Someone");
    assert!(local.album.images.is_empty());
    assert_eq!(page.items[1].track.as_ref().unwrap().album.release_date, "2021-01-01");
}

#[tokio::test]
async fn test_failed_chunk_cancels_pending_fetches() {
    let catalog = spawn_catalog(CatalogOptions {
        playlists: 8,
        fail_tracks_of: Some(0),
        slow_tracks_ms: Some(300),
        ..Default::default()
    })
    .await;

    let err = aggregate(&session(&catalog)).await.unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Fetch {
            stage: FetchStage::Tracks,
            ..
        }
    ));
    assert_eq!(catalog.served_tracks.load(Ordering::SeqCst), 0);

    // long enough for every slow listing to have finished had it kept running
    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(catalog.served_tracks.load(Ordering::SeqCst), 0);
}
