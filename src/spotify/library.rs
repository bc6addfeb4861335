use crate::{
    Res,
    errors::{CapsuleError, FetchStage},
    spotify::{Session, send_json},
    types::{
        GetUserPlaylistsResponse, LibrarySnapshot, PlaylistSummary, PlaylistTracksResponse, Track,
    },
};

/// Page size of the playlist listing. Only the first page is read.
pub const PLAYLIST_PAGE_LIMIT: u32 = 50;

/// Number of playlist track listings fetched at the same time.
pub const TRACK_FETCH_CONCURRENCY: usize = 8;

/// Retrieves the first page of the user's playlists.
///
/// Pagination is not followed: users with more than [`PLAYLIST_PAGE_LIMIT`]
/// playlists only have the first page considered.
///
/// # Errors
///
/// - [`CapsuleError::MissingCredential`] - no usable credential, nothing was sent
/// - [`CapsuleError::Fetch`] with [`FetchStage::Playlists`] - transport or HTTP failure
pub async fn get_playlists(session: &Session) -> Res<Vec<PlaylistSummary>> {
    let url = session.endpoint(&format!("me/playlists?limit={}", PLAYLIST_PAGE_LIMIT));
    let request = session.get(&url)?;

    let page: GetUserPlaylistsResponse = send_json(request)
        .await
        .map_err(CapsuleError::fetch(FetchStage::Playlists))?;

    Ok(page.items)
}

/// Retrieves the items behind a playlist's track link, in listing order.
///
/// Items whose track is gone (`"track": null`) are skipped; the playlist's
/// `added_at` is copied onto each track.
pub async fn get_playlist_tracks(session: &Session, href: &str) -> Res<Vec<Track>> {
    let request = session.get(href)?;

    let page: PlaylistTracksResponse = send_json(request)
        .await
        .map_err(CapsuleError::fetch(FetchStage::Tracks))?;

    Ok(page
        .items
        .into_iter()
        .filter_map(|item| {
            item.track.map(|mut track| {
                track.added_at = item.added_at;
                track
            })
        })
        .collect())
}

/// Builds a [`LibrarySnapshot`] from every playlist on the first page.
///
/// Track listings are fetched in chunks of [`TRACK_FETCH_CONCURRENCY`]
/// playlists; each chunk is joined in playlist order before the next one
/// starts, so the snapshot is ordered by playlist and then by item no matter
/// which request finishes first.
///
/// Any failure aborts the whole aggregation: fetches still in flight are
/// cancelled and tracks that were already fetched are dropped. No partial
/// snapshot is ever returned.
pub async fn aggregate(session: &Session) -> Res<LibrarySnapshot> {
    let playlists = get_playlists(session).await?;
    log::debug!("aggregating tracks from {} playlists", playlists.len());

    let mut tracks: Vec<Track> = Vec::new();

    for chunk in playlists.chunks(TRACK_FETCH_CONCURRENCY) {
        let mut handles = Vec::with_capacity(chunk.len());

        for playlist in chunk {
            let session = session.clone();
            let href = playlist.tracks.href.clone();
            handles.push(tokio::spawn(async move {
                get_playlist_tracks(&session, &href).await
            }));
        }

        let mut pending = handles.into_iter();
        while let Some(handle) = pending.next() {
            let failure = match handle.await {
                Ok(Ok(items)) => {
                    tracks.extend(items);
                    continue;
                }
                Ok(Err(e)) => e,
                Err(e) => {
                    log::debug!("track fetch task failed to join: {}", e);
                    CapsuleError::Interrupted
                }
            };

            // cancel whatever is still in flight in this chunk
            pending.for_each(|h| h.abort());
            return Err(failure);
        }
    }

    Ok(LibrarySnapshot::from_tracks(tracks))
}
