use crate::{
    Res,
    errors::{CapsuleError, FetchStage},
    spotify::{Session, send_json},
    types::{
        AddTrackToPlaylistRequest, AddedTracks, CreatePlaylistRequest, CreatePlaylistResponse,
        CurrentUser, PlaylistRef,
    },
};

/// The service rejects add-tracks calls carrying more uris than this.
pub const MAX_TRACKS_PER_CALL: usize = 100;

pub async fn current_user_id(session: &Session) -> Res<String> {
    let request = session.get(&session.endpoint("me"))?;

    let user: CurrentUser = send_json(request)
        .await
        .map_err(CapsuleError::fetch(FetchStage::Profile))?;

    Ok(user.id)
}

/// Creates a new playlist for `owner_id`.
///
/// Not idempotent: the service does not enforce unique names, so calling this
/// twice with the same name yields two playlists. The name is not validated
/// here.
pub async fn create_playlist(
    session: &Session,
    owner_id: &str,
    name: &str,
    description: &str,
) -> Res<PlaylistRef> {
    let url = session.endpoint(&format!("users/{}/playlists", owner_id));
    let request = session.post(&url)?.json(&CreatePlaylistRequest {
        name: name.to_string(),
        description: description.to_string(),
    });

    let res: CreatePlaylistResponse = send_json(request).await.map_err(CapsuleError::Create)?;

    Ok(PlaylistRef {
        id: res.id,
        name: res.name.unwrap_or_else(|| name.to_string()),
    })
}

/// Inserts `uris` at the top of a playlist in a single call.
///
/// Only the first `max_per_call` uris are submitted. Anything past that is
/// dropped, not paginated; the returned [`AddedTracks::dropped`] tells the
/// caller how many were left out.
pub async fn add_tracks(
    session: &Session,
    playlist_id: &str,
    uris: &[String],
    max_per_call: usize,
) -> Res<AddedTracks> {
    let submitted: Vec<String> = uris.iter().take(max_per_call).cloned().collect();
    let outcome = AddedTracks {
        submitted: submitted.len(),
        dropped: uris.len() - submitted.len(),
    };

    let url = session.endpoint(&format!("playlists/{}/tracks", playlist_id));
    let request = session.post(&url)?.json(&AddTrackToPlaylistRequest {
        uris: submitted,
        position: 0,
    });

    request
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(CapsuleError::Add)?;

    Ok(outcome)
}
