use crate::{
    flow::PlaylistFlow,
    info,
    management::{PlaylistCounter, created_summary},
    spotify::{self, Session, playlist::MAX_TRACKS_PER_CALL},
    success, warning,
};

use super::report;

/// Creates a playlist named `name` and fills it with `uris`.
///
/// Walks [`PlaylistFlow`] from idle to filled and returns wherever it stopped,
/// so a failed add still reports the playlist that was created. The counter
/// service is notified in the background once the playlist exists.
pub(super) async fn materialize(
    session: &Session,
    name: &str,
    description: &str,
    uris: &[String],
) -> PlaylistFlow {
    let flow = match PlaylistFlow::Idle.choose_name(name) {
        Ok(flow) => flow,
        Err(e) => {
            report(&e);
            return PlaylistFlow::Idle;
        }
    };

    if !flow.can_create() {
        warning!("Choose a playlist name to create a playlist.");
        return flow;
    }

    let owner_id = match spotify::playlist::current_user_id(session).await {
        Ok(id) => id,
        Err(e) => {
            report(&e);
            return flow;
        }
    };

    let playlist_name = flow.name().unwrap_or(name).to_string();
    info!("Create playlist {}", playlist_name);
    let created =
        spotify::playlist::create_playlist(session, &owner_id, &playlist_name, description).await;
    let created = match created {
        Ok(playlist) => playlist,
        Err(e) => {
            report(&e);
            return flow;
        }
    };
    success!("Playlist {} created.", created.name);

    let counter_task = {
        let playlist_id = created.id.clone();
        tokio::spawn(async move { PlaylistCounter::from_config().record(&playlist_id).await })
    };

    let flow = match flow.playlist_created(created.clone()) {
        Ok(flow) => flow,
        Err(e) => {
            report(&e);
            return PlaylistFlow::Idle;
        }
    };

    let flow = if uris.is_empty() {
        warning!("No songs to add to playlist {}.", created.name);
        flow
    } else {
        let added =
            spotify::playlist::add_tracks(session, &created.id, uris, MAX_TRACKS_PER_CALL).await;
        match added {
            Ok(added) => {
                success!("{} songs added to playlist {}.", added.submitted, created.name);
                if added.dropped > 0 {
                    warning!(
                        "Only {} songs fit in one request; {} were left out.",
                        MAX_TRACKS_PER_CALL,
                        added.dropped
                    );
                }
                match flow.clone().songs_added(added) {
                    Ok(next) => next,
                    Err(e) => {
                        report(&e);
                        flow
                    }
                }
            }
            Err(e) => {
                report(&e);
                flow
            }
        }
    };

    if let Some(line) = created_summary(counter_task.await.ok().flatten()) {
        info!("{}", line);
    }

    flow
}
