use tabled::Table;

use crate::{
    selection::{self, DEFAULT_MAX_GENRES},
    spotify::{self, recommendations::RECOMMENDATION_LIMIT},
    types::{RecommendationTableRow, Track},
    utils::Genre,
    warning,
};

use super::{load_session, playlist::materialize, report, spinner};

pub const RECOMMENDATION_DESCRIPTION: &str =
    "Playlist created from Spotify Time Capsule suggestions.";

pub async fn recommend(
    genres: Vec<Genre>,
    name: Option<String>,
    picks: Option<Vec<usize>>,
    description: Option<String>,
) {
    if genres.is_empty() || genres.len() > DEFAULT_MAX_GENRES {
        warning!("Pick between 1 and {} genres.", DEFAULT_MAX_GENRES);
        return;
    }

    let session = load_session().await;

    let pb = spinner("Fetching your playlists...");
    let snapshot = spotify::library::aggregate(&session).await;
    pb.finish_and_clear();

    let snapshot = match snapshot {
        Ok(snapshot) => snapshot,
        Err(e) => {
            report(&e);
            return;
        }
    };

    let labels: Vec<String> = genres.iter().map(ToString::to_string).collect();
    let Some(seed) = selection::build_seed(&snapshot, &labels, DEFAULT_MAX_GENRES) else {
        warning!(
            "Recommendations need at least one song with an artist in your playlists and one genre."
        );
        return;
    };

    let pb = spinner("Fetching recommendations...");
    let tracks =
        spotify::recommendations::get_recommendations(&session, &seed, RECOMMENDATION_LIMIT)
            .await;
    pb.finish_and_clear();

    let tracks: Vec<Track> = match tracks {
        Ok(tracks) => tracks,
        Err(e) => {
            report(&e);
            return;
        }
    };

    let rows: Vec<RecommendationTableRow> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| RecommendationTableRow {
            index: i + 1,
            name: t.name.clone(),
            artists: t.artist_names(),
            album: t.album.name.clone(),
            release_date: t.album.release_date.clone(),
            popularity: t.popularity,
            link: t.external_urls.spotify.clone().unwrap_or_default(),
            image: t.image_url().unwrap_or_default().to_string(),
        })
        .collect();
    println!("{}", Table::new(rows));

    let Some(name) = name else {
        return;
    };

    let uris: Vec<String> = match picks {
        Some(picks) => picks
            .into_iter()
            .filter_map(|n| match n.checked_sub(1).and_then(|i| tracks.get(i)) {
                Some(t) => Some(t.uri.clone()),
                None => {
                    warning!("There is no row {}, skipping it.", n);
                    None
                }
            })
            .collect(),
        None => tracks.iter().map(|t| t.uri.clone()).collect(),
    };

    if uris.is_empty() {
        warning!("Select at least one song to create a playlist.");
        return;
    }

    let description = description.unwrap_or_else(|| RECOMMENDATION_DESCRIPTION.to_string());
    materialize(&session, &name, &description, &uris).await;
}
