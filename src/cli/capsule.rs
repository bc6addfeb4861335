use tabled::Table;

use crate::{
    calendar::{self, Season},
    config, error, info,
    selection::{self, MAX_CAPSULE_SIZE},
    spotify, success,
    types::{CapsuleSample, CapsuleTableRow},
    utils, warning,
};

use super::{load_session, playlist::materialize, report, spinner};

pub const CAPSULE_DESCRIPTION: &str = "Time capsule playlist created by Spotify Time Capsule.";

pub async fn capsule(
    year: i32,
    season: Season,
    limit: i64,
    name: Option<String>,
    description: Option<String>,
) {
    let season_map = match config::season_map() {
        Ok(map) => map,
        Err(e) => error!("{}", e),
    };

    let Some(range) = calendar::get_season_range(&season_map, year, season) else {
        warning!(
            "{} {} is not an available time frame. Run timecapsule seasons to list them.",
            season,
            year
        );
        return;
    };

    let limit = utils::clamp_song_limit(limit);
    if limit == 0 {
        warning!("Enter a number of songs between 1 and {}.", MAX_CAPSULE_SIZE);
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

    info!("Your time frame is {}, {}", season, year);

    let sampled = match selection::sample_window(&snapshot, &range, limit) {
        Ok(sampled) => sampled,
        Err(e) => {
            report(&e);
            return;
        }
    };
    let sample = CapsuleSample::from_tracks(&sampled);

    success!(
        "{} songs found in this timeframe. Maximum {} allowed.",
        sample.size,
        MAX_CAPSULE_SIZE
    );

    let rows: Vec<CapsuleTableRow> = sampled
        .iter()
        .map(|t| CapsuleTableRow {
            added: t
                .added_at
                .map(|a| a.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            name: t.name.clone(),
            artists: t.artist_names(),
        })
        .collect();

    println!("{}", Table::new(rows));
    info!("Songs may repeat based on your library.");

    match name {
        Some(name) => {
            let description = description.unwrap_or_else(|| CAPSULE_DESCRIPTION.to_string());
            materialize(&session, &name, &description, &sample.uris).await;
        }
        None => info!("Pass --name to save these songs as a playlist."),
    }
}
