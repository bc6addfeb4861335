//! Time window selection and recommendation seeding.
//!
//! Capsule sampling is randomized on purpose while recommendation seeding is
//! deterministic: given the same snapshot it always seeds from the first
//! track and the first artist.

use rand::Rng;

use crate::{
    Res,
    calendar::SeasonRange,
    errors::CapsuleError,
    types::{CapsuleSample, LibrarySnapshot, RecommendationSeed, Track},
    utils,
};

/// Largest capsule a single add-tracks call can carry.
pub const MAX_CAPSULE_SIZE: usize = 100;

/// Hard cap on seed values accepted by the recommendations endpoint.
pub const MAX_SEEDS: usize = 5;

pub const DEFAULT_MAX_GENRES: usize = 3;

pub fn tracks_in_range<'a>(snapshot: &'a LibrarySnapshot, range: &SeasonRange) -> Vec<&'a Track> {
    snapshot
        .tracks
        .iter()
        .filter(|t| t.added_at.is_some_and(|added| range.contains(added)))
        .collect()
}

pub fn select_window(
    snapshot: &LibrarySnapshot,
    range: &SeasonRange,
    limit: usize,
) -> Res<CapsuleSample> {
    select_window_with(snapshot, range, limit, &mut rand::rng())
}

pub fn select_window_with<R: Rng + ?Sized>(
    snapshot: &LibrarySnapshot,
    range: &SeasonRange,
    limit: usize,
    rng: &mut R,
) -> Res<CapsuleSample> {
    let sampled = sample_window_with(snapshot, range, limit, rng)?;
    Ok(CapsuleSample::from_tracks(&sampled))
}

/// Like [`select_window`], but hands back the sampled tracks themselves.
///
/// The same uri can sit in several playlists with different `added_at`
/// values; the returned tracks are the in-range entries that were drawn.
pub fn sample_window<'a>(
    snapshot: &'a LibrarySnapshot,
    range: &SeasonRange,
    limit: usize,
) -> Res<Vec<&'a Track>> {
    sample_window_with(snapshot, range, limit, &mut rand::rng())
}

pub fn sample_window_with<'a, R: Rng + ?Sized>(
    snapshot: &'a LibrarySnapshot,
    range: &SeasonRange,
    limit: usize,
    rng: &mut R,
) -> Res<Vec<&'a Track>> {
    let limit = limit.min(MAX_CAPSULE_SIZE);
    if limit == 0 {
        return Ok(Vec::new());
    }

    let filtered = tracks_in_range(snapshot, range);
    if filtered.is_empty() {
        return Err(CapsuleError::EmptySelection);
    }

    Ok(utils::take(&utils::shuffle_with(&filtered, rng), limit))
}

/// Returns `None` unless the snapshot has a song id, an artist id, and at least one genre.
pub fn build_seed(
    snapshot: &LibrarySnapshot,
    genres: &[String],
    max_genres: usize,
) -> Option<RecommendationSeed> {
    let track_id = snapshot.song_ids.first()?;
    let artist_id = snapshot.artist_ids.first()?;

    // one track and one artist are always seeded
    let genre_cap = max_genres.min(MAX_SEEDS - 2);

    let mut picked: Vec<String> = Vec::new();
    for genre in genres.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
        if picked.len() == genre_cap {
            break;
        }
        if !picked.iter().any(|p| p == genre) {
            picked.push(genre.to_string());
        }
    }

    if picked.is_empty() {
        return None;
    }

    Some(RecommendationSeed {
        track_id: track_id.clone(),
        artist_ids: vec![artist_id.clone()],
        genres: picked,
    })
}
