use crate::{
    Res,
    errors::{CapsuleError, FetchStage},
    spotify::{Session, send_json},
    types::{RecommendationSeed, RecommendationsResponse, Track},
};

pub const RECOMMENDATION_LIMIT: u32 = 20;

/// Retrieves up to `limit` tracks seeded by `seed`.
///
/// The seed is sent as `seed_artists`, `seed_genres` (comma separated) and
/// `seed_tracks`. Tracks come back without an `added_at`.
///
/// # Errors
///
/// - [`CapsuleError::MissingCredential`] - no usable credential, nothing was sent
/// - [`CapsuleError::Fetch`] with [`FetchStage::Recommendations`] - transport or HTTP failure
pub async fn get_recommendations(
    session: &Session,
    seed: &RecommendationSeed,
    limit: u32,
) -> Res<Vec<Track>> {
    let url = session.endpoint("recommendations");
    let request = session.get(&url)?.query(&[
        ("seed_artists", seed.artist_ids.join(",")),
        ("seed_genres", seed.genres.join(",")),
        ("seed_tracks", seed.track_id.clone()),
        ("limit", limit.to_string()),
    ]);

    let res: RecommendationsResponse = send_json(request)
        .await
        .map_err(CapsuleError::fetch(FetchStage::Recommendations))?;

    Ok(res.tracks)
}
