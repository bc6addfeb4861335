use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Bearer credential consumed by every catalog call.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && now < self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<PlaylistSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub tracks: TracksLink,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksLink {
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub track: Option<Track>,
}

/// Reads an explicit `null` as the type's default.
///
/// Local files in a playlist come back with `null` in most of their metadata.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<ArtistRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub album: Album,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_urls: ExternalUrls,
    /// Only known for tracks that came out of a playlist listing.
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

impl Track {
    pub fn first_artist_id(&self) -> Option<&str> {
        self.artists.first().and_then(|a| a.id.as_deref())
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn image_url(&self) -> Option<&str> {
        self.album.images.first().map(|i| i.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
    pub position: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPlaylistRequest {
    pub playlist_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistCountResponse {
    pub count: u64,
}

/// Point-in-time copy of the user's aggregated library.
#[derive(Debug, Clone, Default)]
pub struct LibrarySnapshot {
    pub tracks: Vec<Track>,
    pub song_ids: Vec<String>,
    /// First artist of each track that has one. Not index-aligned with `tracks`.
    pub artist_ids: Vec<String>,
}

impl LibrarySnapshot {
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        let song_ids = tracks.iter().filter_map(|t| t.id.clone()).collect();
        let artist_ids = tracks
            .iter()
            .filter_map(|t| t.first_artist_id().map(str::to_string))
            .collect();

        Self {
            tracks,
            song_ids,
            artist_ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapsuleSample {
    pub uris: Vec<String>,
    pub size: usize,
}

impl CapsuleSample {
    pub fn from_tracks(tracks: &[&Track]) -> Self {
        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
        Self {
            size: uris.len(),
            uris,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSeed {
    pub track_id: String,
    pub artist_ids: Vec<String>,
    pub genres: Vec<String>,
}

impl RecommendationSeed {
    pub fn total_seeds(&self) -> usize {
        1 + self.artist_ids.len() + self.genres.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
}

/// Outcome of a single add-tracks call. `dropped` counts uris beyond the per-call cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedTracks {
    pub submitted: usize,
    pub dropped: usize,
}

#[derive(Tabled)]
pub struct SeasonTableRow {
    pub year: i32,
    pub season: String,
    pub from: String,
    pub to: String,
}

#[derive(Tabled)]
pub struct CapsuleTableRow {
    pub added: String,
    pub name: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct RecommendationTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub artists: String,
    pub album: String,
    pub release_date: String,
    pub popularity: u8,
    pub link: String,
    pub image: String,
}
