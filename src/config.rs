//! Configuration management for the time capsule.
//!
//! Values are read from environment variables, which may be seeded from a
//! `.env` file in the local data directory. Catalog endpoints fall back to the
//! public Spotify defaults; values without a sensible default are required and
//! surface as [`CapsuleError::Configuration`] when missing.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::{
    Res,
    calendar::{SeasonMap, build_season_map},
    errors::CapsuleError,
    utils,
};

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SCOPE: &str =
    "playlist-read-collaborative playlist-modify-public playlist-read-private playlist-modify-private";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_CAPSULE_YEARS: &str = "2019,2020,2021,2022";
const DEFAULT_COUNTER_URL: &str = "http://localhost:8080/api/playlists";

/// Returns the directory holding the `.env` file, caches and the token.
///
/// - Linux: `~/.local/share/timecapsule`
/// - macOS: `~/Library/Application Support/timecapsule`
/// - Windows: `%LOCALAPPDATA%/timecapsule`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("timecapsule");
    path
}

/// Loads environment variables from `<data dir>/.env`.
///
/// Creates the data directory if needed. A missing `.env` file is not an
/// error, since every value can also come from the process environment.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required(name: &str) -> Res<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CapsuleError::Configuration(format!("{} must be set", name)))
}

/// Address the local OAuth callback server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Client id of the registered Spotify application (`SPOTIFY_API_AUTH_CLIENT_ID`).
pub fn spotify_client_id() -> Res<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Redirect URI registered with the Spotify application (`SPOTIFY_API_REDIRECT_URI`).
///
/// Defaults to the callback route of the local server.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| format!("http://{}/callback", server_addr()))
}

/// Space separated OAuth scopes (`SPOTIFY_API_AUTH_SCOPE`).
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Base URL of the Web API (`SPOTIFY_API_URL`), e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Base URL of the playlist counter service (`PLAYLIST_COUNTER_URL`).
pub fn playlist_counter_url() -> String {
    var_or("PLAYLIST_COUNTER_URL", DEFAULT_COUNTER_URL)
}

/// Years offered for selection (`CAPSULE_YEARS`, comma separated).
pub fn capsule_years() -> Res<Vec<i32>> {
    let raw = var_or("CAPSULE_YEARS", DEFAULT_CAPSULE_YEARS);
    utils::parse_years(&raw).map_err(CapsuleError::Configuration)
}

/// Builds the process-wide season map from `CAPSULE_YEARS`.
///
/// # Errors
///
/// [`CapsuleError::Configuration`] if the list is empty or contains something
/// that is not a year.
pub fn season_map() -> Res<SeasonMap> {
    build_season_map(capsule_years()?)
}
