//! # Spotify Integration Module
//!
//! The catalog collaborator of the time capsule. Everything that talks to the
//! Spotify Web API lives here; the selection logic in [`crate::selection`] and
//! [`crate::calendar`] never performs I/O.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!      ↓
//! Spotify Integration Layer
//!     ├── Session (bearer credential, base URL, shared HTTP client)
//!     ├── Library (playlists → tracks → LibrarySnapshot)
//!     ├── Recommendations (seeded track suggestions)
//!     ├── Playlist (owner lookup, create, add tracks)
//!     └── Authentication (OAuth 2.0 PKCE)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Credentials
//!
//! Every request goes through [`Session`]. A session whose credential is
//! empty or expired refuses to send anything and returns
//! [`CapsuleError::MissingCredential`] instead.
//!
//! ## API Coverage
//!
//! - `GET /me` - owner id for playlist creation
//! - `GET /me/playlists?limit=50` - a single page of the user's playlists
//! - `GET <playlist tracks href>` - items of one playlist
//! - `GET /recommendations` - seeded suggestions
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `POST /playlists/{playlist_id}/tracks` - add tracks at position 0
//!
//! ## Retries
//!
//! No call is retried. A failure is reported once and the user re-runs the
//! command.

pub mod auth;
pub mod library;
pub mod playlist;
pub mod recommendations;

use chrono::Utc;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{Res, config, errors::CapsuleError, types::Credential};

/// An authorized handle on the catalog service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    api_url: String,
    credential: Option<Credential>,
}

impl Session {
    pub fn new(api_url: impl Into<String>, credential: Option<Credential>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credential,
        }
    }

    pub fn from_config(credential: Option<Credential>) -> Self {
        Self::new(config::spotify_apiurl(), credential)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn bearer(&self) -> Res<&str> {
        match &self.credential {
            Some(c) if c.is_usable_at(Utc::now()) => Ok(&c.access_token),
            _ => Err(CapsuleError::MissingCredential),
        }
    }

    pub(crate) fn get(&self, url: &str) -> Res<RequestBuilder> {
        let token = self.bearer()?;
        log::debug!("GET {}", url);
        Ok(self.client.get(url).bearer_auth(token))
    }

    pub(crate) fn post(&self, url: &str) -> Res<RequestBuilder> {
        let token = self.bearer()?;
        log::debug!("POST {}", url);
        Ok(self.client.post(url).bearer_auth(token))
    }
}

/// Sends the request, maps non-2xx statuses to errors and decodes the JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, reqwest::Error> {
    request
        .send()
        .await?
        .error_for_status()?
        .json::<T>()
        .await
}
