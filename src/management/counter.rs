use std::time::Duration;

use reqwest::Client;

use crate::{
    config,
    types::{PlaylistCountResponse, RecordPlaylistRequest},
};

/// How long a single counter request may take before it is given up.
const COUNTER_TIMEOUT: Duration = Duration::from_secs(3);

/// Best-effort client for the service that counts created playlists.
///
/// Nothing here ever fails the caller: errors are logged at debug level and
/// turn into `None`. Every request is bounded by a timeout, so a service that
/// accepts connections but never answers cannot stall a command.
pub struct PlaylistCounter {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl PlaylistCounter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: COUNTER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config() -> Self {
        Self::new(config::playlist_counter_url())
    }

    /// Records a created playlist and returns the refreshed total, if the service answered.
    pub async fn record(&self, playlist_id: &str) -> Option<u64> {
        let posted = self
            .client
            .post(format!("{}/", self.base_url))
            .timeout(self.timeout)
            .json(&RecordPlaylistRequest {
                playlist_id: playlist_id.to_string(),
            })
            .send()
            .await
            .and_then(|r| r.error_for_status());

        if let Err(e) = posted {
            log::debug!("playlist counter unavailable: {}", e);
            return None;
        }

        self.count().await
    }

    pub async fn count(&self) -> Option<u64> {
        let res = self
            .client
            .get(format!("{}/playlistIds", self.base_url))
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let res = match res {
            Ok(res) => res,
            Err(e) => {
                log::debug!("playlist counter unavailable: {}", e);
                return None;
            }
        };

        match res.json::<PlaylistCountResponse>().await {
            Ok(body) => Some(body.count),
            Err(e) => {
                log::debug!("unexpected playlist counter response: {}", e);
                None
            }
        }
    }
}

/// The line shown after a playlist is created, or `None` when there is nothing worth showing.
pub fn created_summary(count: Option<u64>) -> Option<String> {
    count
        .filter(|n| *n > 0)
        .map(|n| format!("Users have created {} playlists since 2022.", n))
}
