use std::path::PathBuf;

use chrono::{TimeZone, Utc};

use crate::{
    config, spotify,
    types::{Credential, Token},
};

/// Seconds before expiry at which a token is already treated as stale.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Result<Self, String> {
        let content = async_fs::read_to_string(Self::token_path())
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    /// Refreshes a stale token when possible and returns the credential to use.
    ///
    /// A failed refresh leaves the old token in place; its credential then
    /// reads as expired and every catalog call short-circuits.
    pub async fn credential(&mut self) -> Credential {
        if self.is_expired() {
            match spotify::auth::refresh_token(&self.token.refresh_token).await {
                Ok(new_token) => {
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        log::debug!("cannot persist refreshed token: {}", e);
                    }
                }
                Err(e) => log::debug!("token refresh failed: {}", e),
            }
        }

        self.current_credential()
    }

    pub fn current_credential(&self) -> Credential {
        let expires_at = (self.token.obtained_at + self.token.expires_in) as i64;
        Credential::new(
            self.token.access_token.clone(),
            Utc.timestamp_opt(expires_at, 0).single().unwrap_or_else(Utc::now),
        )
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}
