//! Error taxonomy for the time capsule pipeline.
//!
//! Every variant renders as exactly one user-facing message. Transport errors
//! are carried as the `source` of a variant so they can be logged, but they are
//! never part of the message shown to the user.

use std::fmt;

use thiserror::Error;

/// Which retrieval step failed while talking to the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Profile,
    Playlists,
    Tracks,
    Recommendations,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchStage::Profile => "profile",
            FetchStage::Playlists => "playlists",
            FetchStage::Tracks => "tracks",
            FetchStage::Recommendations => "recommendations",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
pub enum CapsuleError {
    /// Bad static setup. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No credential, or the credential has expired. Raised before any request is sent.
    #[error("Please log in with Spotify first. Run timecapsule auth.")]
    MissingCredential,

    #[error("There was a problem fetching your {stage} from Spotify. You might be rate-limited.")]
    Fetch {
        stage: FetchStage,
        #[source]
        source: reqwest::Error,
    },

    #[error("No songs found for the selected time frame. Try a different year/season.")]
    EmptySelection,

    #[error("Failed to create playlist.")]
    Create(#[source] reqwest::Error),

    #[error("Could not add songs to your playlist.")]
    Add(#[source] reqwest::Error),

    #[error("The operation was interrupted. Please try again.")]
    Interrupted,

    #[error("Cannot {action} while the playlist is {state}.")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

impl CapsuleError {
    pub fn fetch(stage: FetchStage) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| CapsuleError::Fetch { stage, source }
    }

    /// Failures the user can recover from by picking different input or retrying.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CapsuleError::Configuration(_))
    }
}
