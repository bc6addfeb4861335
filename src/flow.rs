//! Playlist materialization as an explicit state machine.
//!
//! ```text
//! Idle ──name──▶ NameChosen ──create──▶ PlaylistCreated ──add──▶ SongsAdded
//!   ▲              │
//!   └──blank name──┘
//! ```
//!
//! A playlist can only be created once a non-blank name is chosen, and songs
//! can only be added to a playlist this flow created.

use crate::{
    Res,
    errors::CapsuleError,
    types::{AddedTracks, PlaylistRef},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlaylistFlow {
    #[default]
    Idle,
    NameChosen {
        name: String,
    },
    PlaylistCreated {
        playlist: PlaylistRef,
    },
    SongsAdded {
        playlist: PlaylistRef,
        added: AddedTracks,
    },
}

impl PlaylistFlow {
    pub fn state(&self) -> &'static str {
        match self {
            PlaylistFlow::Idle => "idle",
            PlaylistFlow::NameChosen { .. } => "named",
            PlaylistFlow::PlaylistCreated { .. } => "created",
            PlaylistFlow::SongsAdded { .. } => "filled",
        }
    }

    /// Picks (or replaces) the name. A blank name puts the flow back to idle.
    pub fn choose_name(self, name: &str) -> Res<Self> {
        match self {
            PlaylistFlow::Idle | PlaylistFlow::NameChosen { .. } => {
                let name = name.trim();
                if name.is_empty() {
                    Ok(PlaylistFlow::Idle)
                } else {
                    Ok(PlaylistFlow::NameChosen {
                        name: name.to_string(),
                    })
                }
            }
            other => Err(CapsuleError::InvalidTransition {
                action: "rename the playlist",
                state: other.state(),
            }),
        }
    }

    pub fn playlist_created(self, playlist: PlaylistRef) -> Res<Self> {
        match self {
            PlaylistFlow::NameChosen { .. } => Ok(PlaylistFlow::PlaylistCreated { playlist }),
            other => Err(CapsuleError::InvalidTransition {
                action: "create a playlist",
                state: other.state(),
            }),
        }
    }

    pub fn songs_added(self, added: AddedTracks) -> Res<Self> {
        match self {
            PlaylistFlow::PlaylistCreated { playlist } => {
                Ok(PlaylistFlow::SongsAdded { playlist, added })
            }
            other => Err(CapsuleError::InvalidTransition {
                action: "add songs",
                state: other.state(),
            }),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PlaylistFlow::Idle => None,
            PlaylistFlow::NameChosen { name } => Some(name),
            PlaylistFlow::PlaylistCreated { playlist } | PlaylistFlow::SongsAdded { playlist, .. } => {
                Some(&playlist.name)
            }
        }
    }

    pub fn playlist(&self) -> Option<&PlaylistRef> {
        match self {
            PlaylistFlow::PlaylistCreated { playlist } | PlaylistFlow::SongsAdded { playlist, .. } => {
                Some(playlist)
            }
            _ => None,
        }
    }

    pub fn can_create(&self) -> bool {
        matches!(self, PlaylistFlow::NameChosen { .. })
    }

    pub fn can_add_songs(&self) -> bool {
        matches!(self, PlaylistFlow::PlaylistCreated { .. })
    }
}
