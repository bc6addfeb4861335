//! # CLI Module
//!
//! User-facing commands. Each command loads what it needs (configuration,
//! stored token), drives the library modules and prints the outcome with the
//! crate's output macros and `tabled` tables.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth authentication with PKCE
//! - [`seasons`] - lists the configured years and their season ranges
//! - [`capsule`] - samples songs added during a season, optionally saving them as a playlist
//! - [`recommend`] - recommendations seeded from the library, optionally saved as a playlist
//! - [`stats`] - how many playlists have been created with the tool
//!
//! ## Error presentation
//!
//! Library errors are printed once, using their user-facing message. Recoverable
//! failures (empty selections, rate limits, failed writes) are warnings and
//! the user simply runs the command again; configuration errors are fatal.
//!
//! ## Usage
//!
//! ```bash
//! timecapsule auth
//! timecapsule seasons
//! timecapsule capsule --year 2021 --season summer --limit 25 --name "Summer '21"
//! timecapsule recommend --genre chill --genre disco --name "Chill Disco" --pick 1,4,7
//! ```

mod auth;
mod capsule;
mod playlist;
mod recommend;
mod seasons;
mod stats;

pub use auth::auth;
pub use capsule::capsule;
pub use recommend::recommend;
pub use seasons::seasons;
pub use stats::stats;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{errors::CapsuleError, management::TokenManager, spotify::Session, warning};

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// A session for the stored token. Without one every catalog call short-circuits.
async fn load_session() -> Session {
    let credential = match TokenManager::load().await {
        Ok(mut manager) => Some(manager.credential().await),
        Err(e) => {
            log::debug!("no stored token: {}", e);
            None
        }
    };

    Session::from_config(credential)
}

fn report(e: &CapsuleError) {
    log::debug!("{:?}", e);
    if e.is_recoverable() {
        warning!("{}", e);
    } else {
        crate::error!("{}", e);
    }
}
