//! Spotify Time Capsule Library
//!
//! Samples the songs a user added to their playlists during a past season and
//! seeds recommendations from their library, then turns either result into a
//! new playlist.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `calendar` - maps a year and season to a concrete time range
//! - `cli` - command implementations
//! - `config` - configuration from the environment and `.env`
//! - `errors` - the error taxonomy shared by every module
//! - `flow` - playlist materialization state machine
//! - `management` - token persistence and the playlist counter
//! - `selection` - time window sampling and recommendation seeding
//! - `server` - local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client
//! - `types` - wire and domain data types
//! - `utils` - shuffling, parsing and PKCE helpers
//!
//! # Example
//!
//! ```
//! use timecapsule::{calendar, selection, spotify};
//!
//! async fn capsule(session: &spotify::Session) -> timecapsule::Res<Vec<String>> {
//!     let map = calendar::build_season_map([2021])?;
//!     let range = calendar::get_season_range(&map, 2021, calendar::Season::Summer)
//!         .expect("configured above");
//!     let snapshot = spotify::library::aggregate(session).await?;
//!     Ok(selection::select_window(&snapshot, &range, 20)?.uris)
//! }
//! ```

pub mod api;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod errors;
pub mod flow;
pub mod management;
pub mod selection;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias used throughout the crate.
///
/// Every failure is a [`errors::CapsuleError`], whose message is safe to show
/// to the user as-is.
pub type Res<T> = std::result::Result<T, errors::CapsuleError>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching your playlists...");
/// info!("Found {} songs", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// ```
/// success!("Playlist {} created", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary and the `cli` layer use this; library code returns
/// [`errors::CapsuleError`] instead.
///
/// ```
/// error!("Cannot load configuration: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures the user can fix by retrying or picking
/// different input.
///
/// ```
/// warning!("No songs found for the selected time frame.");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
