//! # API Module
//!
//! HTTP endpoints of the short-lived local server that receives the Spotify
//! OAuth redirect.
//!
//! - [`callback`] - completes the PKCE flow by exchanging the authorization
//!   code for a token and handing it to the waiting `auth` command
//! - [`health`] - status and version, handy to check the server is reachable
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use timecapsule::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
