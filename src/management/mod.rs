mod auth;
mod counter;

pub use auth::TokenManager;
pub use counter::{PlaylistCounter, created_summary};
