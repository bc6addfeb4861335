use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Returns a uniformly shuffled copy of `items`; the input is left untouched.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::rng())
}

/// Fisher-Yates over a copy: for i from last to first, swap with a uniform index in `[0, i]`.
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    for i in (1..copy.len()).rev() {
        let j = rng.random_range(0..=i);
        copy.swap(i, j);
    }
    copy
}

pub fn take<T: Clone>(items: &[T], limit: usize) -> Vec<T> {
    items.iter().take(limit).cloned().collect()
}

/// Genres offered by the `recommend` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    Classical,
    HipHop,
    Chill,
    Alternative,
    Disco,
    AfroBeat,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Classical,
        Genre::HipHop,
        Genre::Chill,
        Genre::Alternative,
        Genre::Disco,
        Genre::AfroBeat,
    ];
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Genre::Classical => "classical",
            Genre::HipHop => "hip-hop",
            Genre::Chill => "chill",
            Genre::Alternative => "alternative",
            Genre::Disco => "disco",
            Genre::AfroBeat => "afro-beat",
        };
        write!(f, "{}", s)
    }
}

pub fn parse_genre(s: &str) -> Result<Genre, String> {
    let wanted = s.trim().to_lowercase();
    Genre::ALL
        .iter()
        .copied()
        .find(|g| g.to_string() == wanted)
        .ok_or_else(|| {
            let known = Genre::ALL
                .iter()
                .map(|g| g.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("unknown genre '{}', expected one of: {}", s, known)
        })
}

/// Parses a 1-based row number as shown in the recommendations table.
pub fn parse_pick(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("invalid row number '{}'", s.trim())),
        Ok(n) => Ok(n),
    }
}

pub fn parse_years(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .map(|y| {
            y.parse::<i32>()
                .map_err(|_| format!("invalid year '{}'", y))
        })
        .collect()
}

/// Song limit as typed by the user, clamped to what a single add call accepts.
pub fn clamp_song_limit(limit: i64) -> usize {
    limit.clamp(0, crate::selection::MAX_CAPSULE_SIZE as i64) as usize
}
