//! Season calendar.
//!
//! Maps a `(year, season)` pair to a concrete UTC interval. Seasons follow the
//! meteorological convention and winter wraps backwards into the previous
//! calendar year:
//!
//! | Season | From            | To (inclusive)           |
//! |--------|-----------------|--------------------------|
//! | Winter | 1 Dec of Y-1    | last instant of Feb, Y   |
//! | Spring | 1 Mar of Y      | last instant of May, Y   |
//! | Summer | 1 Jun of Y      | last instant of Aug, Y   |
//! | Fall   | 1 Sep of Y      | last instant of Nov, Y   |
//!
//! The four ranges of a year tile `[1 Dec Y-1, 1 Dec Y)` exactly: every range
//! ends one nanosecond before the next one starts, so inclusive bounds on both
//! ends never overlap.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::{Res, errors::CapsuleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// `(year offset, month)` of the first day of the season.
    fn start_month(self) -> (i32, u32) {
        match self {
            Season::Winter => (-1, 12),
            Season::Spring => (0, 3),
            Season::Summer => (0, 6),
            Season::Fall => (0, 9),
        }
    }

    fn next_start_month(self) -> (i32, u32) {
        match self {
            Season::Winter => (0, 3),
            Season::Spring => (0, 6),
            Season::Summer => (0, 9),
            Season::Fall => (0, 12),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            other => Err(format!(
                "unknown season '{}', expected one of: winter, spring, summer, fall",
                other
            )),
        }
    }
}

/// Closed interval `[start, end]` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SeasonRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn overlaps(&self, other: &SeasonRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Immutable year → season → range lookup, built once from the configured years.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonMap {
    years: BTreeMap<i32, BTreeMap<Season, SeasonRange>>,
}

impl SeasonMap {
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn seasons_of(&self, year: i32) -> Option<&BTreeMap<Season, SeasonRange>> {
        self.years.get(&year)
    }
}

fn month_start(year: i32, month: u32) -> Res<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok_or_else(|| {
            CapsuleError::Configuration(format!("year {} is outside the supported calendar", year))
        })
}

fn season_range(year: i32, season: Season) -> Res<SeasonRange> {
    let (start_offset, start_month) = season.start_month();
    let (next_offset, next_month) = season.next_start_month();

    let start = month_start(year + start_offset, start_month)?;
    let next_start = month_start(year + next_offset, next_month)?;

    Ok(SeasonRange {
        start,
        end: next_start - Duration::nanoseconds(1),
    })
}

pub fn build_season_map<I>(years: I) -> Res<SeasonMap>
where
    I: IntoIterator<Item = i32>,
{
    let mut map = BTreeMap::new();

    for year in years {
        let mut seasons = BTreeMap::new();
        for season in Season::ALL {
            seasons.insert(season, season_range(year, season)?);
        }
        map.insert(year, seasons);
    }

    if map.is_empty() {
        return Err(CapsuleError::Configuration(
            "at least one capsule year must be configured".to_string(),
        ));
    }

    Ok(SeasonMap { years: map })
}

/// Absent when the pair was never configured; callers report "no selection possible".
pub fn get_season_range(map: &SeasonMap, year: i32, season: Season) -> Option<SeasonRange> {
    map.years
        .get(&year)
        .and_then(|seasons| seasons.get(&season))
        .copied()
}
