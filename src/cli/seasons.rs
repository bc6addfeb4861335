use tabled::Table;

use crate::{config, error, types::SeasonTableRow, warning};

pub fn seasons(year: Option<i32>) {
    let season_map = match config::season_map() {
        Ok(map) => map,
        Err(e) => error!("{}", e),
    };

    if let Some(year) = year {
        if season_map.seasons_of(year).is_none() {
            let available = season_map
                .years()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            warning!("{} is not configured. Available years: {}", year, available);
            return;
        }
    }

    let rows: Vec<SeasonTableRow> = season_map
        .years()
        .filter(|y| year.is_none_or(|wanted| wanted == *y))
        .flat_map(|y| {
            season_map
                .seasons_of(y)
                .into_iter()
                .flatten()
                .map(move |(season, range)| SeasonTableRow {
                    year: y,
                    season: season.to_string(),
                    from: range.start.format("%Y-%m-%d").to_string(),
                    to: range.end.format("%Y-%m-%d").to_string(),
                })
        })
        .collect();

    println!("{}", Table::new(rows));
}
