use serde::Deserialize;
use std::collections::HashSet;

use super::CatalogError;
use crate::booking::layout;
use crate::models::{FilterOptions, Movie, Show};

const SEED_JSON: &str = include_str!("seed.json");

/// Everything the mock catalog serves, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub movies: Vec<Movie>,
    pub shows: Vec<Show>,
    pub options: FilterOptions,
}

pub fn load() -> Result<SeedData, CatalogError> {
    parse(SEED_JSON)
}

pub fn parse(raw: &str) -> Result<SeedData, CatalogError> {
    let seed: SeedData = serde_json::from_str(raw)
        .map_err(|e| CatalogError::LoadFailure(format!("seed data is malformed: {e}")))?;
    validate(&seed)?;
    Ok(seed)
}

fn validate(seed: &SeedData) -> Result<(), CatalogError> {
    let movie_ids: HashSet<&str> = seed.movies.iter().map(|m| m.id.as_str()).collect();
    if movie_ids.len() != seed.movies.len() {
        return Err(CatalogError::LoadFailure("duplicate movie id in seed data".into()));
    }

    let mut show_ids = HashSet::new();
    for show in &seed.shows {
        if !show_ids.insert(show.id.as_str()) {
            return Err(CatalogError::LoadFailure(format!("duplicate show id {}", show.id)));
        }
        if !movie_ids.contains(show.movie_id.as_str()) {
            return Err(CatalogError::LoadFailure(format!(
                "show {} references unknown movie {}",
                show.id, show.movie_id
            )));
        }
        if let Some(seat) = show
            .booked_seats
            .iter()
            .find(|seat| !layout::contains(show.total_seats, seat))
        {
            return Err(CatalogError::LoadFailure(format!(
                "show {} books seat {} outside its {} seats",
                show.id, seat, show.total_seats
            )));
        }
    }
    Ok(())
}
