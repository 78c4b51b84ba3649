use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Criteria for the movie listing. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieFilters {
    pub language: Option<String>,
    pub genre: Option<String>,
    pub city: Option<String>,
    // Accepted for parity with the listing UI, not used when filtering movies
    pub date: Option<NaiveDate>,
}

impl MovieFilters {
    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.genre.is_none() && self.city.is_none() && self.date.is_none()
    }
}

/// Values the listing UI offers in its dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub languages: Vec<String>,
    pub genres: Vec<String>,
}
