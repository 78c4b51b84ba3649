use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub description: String,
    pub poster: String,
    pub genre: Vec<String>,
    pub language: Vec<String>,
    pub rating: f32,
    pub duration: String,
    pub release_date: NaiveDate,
    pub cast: Vec<String>,
    pub director: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,
}

impl Movie {
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre.iter().any(|g| g == genre)
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.language.iter().any(|l| l == language)
    }
}
