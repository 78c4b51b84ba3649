use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::catalog::group_showtimes;
use crate::error::ApiError;
use crate::models::MovieFilters;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/{id}", get(movie_detail))
        .route("/movies/{id}/shows", get(movie_shows))
        .route("/filters", get(filter_options))
}

// The listing UI sends "" for "All", so blank values count as unset
#[derive(Debug, Default, Deserialize)]
pub struct MoviesQuery {
    pub language: Option<String>,
    pub genre: Option<String>,
    pub city: Option<String>,
    pub date: Option<String>,
}

impl TryFrom<MoviesQuery> for MovieFilters {
    type Error = ApiError;

    fn try_from(query: MoviesQuery) -> Result<Self, Self::Error> {
        let date = match non_blank(query.date) {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                ApiError::BadRequest(format!("date must be YYYY-MM-DD, got {raw:?}"))
            })?),
            None => None,
        };
        Ok(MovieFilters {
            language: non_blank(query.language),
            genre: non_blank(query.genre),
            city: non_blank(query.city),
            date,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// GET /api/movies
async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MoviesQuery>,
) -> Result<Json<Value>, ApiError> {
    let filters = MovieFilters::try_from(params)?;

    let movies = if filters.is_empty() {
        state.catalog.list_movies().await?
    } else {
        tracing::debug!(?filters, "filtering movies");
        state.catalog.filter_movies(&filters).await?
    };

    Ok(Json(json!({
        "success": true,
        "count": movies.len(),
        "movies": movies,
    })))
}

// GET /api/movies/{id}
async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    // Movie and schedule load side by side
    let (movie, shows) = futures::try_join!(state.catalog.get_movie(&id), state.catalog.list_shows(&id))?;
    let showtimes = group_showtimes(&shows);

    Ok(Json(json!({
        "success": true,
        "movie": movie,
        "shows": shows,
        "showtimes": showtimes,
    })))
}

// GET /api/movies/{id}/shows
async fn movie_shows(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let movie = state.catalog.get_movie(&id).await?;
    let shows = state.catalog.list_shows(&movie.id).await?;

    Ok(Json(json!({
        "success": true,
        "count": shows.len(),
        "shows": shows,
    })))
}

// GET /api/filters
async fn filter_options(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let options = state.catalog.filter_options().await?;
    Ok(Json(json!({
        "success": true,
        "cities": options.cities,
        "languages": options.languages,
        "genres": options.genres,
    })))
}
