use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::models::{FilterOptions, Movie, MovieFilters, Show};

pub mod filter;
pub mod seed;

pub use filter::filter_movies;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("failed to load catalog data: {0}")]
    LoadFailure(String),
}

impl CatalogError {
    pub fn movie_not_found(id: &str) -> Self {
        CatalogError::NotFound {
            entity: "movie",
            id: id.to_string(),
        }
    }

    pub fn show_not_found(id: &str) -> Self {
        CatalogError::NotFound {
            entity: "show",
            id: id.to_string(),
        }
    }
}

/// Read-only movie and show lookups.
///
/// Handlers only talk to the catalog through this trait so a different
/// source can be swapped in without touching the booking flow.
pub trait CatalogService: Send + Sync {
    fn list_movies(&self) -> BoxFuture<'_, Result<Vec<Movie>, CatalogError>>;

    fn get_movie<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Movie, CatalogError>>;

    fn list_shows<'a>(&'a self, movie_id: &'a str) -> BoxFuture<'a, Result<Vec<Show>, CatalogError>>;

    fn get_show<'a>(&'a self, show_id: &'a str) -> BoxFuture<'a, Result<Show, CatalogError>>;

    fn filter_movies<'a>(
        &'a self,
        filters: &'a MovieFilters,
    ) -> BoxFuture<'a, Result<Vec<Movie>, CatalogError>>;

    fn filter_options(&self) -> BoxFuture<'_, Result<FilterOptions, CatalogError>>;
}

// Base delays per operation, before the configured factor
const LIST_MOVIES_DELAY: Duration = Duration::from_millis(800);
const GET_MOVIE_DELAY: Duration = Duration::from_millis(500);
const LIST_SHOWS_DELAY: Duration = Duration::from_millis(600);
const GET_SHOW_DELAY: Duration = Duration::from_millis(400);
const FILTER_DELAY: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, Copy)]
pub struct Latency {
    enabled: bool,
    factor: f64,
}

impl Latency {
    pub fn none() -> Self {
        Self {
            enabled: false,
            factor: 0.0,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            enabled: config.simulate_latency,
            factor: config.latency_factor,
        }
    }

    pub fn scaled(&self, base: Duration) -> Duration {
        if self.enabled {
            Duration::try_from_secs_f64(base.as_secs_f64() * self.factor).unwrap_or(base)
        } else {
            Duration::ZERO
        }
    }

    async fn wait(&self, base: Duration) {
        let delay = self.scaled(base);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Catalog backed by the bundled seed data.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    movies: Vec<Movie>,
    shows: Vec<Show>,
    options: FilterOptions,
    latency: Latency,
}

impl MockCatalog {
    pub fn new(seed: seed::SeedData, latency: Latency) -> Self {
        Self {
            movies: seed.movies,
            shows: seed.shows,
            options: seed.options,
            latency,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let seed = seed::load()?;
        debug!(
            movies = seed.movies.len(),
            shows = seed.shows.len(),
            "loaded catalog seed"
        );
        Ok(Self::new(seed, Latency::from_config(config)))
    }

    /// Seed catalog that answers immediately.
    pub fn without_latency() -> Result<Self, CatalogError> {
        Ok(Self::new(seed::load()?, Latency::none()))
    }
}

impl CatalogService for MockCatalog {
    fn list_movies(&self) -> BoxFuture<'_, Result<Vec<Movie>, CatalogError>> {
        async move {
            self.latency.wait(LIST_MOVIES_DELAY).await;
            Ok(self.movies.clone())
        }
        .boxed()
    }

    fn get_movie<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Movie, CatalogError>> {
        async move {
            self.latency.wait(GET_MOVIE_DELAY).await;
            self.movies
                .iter()
                .find(|movie| movie.id == id)
                .cloned()
                .ok_or_else(|| CatalogError::movie_not_found(id))
        }
        .boxed()
    }

    fn list_shows<'a>(&'a self, movie_id: &'a str) -> BoxFuture<'a, Result<Vec<Show>, CatalogError>> {
        async move {
            self.latency.wait(LIST_SHOWS_DELAY).await;
            Ok(self
                .shows
                .iter()
                .filter(|show| show.movie_id == movie_id)
                .cloned()
                .collect())
        }
        .boxed()
    }

    fn get_show<'a>(&'a self, show_id: &'a str) -> BoxFuture<'a, Result<Show, CatalogError>> {
        async move {
            self.latency.wait(GET_SHOW_DELAY).await;
            self.shows
                .iter()
                .find(|show| show.id == show_id)
                .cloned()
                .ok_or_else(|| CatalogError::show_not_found(show_id))
        }
        .boxed()
    }

    fn filter_movies<'a>(
        &'a self,
        filters: &'a MovieFilters,
    ) -> BoxFuture<'a, Result<Vec<Movie>, CatalogError>> {
        async move {
            self.latency.wait(FILTER_DELAY).await;
            Ok(filter::filter_movies(&self.movies, &self.shows, filters))
        }
        .boxed()
    }

    fn filter_options(&self) -> BoxFuture<'_, Result<FilterOptions, CatalogError>> {
        async move { Ok(self.options.clone()) }.boxed()
    }
}

/// Shows of one movie keyed by `"{theater} - {city}"`, then by date.
pub type ShowtimeGroups = BTreeMap<String, BTreeMap<chrono::NaiveDate, Vec<Show>>>;

pub fn group_showtimes(shows: &[Show]) -> ShowtimeGroups {
    let mut grouped = ShowtimeGroups::new();
    for show in shows {
        grouped
            .entry(format!("{} - {}", show.theater, show.city))
            .or_default()
            .entry(show.date)
            .or_default()
            .push(show.clone());
    }
    grouped
}
