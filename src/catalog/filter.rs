use std::collections::HashSet;

use crate::models::{Movie, MovieFilters, Show};

/// Movies matching every criterion that is set.
///
/// Language and genre match when the movie lists the value. City matches when
/// at least one show of the movie plays there. `date` is carried by
/// [`MovieFilters`] but does not narrow the movie list.
pub fn filter_movies(movies: &[Movie], shows: &[Show], filters: &MovieFilters) -> Vec<Movie> {
    let playing_in_city: Option<HashSet<&str>> = filters.city.as_deref().map(|city| {
        shows
            .iter()
            .filter(|show| show.city == city)
            .map(|show| show.movie_id.as_str())
            .collect()
    });

    movies
        .iter()
        .filter(|movie| {
            filters
                .language
                .as_deref()
                .map_or(true, |language| movie.has_language(language))
        })
        .filter(|movie| filters.genre.as_deref().map_or(true, |genre| movie.has_genre(genre)))
        .filter(|movie| {
            playing_in_city
                .as_ref()
                .map_or(true, |ids| ids.contains(movie.id.as_str()))
        })
        .cloned()
        .collect()
}
