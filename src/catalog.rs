//! Pure helpers over a fetched movie list.

use chrono::{DateTime, NaiveDate};

use crate::api::Movie;

pub const RELATED_LIMIT: usize = 3;
pub const RECENT_LIMIT: usize = 5;

/// Movies whose title contains `title_query` (case-insensitive) and whose
/// genre equals `genre`. An empty query or genre matches everything.
pub fn filter_movies<'a>(movies: &'a [Movie], title_query: &str, genre: &str) -> Vec<&'a Movie> {
    let query = title_query.trim().to_lowercase();
    let genre = genre.trim();
    movies
        .iter()
        .filter(|movie| query.is_empty() || movie.title.to_lowercase().contains(&query))
        .filter(|movie| genre.is_empty() || movie.genre == genre)
        .collect()
}

/// Distinct non-empty genres, in the order they first appear.
pub fn genres(movies: &[Movie]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for movie in movies {
        let genre = movie.genre.as_str();
        if !genre.is_empty() && !seen.contains(&genre) {
            seen.push(genre);
        }
    }
    seen
}

/// Up to `limit` other movies sharing `movie`'s genre.
pub fn related_movies<'a>(movies: &'a [Movie], movie: &Movie, limit: usize) -> Vec<&'a Movie> {
    movies
        .iter()
        .filter(|other| other.id != movie.id && other.genre == movie.genre)
        .take(limit)
        .collect()
}

/// Up to `limit` movies, newest `published_at` first. Movies without a
/// readable date come last, in list order.
pub fn recent_movies(movies: &[Movie], limit: usize) -> Vec<&Movie> {
    let mut dated: Vec<(Option<i64>, &Movie)> = movies
        .iter()
        .map(|movie| (movie.published_at.as_deref().and_then(published_timestamp), movie))
        .collect();
    // Stable, so equal dates keep list order. `None` sorts below every `Some`.
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));
    dated.into_iter().take(limit).map(|(_, movie)| movie).collect()
}

fn published_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp())
}
