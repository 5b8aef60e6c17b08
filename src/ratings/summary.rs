use crate::api::Rate;

use super::Rating;

/// Aggregate of every rating a movie has received.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSummary {
    pub movie_id: String,
    /// Mean rating, `0.0` when nobody rated the movie.
    pub average: f64,
    pub count: usize,
    /// The requesting user's own rating, if any.
    pub user_rating: Option<Rating>,
}

impl RatingSummary {
    /// Derive the summary for `movie_id` from the full list of rates.
    ///
    /// Out-of-range values sent by the service count towards the average but
    /// are never reported as the user's own rating.
    pub fn from_rates(rates: &[Rate], movie_id: &str, user_id: Option<&str>) -> Self {
        let for_movie: Vec<&Rate> = rates.iter().filter(|rate| rate.movie == movie_id).collect();

        let count = for_movie.len();
        let average = if count == 0 {
            0.0
        } else {
            let total: u32 = for_movie.iter().map(|rate| u32::from(rate.rating_value)).sum();
            f64::from(total) / count as f64
        };
        let user_rating = user_id.and_then(|user_id| {
            for_movie
                .iter()
                .find(|rate| rate.user == user_id)
                .and_then(|rate| Rating::new(rate.rating_value).ok())
        });

        RatingSummary {
            movie_id: movie_id.to_string(),
            average,
            count,
            user_rating,
        }
    }
}
