//! Movie ratings: the user's own 1..=5 rating, applied optimistically, plus
//! the aggregate shown next to it.

mod board;
mod rating;
mod summary;

pub use board::{RatingBoard, RatingUpdate};
pub use rating::{InvalidRating, Rating};
pub use summary::RatingSummary;
