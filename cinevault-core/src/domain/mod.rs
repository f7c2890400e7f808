//! Domain types for the movie catalog.

mod movie;
mod query;
mod rating;

pub use movie::Movie;
pub use query::{GetAllMoviesOptions, SortBy, SortDirection, SortField};
pub use rating::MovieRating;
