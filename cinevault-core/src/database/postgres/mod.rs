//! PostgreSQL adapters for the store ports.

mod movies;
mod ratings;

pub use movies::PostgresMovieStore;
pub use ratings::PostgresRatingStore;
