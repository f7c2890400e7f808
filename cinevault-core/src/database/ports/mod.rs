//! Store ports (interfaces) for the catalog.
//!
//! Implementations live in the Postgres adapter under `database::postgres`
//! and the list-backed adapter under `database::memory`.

mod movies;
mod ratings;

pub use movies::MovieStore;
pub use ratings::RatingStore;
