//! Orchestration services over the store ports.
//!
//! Services validate, gate on existence, and honor the cache-coherency
//! contract; they never swallow or reinterpret store errors.

mod movies;
mod ratings;

pub use movies::MovieService;
pub use ratings::RatingService;
