//! Configuration loading for Cinevault.
//!
//! Settings come from the environment (with `.env` support via `dotenvy`):
//! either a full `DATABASE_URL`, or discrete `DATABASE_HOST` / `DATABASE_PORT`
//! / `DATABASE_NAME` / `DATABASE_USER` / `DATABASE_PASSWORD` parts composed
//! into one. Empty or whitespace-only values are treated as unset.

mod loader;
mod models;

pub use loader::{load, resolve_database_url};
pub use models::{ConfigLoadError, EnvConfig, Settings};
