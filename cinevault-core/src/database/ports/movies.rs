use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{GetAllMoviesOptions, Movie};
use crate::error::Result;

/// Movie rows and their genre associations.
///
/// Multi-statement writes (create, update, delete) are atomic: every
/// statement commits or none of them is visible. Reads join the live rating
/// aggregate and, when a caller id is supplied, that caller's own rating.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Insert the movie row and its genre rows in one transaction.
    ///
    /// A slug collision surfacing at write time is a
    /// [`CatalogError::Conflict`](crate::CatalogError::Conflict), not a crash.
    async fn create(&self, movie: &Movie) -> Result<()>;

    async fn get_by_id(&self, id: Uuid, user_id: Option<Uuid>) -> Result<Option<Movie>>;

    async fn get_by_slug(&self, slug: &str, user_id: Option<Uuid>) -> Result<Option<Movie>>;

    /// All movies matching the options, materialized. An empty match yields
    /// an empty vec, never an error.
    async fn get_all(&self, options: &GetAllMoviesOptions) -> Result<Vec<Movie>>;

    /// Count of movies matching the same predicates as [`get_all`], for
    /// pagination metadata computed by callers.
    ///
    /// [`get_all`]: MovieStore::get_all
    async fn get_count(&self, title: Option<&str>, year_of_release: Option<i32>) -> Result<i64>;

    /// Replace the entire genre set and overwrite the scalar columns in one
    /// transaction. Returns whether the movie row existed.
    async fn update(&self, movie: &Movie) -> Result<bool>;

    /// Remove rating rows, genre rows, and the movie row in one transaction.
    /// Returns whether a movie row was actually removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;

    async fn exists_by_id(&self, id: Uuid) -> Result<bool>;
}
