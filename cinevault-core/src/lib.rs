//! # Cinevault Core
//!
//! Core library for the Cinevault movie catalog, providing the domain model,
//! storage abstractions, and business logic for movies, genres, and per-user
//! ratings.
//!
//! ## Overview
//!
//! `cinevault-core` is the data-access and aggregation layer of Cinevault:
//!
//! - **Movie Catalog**: Movies with genre sets, unique URL-safe slugs, and
//!   live rating aggregation
//! - **Ratings**: Per-(movie, user) ratings written through a race-free upsert
//! - **Validation**: Business-rule checks that accumulate every violation
//!   before any write goes through
//! - **Storage Abstraction**: Trait-based store ports with interchangeable
//!   PostgreSQL and in-memory backends
//! - **Cache Coherency**: A tag-based invalidation contract triggered by every
//!   successful mutation
//!
//! ## Architecture
//!
//! - [`domain`]: Movie, rating, and query-option types
//! - [`database`]: Store ports plus PostgreSQL and in-memory adapters
//! - [`validation`]: The movie validator and its violation types
//! - [`services`]: Orchestration over validator, stores, and cache
//! - [`cache`]: The tag-based cache invalidation contract
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cinevault_core::cache::NoopCacheInvalidator;
//! use cinevault_core::database::memory::InMemoryCatalog;
//! use cinevault_core::domain::Movie;
//! use cinevault_core::services::MovieService;
//!
//! async fn create_a_movie() -> cinevault_core::Result<()> {
//!     let catalog = Arc::new(InMemoryCatalog::default());
//!     let service = MovieService::new(
//!         Arc::new(catalog.movie_store()),
//!         Arc::new(catalog.rating_store()),
//!         Arc::new(NoopCacheInvalidator),
//!     );
//!
//!     let movie = Movie::new("Spiderman 2", 2004, vec!["Action".to_string()]);
//!     service.create(&movie).await?;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Tag-based cache invalidation contract
pub mod cache;

/// Store ports and their PostgreSQL / in-memory implementations
pub mod database;

/// Movie, rating, and query-option types
pub mod domain;

/// Error types and error handling utilities
pub mod error;

/// Orchestration services over the stores
pub mod services;

/// Business-rule validation for movies
pub mod validation;

pub use error::{CatalogError, Result};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
