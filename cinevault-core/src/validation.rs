//! Business-rule validation for movies.
//!
//! The validator runs before create and update and accumulates every broken
//! rule into a single [`ValidationFailure`] rather than failing on the first.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, Utc};

use crate::database::ports::MovieStore;
use crate::domain::Movie;
use crate::error::{CatalogError, Result};

/// A single broken business rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    /// The movie field the rule applies to.
    pub property: &'static str,
    pub message: String,
}

impl RuleViolation {
    fn new(property: &'static str, message: impl Into<String>) -> Self {
        Self {
            property,
            message: message.into(),
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.message)
    }
}

/// The full set of rules a movie broke, carried as a value instead of a
/// thrown fault so callers check it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub violations: Vec<RuleViolation>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Validates movies against the catalog's business rules.
///
/// Holds a movie store so the slug-uniqueness rule can look up the slug's
/// current owner; an update re-validating its own unchanged slug passes.
pub struct MovieValidator {
    movies: Arc<dyn MovieStore>,
}

impl fmt::Debug for MovieValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovieValidator").finish_non_exhaustive()
    }
}

impl MovieValidator {
    pub fn new(movies: Arc<dyn MovieStore>) -> Self {
        Self { movies }
    }

    /// Check every rule, returning [`CatalogError::Validation`] carrying all
    /// violations when any rule is broken.
    pub async fn validate(&self, movie: &Movie) -> Result<()> {
        let mut violations = Vec::new();

        if movie.id.is_nil() {
            violations.push(RuleViolation::new("id", "movie id cannot be empty"));
        }

        if movie.title.trim().is_empty() {
            violations.push(RuleViolation::new("title", "title cannot be empty"));
        }

        if movie.genres.is_empty() {
            violations.push(RuleViolation::new("genres", "at least one genre is required"));
        } else if movie.genres.iter().any(|genre| genre.trim().is_empty()) {
            violations.push(RuleViolation::new("genres", "genre names cannot be empty"));
        }

        let current_year = Utc::now().year();
        if movie.year_of_release > current_year {
            violations.push(RuleViolation::new(
                "year_of_release",
                format!("year of release cannot be later than {current_year}"),
            ));
        }

        let slug = movie.slug();
        if let Some(existing) = self.movies.get_by_slug(&slug, None).await?
            && existing.id != movie.id
        {
            violations.push(RuleViolation::new("slug", "this movie already exists"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(ValidationFailure { violations }))
        }
    }
}
