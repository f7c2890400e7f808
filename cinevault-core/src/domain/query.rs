use uuid::Uuid;

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    YearOfRelease,
}

impl SortField {
    /// Whitelisted column expression for the Postgres adapter. Sorting never
    /// interpolates caller input into SQL.
    pub(crate) fn column(self) -> &'static str {
        match self {
            SortField::Title => "m.title",
            SortField::YearOfRelease => "m.year_of_release",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A sort directive for [`GetAllMoviesOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortBy {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Filter and sort specification for listing queries.
///
/// Absent fields impose no constraint. The same options value parameterizes
/// both the listing and the count query so pagination math always runs
/// against the identical predicate.
#[derive(Debug, Clone, Default)]
pub struct GetAllMoviesOptions {
    /// Case-insensitive "contains" match on the title.
    pub title: Option<String>,
    /// Exact release-year match.
    pub year_of_release: Option<i32>,
    /// When set, the listing joins this user's own rating into each movie.
    pub user_id: Option<Uuid>,
    pub sort: Option<SortBy>,
}

impl GetAllMoviesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_year(mut self, year_of_release: i32) -> Self {
        self.year_of_release = Some(year_of_release);
        self
    }

    pub fn for_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Some(SortBy { field, direction });
        self
    }
}
