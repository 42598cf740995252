use thiserror::Error;

/// Failures of the data store. Pages never show these; they become `NotFound`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid page number {0:?}")]
    InvalidPage(String),
    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(usize),
    #[error("invalid restaurant id {0:?}")]
    InvalidId(String),
    #[error("malformed slug {0:?}")]
    MalformedSlug(String),
    #[error("no page matches {0:?}")]
    UnknownRoute(String),
}

impl ListingError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ListingError::NotFound(_))
    }
}
