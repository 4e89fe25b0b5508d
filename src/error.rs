//! Error types for catalog lookups and batch loads

/// A single catalog request failed. Returned as a value, never raised past the client.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("catalog answered with status {0}")]
    Status(u16),
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status(404))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The category listing could not be fetched or has no list of members.
    #[error("catalog unavailable for type '{category}': {reason}")]
    CatalogUnavailable { category: String, reason: String },
    #[error("load cancelled")]
    Cancelled,
}

impl LoadError {
    pub(crate) fn unavailable(category: &str, reason: impl Into<String>) -> Self {
        LoadError::CatalogUnavailable {
            category: category.to_string(),
            reason: reason.into(),
        }
    }
}
