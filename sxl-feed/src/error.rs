use thiserror::Error;

/// Errors raised at the feed boundary.
///
/// Resolution misses (an id absent from a reference table) are deliberately
/// not represented here: they resolve to defaults in the normalizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Transport failure or non-success status while fetching a collection.
    #[error("{collection} feed unavailable: {reason}")]
    Unavailable { collection: String, reason: String },

    /// The document could not be interpreted as a collection of records.
    #[error("{collection} feed is malformed: {detail}")]
    Malformed { collection: String, detail: String },

    /// A replayed feed file could not be read.
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
}

impl FeedError {
    pub fn unavailable(collection: &str, reason: impl ToString) -> Self {
        FeedError::Unavailable {
            collection: collection.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(collection: &str, detail: impl ToString) -> Self {
        FeedError::Malformed {
            collection: collection.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, FeedError::Unavailable { .. })
    }
}
