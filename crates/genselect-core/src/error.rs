//! Selector error types.

use thiserror::Error;

use crate::condition::ConditionKind;
use crate::source::SourceId;

/// Errors that can occur while registering or selecting from sources.
///
/// Running out of sources is not an error: a selection simply ends.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("source already registered: {0}")]
    DuplicateSource(SourceId),

    #[error("label already registered: {0}")]
    DuplicateLabel(String),

    #[error("label/source mismatch: {labels} labels for {sources} sources")]
    LabelMismatch { labels: usize, sources: usize },

    #[error("{kind} condition failed: {source}")]
    Predicate {
        kind: ConditionKind,
        #[source]
        source: anyhow::Error,
    },
}

impl SelectError {
    /// Whether this error came from a caller-supplied condition.
    pub fn is_predicate(&self) -> bool {
        matches!(self, SelectError::Predicate { .. })
    }
}

pub type SelectResult<T> = Result<T, SelectError>;
