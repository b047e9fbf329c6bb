//! Error type shared by every stage of the classifier.

use crate::types::Category;
use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, LibrusError>;

/// Errors raised when input data violates the classifier's contracts.
///
/// All computation is deterministic, so none of these are transient: each one
/// points at malformed data or configuration supplied by the caller.
#[derive(Debug, Error)]
pub enum LibrusError {
  /// Evaluation was invoked with zero records.
  #[error("cannot evaluate an empty record set")]
  EmptyInput,
  /// A record carries a label outside the configured category set, or a
  /// training record carries no label at all.
  #[error("category {category:?} is not part of the configured category set")]
  CategoryMismatch {
    /// The offending label (`None` when the record was unlabeled).
    category: Option<Category>,
  },
  /// Records and predictions handed to the evaluator are not aligned.
  #[error("got {records} records but {predictions} predictions")]
  LengthMismatch {
    /// Number of records supplied.
    records: usize,
    /// Number of predictions supplied.
    predictions: usize,
  },
  /// The frequency table holds no tokens, so smoothing is undefined.
  #[error("frequency table has an empty vocabulary")]
  EmptyVocabulary,
  /// Configuration values are out of range.
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
  /// Filesystem access failed while loading records or configuration.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  /// JSON decoding failed.
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

impl LibrusError {
  pub(crate) fn mismatch(category: Option<&Category>) -> Self {
    Self::CategoryMismatch {
      category: category.cloned(),
    }
  }
}
