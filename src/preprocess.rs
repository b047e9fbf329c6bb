//! Turns raw records into tokenized records.

use crate::normalizer::TextNormalizer;
use crate::types::{RawRecord, Record};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Applies a [`TextNormalizer`] to the title and description of every record.
///
/// Raw records are left untouched; each call produces new [`Record`] values.
pub struct Preprocessor<N> {
  normalizer: N,
}

impl<N: TextNormalizer> Preprocessor<N> {
  /// Create a preprocessor around `normalizer`.
  pub fn new(normalizer: N) -> Self {
    Self { normalizer }
  }

  /// The wrapped normalizer.
  pub fn normalizer(&self) -> &N {
    &self.normalizer
  }

  /// Tokenize a single record.
  pub fn preprocess(&self, raw: &RawRecord) -> Record {
    Record {
      title: self.normalizer.normalize(&raw.title),
      description: self.normalizer.normalize(&raw.description),
      category: raw.category.clone(),
    }
  }

  /// Tokenize a batch of records, preserving order.
  pub fn preprocess_all(&self, raws: &[RawRecord]) -> Vec<Record> {
    debug!(num_records = raws.len(), "Preprocessing records");

    #[cfg(feature = "parallel")]
    let records: Vec<Record> = raws.par_iter().map(|raw| self.preprocess(raw)).collect();

    #[cfg(not(feature = "parallel"))]
    let records: Vec<Record> = raws.iter().map(|raw| self.preprocess(raw)).collect();

    debug!(
      num_tokens = records
        .iter()
        .map(|r| r.title.len() + r.description.len())
        .sum::<usize>(),
      "Preprocessing complete"
    );
    records
  }
}
