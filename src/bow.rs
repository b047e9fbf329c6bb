//! Bag-of-words model construction.
//!
//! A [`FrequencyTable`] stores, for every configured category, a weighted
//! count for every token in the training vocabulary. Counts live in dense rows
//! indexed by vocabulary position, so every category always shares the same
//! key set: a token is either known to all categories (possibly with a count
//! of zero) or to none of them.

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::types::{Category, CategorySet, Record};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// The distinct tokens seen during training, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Vocabulary {
  tokens: Vec<String>,
  #[serde(skip)]
  index: HashMap<String, usize>,
}

impl Vocabulary {
  /// Create an empty vocabulary.
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds `token` if unseen and returns its position.
  pub fn insert(&mut self, token: &str) -> usize {
    if let Some(&position) = self.index.get(token) {
      return position;
    }
    let position = self.tokens.len();
    self.tokens.push(token.to_string());
    self.index.insert(token.to_string(), position);
    position
  }

  /// Position of `token`, if known.
  pub fn get(&self, token: &str) -> Option<usize> {
    self.index.get(token).copied()
  }

  /// Whether `token` was seen during training.
  pub fn contains(&self, token: &str) -> bool {
    self.index.contains_key(token)
  }

  /// Token at `position`.
  pub fn token(&self, position: usize) -> Option<&str> {
    self.tokens.get(position).map(String::as_str)
  }

  /// Number of distinct tokens.
  pub fn len(&self) -> usize {
    self.tokens.len()
  }

  /// Whether no token has been seen.
  pub fn is_empty(&self) -> bool {
    self.tokens.is_empty()
  }

  /// Tokens in first-seen order.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.tokens.iter().map(String::as_str)
  }
}

/// Total count per category (the "dot product" normalizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMass(Vec<u64>);

impl CategoryMass {
  /// Mass of the category at `index`.
  pub fn get(&self, index: usize) -> u64 {
    self.0.get(index).copied().unwrap_or(0)
  }

  /// Sum over all categories.
  pub fn total(&self) -> u64 {
    self.0.iter().sum()
  }

  /// Per-category masses in configured order.
  pub fn as_slice(&self) -> &[u64] {
    &self.0
  }
}

/// Per-category token counts produced by [`BagOfWordsBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
  categories: CategorySet,
  vocabulary: Vocabulary,
  counts: Vec<Vec<u64>>,
}

impl FrequencyTable {
  /// The categories the table was built for.
  pub fn categories(&self) -> &CategorySet {
    &self.categories
  }

  /// The training vocabulary.
  pub fn vocabulary(&self) -> &Vocabulary {
    &self.vocabulary
  }

  /// Number of distinct training tokens.
  pub fn vocab_size(&self) -> usize {
    self.vocabulary.len()
  }

  /// Count of `token` in `category`; `None` if either is unknown.
  pub fn count(&self, category: &str, token: &str) -> Option<u64> {
    let row = self.categories.index_of(category)?;
    let column = self.vocabulary.get(token)?;
    Some(self.counts[row][column])
  }

  /// Dense count row of the category at `index`, aligned with the vocabulary.
  pub fn row(&self, index: usize) -> &[u64] {
    &self.counts[index]
  }

  /// Category labels paired with their dense rows.
  pub fn rows(&self) -> impl Iterator<Item = (&Category, &[u64])> {
    self
      .categories
      .iter()
      .zip(self.counts.iter().map(Vec::as_slice))
  }

  /// The token to count map of one category, zero entries included.
  pub fn category_table(&self, category: &str) -> Option<HashMap<&str, u64>> {
    let row = self.categories.index_of(category)?;
    Some(
      self
        .vocabulary
        .iter()
        .zip(self.counts[row].iter().copied())
        .collect(),
    )
  }

  /// Sum of counts per category.
  pub fn category_mass(&self) -> CategoryMass {
    CategoryMass(self.counts.iter().map(|row| row.iter().sum()).collect())
  }
}

/// Builds a [`FrequencyTable`] from tokenized training records.
///
/// Construction runs in two passes: the first validates every label and
/// collects the vocabulary, the second allocates one dense row per category
/// and accumulates weighted counts (title tokens weigh
/// [`ClassifierConfig::title_weight`], description tokens
/// [`ClassifierConfig::description_weight`]).
///
/// # Example
///
/// ```rust
/// use librus::prelude::*;
///
/// let config = ClassifierConfig::builder().categories(["a", "b"]).build().unwrap();
/// let training = vec![
///     Record::new(["x"], ["w"]).with_category("a"),
///     Record::new(["y"], []).with_category("b"),
/// ];
///
/// let table = BagOfWordsBuilder::new(&config).build(&training).unwrap();
/// assert_eq!(table.count("a", "x"), Some(5));
/// assert_eq!(table.count("a", "w"), Some(1));
/// assert_eq!(table.count("b", "x"), Some(0));
/// assert_eq!(table.vocab_size(), 3);
/// ```
pub struct BagOfWordsBuilder<'a> {
  config: &'a ClassifierConfig,
}

impl<'a> BagOfWordsBuilder<'a> {
  /// Create a builder for `config`.
  pub fn new(config: &'a ClassifierConfig) -> Self {
    Self { config }
  }

  /// Build the table. Fails with
  /// [`CategoryMismatch`](crate::error::LibrusError::CategoryMismatch) if a
  /// record is unlabeled or labeled outside the configured set.
  pub fn build(&self, records: &[Record]) -> Result<FrequencyTable> {
    let categories = &self.config.categories;
    debug!(
      num_records = records.len(),
      num_categories = categories.len(),
      "Building bag of words"
    );

    let mut vocabulary = Vocabulary::new();
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
      rows.push(categories.require(record.category.as_ref())?);
      for token in record.tokens() {
        vocabulary.insert(token);
      }
    }
    debug!(vocab_size = vocabulary.len(), "Vocabulary collected");

    let mut counts = vec![vec![0u64; vocabulary.len()]; categories.len()];
    for (record, &row) in records.iter().zip(rows.iter()) {
      let weighted = record
        .title
        .iter()
        .map(|t| (t, self.config.title_weight))
        .chain(
          record
            .description
            .iter()
            .map(|t| (t, self.config.description_weight)),
        );
      for (token, weight) in weighted {
        if let Some(column) = vocabulary.get(token) {
          counts[row][column] += weight;
        }
      }
    }

    let table = FrequencyTable {
      categories: categories.clone(),
      vocabulary,
      counts,
    };
    debug!(total_mass = table.category_mass().total(), "Bag of words complete");
    Ok(table)
  }
}

/// Shorthand for `BagOfWordsBuilder::new(config).build(records)`.
pub fn build(records: &[Record], config: &ClassifierConfig) -> Result<FrequencyTable> {
  BagOfWordsBuilder::new(config).build(records)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::LibrusError;
  use std::collections::HashSet;

  fn config() -> ClassifierConfig {
    ClassifierConfig::builder()
      .categories(["a", "b", "c"])
      .build()
      .unwrap()
  }

  fn training() -> Vec<Record> {
    vec![
      Record::new(["rust", "book"], ["systems", "language"]).with_category("a"),
      Record::new(["cook", "book"], ["recipes"]).with_category("b"),
      Record::new(["rust"], ["rust", "fungus"]).with_category("b"),
    ]
  }

  #[test]
  fn test_weights_applied_per_field() {
    let table = build(&training(), &config()).unwrap();
    assert_eq!(table.count("a", "rust"), Some(5));
    assert_eq!(table.count("b", "rust"), Some(6));
    assert_eq!(table.count("b", "book"), Some(5));
    assert_eq!(table.count("a", "recipes"), Some(0));
    assert_eq!(table.count("c", "rust"), Some(0));
    assert_eq!(table.count("a", "missing"), None);
  }

  #[test]
  fn test_every_category_shares_key_set() {
    let table = build(&training(), &config()).unwrap();
    let keys: Vec<HashSet<&str>> = ["a", "b", "c"]
      .iter()
      .map(|c| table.category_table(c).unwrap().into_keys().collect())
      .collect();
    assert!(keys.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(keys[0].len(), table.vocab_size());
  }

  #[test]
  fn test_vocabulary_first_seen_order() {
    let table = build(&training(), &config()).unwrap();
    let tokens: Vec<&str> = table.vocabulary().iter().collect();
    assert_eq!(
      tokens,
      vec!["rust", "book", "systems", "language", "cook", "recipes", "fungus"]
    );
  }

  #[test]
  fn test_mass_matches_weighted_token_counts() {
    let records = training();
    let table = build(&records, &config()).unwrap();
    let titles: usize = records.iter().map(|r| r.title.len()).sum();
    let descriptions: usize = records.iter().map(|r| r.description.len()).sum();
    assert_eq!(
      table.category_mass().total(),
      5 * titles as u64 + descriptions as u64
    );
    assert_eq!(table.category_mass().as_slice(), &[12, 18, 0]);
  }

  #[test]
  fn test_build_is_idempotent() {
    let records = training();
    assert_eq!(
      build(&records, &config()).unwrap(),
      build(&records, &config()).unwrap()
    );
  }

  #[test]
  fn test_unknown_category_rejected() {
    let records = vec![Record::new(["x"], []).with_category("z")];
    let err = build(&records, &config()).unwrap_err();
    assert!(matches!(
      err,
      LibrusError::CategoryMismatch { category: Some(ref c) } if c == "z"
    ));
  }

  #[test]
  fn test_unlabeled_record_rejected() {
    let records = vec![Record::new(["x"], [])];
    assert!(matches!(
      build(&records, &config()),
      Err(LibrusError::CategoryMismatch { category: None })
    ));
  }
}
