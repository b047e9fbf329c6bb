//! Core data types for the librus classifier.

use crate::error::{LibrusError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bound for components shared across worker threads; `Send + Sync` only
/// under the `parallel` feature.
#[cfg(feature = "parallel")]
pub trait Shareable: Send + Sync {}
#[cfg(feature = "parallel")]
impl<T: Send + Sync> Shareable for T {}

#[cfg(not(feature = "parallel"))]
pub trait Shareable {}
#[cfg(not(feature = "parallel"))]
impl<T> Shareable for T {}

/// Type alias for category labels.
///
/// Labels are plain strings; the closed set of valid labels lives in a
/// [`CategorySet`].
pub type Category = String;

/// An ordered, duplicate-free set of category labels.
///
/// The order matters: it is the iteration order used when scoring, and
/// therefore decides ties between equally likely categories (the first
/// category wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategorySet {
  labels: Vec<Category>,
  positions: HashMap<Category, usize>,
}

impl CategorySet {
  /// Creates a category set, rejecting fewer than two labels or duplicates.
  pub fn new<I, S>(labels: I) -> Result<Self>
  where
    I: IntoIterator<Item = S>,
    S: Into<Category>,
  {
    let labels: Vec<Category> = labels.into_iter().map(Into::into).collect();
    if labels.len() < 2 {
      return Err(LibrusError::InvalidConfig(format!(
        "at least two categories are required, got {}",
        labels.len()
      )));
    }

    let mut positions = HashMap::with_capacity(labels.len());
    for (index, label) in labels.iter().enumerate() {
      if positions.insert(label.clone(), index).is_some() {
        return Err(LibrusError::InvalidConfig(format!(
          "duplicate category {label:?}"
        )));
      }
    }

    Ok(Self { labels, positions })
  }

  /// Number of categories.
  pub fn len(&self) -> usize {
    self.labels.len()
  }

  /// Always `false`; a valid set holds at least two labels.
  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }

  /// Position of `category` in iteration order.
  pub fn index_of(&self, category: &str) -> Option<usize> {
    self.positions.get(category).copied()
  }

  /// Whether `category` belongs to the set.
  pub fn contains(&self, category: &str) -> bool {
    self.positions.contains_key(category)
  }

  /// Label at `index`.
  pub fn get(&self, index: usize) -> Option<&Category> {
    self.labels.get(index)
  }

  /// Iterates labels in configured order.
  pub fn iter(&self) -> std::slice::Iter<'_, Category> {
    self.labels.iter()
  }

  /// Labels as a slice, in configured order.
  pub fn as_slice(&self) -> &[Category] {
    &self.labels
  }

  /// Resolves an optional label to its index, or fails with
  /// [`LibrusError::CategoryMismatch`].
  pub(crate) fn require(&self, category: Option<&Category>) -> Result<usize> {
    category
      .and_then(|c| self.index_of(c))
      .ok_or_else(|| LibrusError::mismatch(category))
  }
}

impl TryFrom<Vec<Category>> for CategorySet {
  type Error = LibrusError;

  fn try_from(labels: Vec<Category>) -> Result<Self> {
    Self::new(labels)
  }
}

impl From<CategorySet> for Vec<Category> {
  fn from(set: CategorySet) -> Self {
    set.labels
  }
}

impl<'a> IntoIterator for &'a CategorySet {
  type Item = &'a Category;
  type IntoIter = std::slice::Iter<'a, Category>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// A book entry as it arrives from a data source, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
  /// Free-text title.
  #[serde(default)]
  pub title: String,
  /// Free-text description.
  #[serde(default)]
  pub description: String,
  /// Ground-truth label, present for training and evaluation data.
  #[serde(default, alias = "categories")]
  pub category: Option<Category>,
}

impl RawRecord {
  /// Creates an unlabeled raw record.
  pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
      category: None,
    }
  }

  /// Attaches a ground-truth label.
  pub fn with_category(mut self, category: impl Into<Category>) -> Self {
    self.category = Some(category.into());
    self
  }
}

/// A book entry whose text fields have been reduced to token sequences.
///
/// Records are produced by the [`Preprocessor`](crate::preprocess::Preprocessor)
/// and are not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  /// Ordered title tokens.
  pub title: Vec<String>,
  /// Ordered description tokens.
  pub description: Vec<String>,
  /// Ground-truth label, if known.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<Category>,
}

impl Record {
  /// Creates an unlabeled record from token lists.
  pub fn new<T, D, S>(title: T, description: D) -> Self
  where
    T: IntoIterator<Item = S>,
    D: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      title: title.into_iter().map(Into::into).collect(),
      description: description.into_iter().map(Into::into).collect(),
      category: None,
    }
  }

  /// Attaches a ground-truth label.
  pub fn with_category(mut self, category: impl Into<Category>) -> Self {
    self.category = Some(category.into());
    self
  }

  /// Title tokens followed by description tokens.
  pub fn tokens(&self) -> impl Iterator<Item = &str> {
    self
      .title
      .iter()
      .chain(self.description.iter())
      .map(String::as_str)
  }

  /// Whether neither field carries a token.
  pub fn is_degenerate(&self) -> bool {
    self.title.is_empty() && self.description.is_empty()
  }
}

/// The outcome of classifying a single record.
///
/// Besides the chosen category it keeps the log-likelihood of every category,
/// which explains how close the runner-up was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
  /// The selected category.
  pub category: Category,
  /// Natural-log likelihood per category, in configured category order.
  pub log_likelihoods: Vec<(Category, f64)>,
}

impl Prediction {
  /// Log-likelihood of the selected category.
  pub fn score(&self) -> f64 {
    self
      .log_likelihoods
      .iter()
      .find(|(c, _)| *c == self.category)
      .map(|(_, s)| *s)
      .unwrap_or(f64::NEG_INFINITY)
  }

  /// Gap between the best and the second best log-likelihood.
  pub fn margin(&self) -> f64 {
    let best = self.score();
    let runner_up = self
      .log_likelihoods
      .iter()
      .filter(|(c, _)| *c != self.category)
      .map(|(_, s)| *s)
      .fold(f64::NEG_INFINITY, f64::max);
    best - runner_up
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_category_set_rejects_duplicates_and_singletons() {
    assert!(CategorySet::new(["a"]).is_err());
    assert!(CategorySet::new(["a", "b", "a"]).is_err());
    let set = CategorySet::new(["a", "b"]).unwrap();
    assert_eq!(set.index_of("b"), Some(1));
    assert!(!set.contains("c"));
  }

  #[test]
  fn test_category_set_deserializes_through_validation() {
    let set: CategorySet = serde_json::from_str(r#"["x", "y", "z"]"#).unwrap();
    assert_eq!(set.as_slice(), ["x", "y", "z"]);
    assert!(serde_json::from_str::<CategorySet>(r#"["x"]"#).is_err());
  }

  #[test]
  fn test_raw_record_accepts_categories_alias() {
    let raw: RawRecord =
      serde_json::from_str(r#"{"title": "t", "description": "d", "categories": "novel"}"#).unwrap();
    assert_eq!(raw.category.as_deref(), Some("novel"));
  }

  #[test]
  fn test_record_tokens_chain_title_then_description() {
    let record = Record::new(["a", "b"], ["c"]);
    assert_eq!(record.tokens().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert!(!record.is_degenerate());
    assert!(Record::default().is_degenerate());
  }

  #[test]
  fn test_prediction_margin() {
    let prediction = Prediction {
      category: "a".to_string(),
      log_likelihoods: vec![("a".to_string(), -1.0), ("b".to_string(), -3.5)],
    };
    assert_eq!(prediction.score(), -1.0);
    assert_eq!(prediction.margin(), 2.5);
  }
}
