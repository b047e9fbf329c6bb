//! Naive Bayes scoring over a [`FrequencyTable`].
//!
//! Each category is scored by the natural-log likelihood of a record's tokens:
//!
//! ```text
//! score(c) = sum over tokens w of ln P(w | c)
//! ```
//!
//! `P(w | c)` uses an asymmetric smoothing policy. A word with a positive
//! count `n` in `c` gets its raw relative frequency `n / mass(c)`. A word with
//! a zero count, or a word never seen in training, gets the additive
//! smoothing estimate `alpha / (mass(c) + alpha * |V|)`. Counts are not
//! shifted by `alpha` when they are positive.

use crate::bow::{CategoryMass, FrequencyTable};
use crate::config::ClassifierConfig;
use crate::error::{LibrusError, Result};
use crate::types::{Category, Prediction, Record};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A trained Naive Bayes classifier.
///
/// The frequency table is read-only once the classifier is created, so a
/// single classifier can score many records, from many threads under the
/// `parallel` feature.
///
/// # Example
///
/// ```rust
/// use librus::prelude::*;
///
/// let config = ClassifierConfig::builder().categories(["a", "b"]).build().unwrap();
/// let training = vec![
///     Record::new(["x"], []).with_category("a"),
///     Record::new(["y"], []).with_category("b"),
/// ];
/// let table = BagOfWordsBuilder::new(&config).build(&training).unwrap();
/// let classifier = NaiveBayesClassifier::new(table, config.alpha).unwrap();
///
/// assert_eq!(classifier.predict(&Record::new(["y"], [])), "b");
/// ```
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
  table: FrequencyTable,
  mass: CategoryMass,
  alpha: f64,
}

impl NaiveBayesClassifier {
  /// Create a classifier over `table` with smoothing constant `alpha`.
  ///
  /// Fails if the table has no vocabulary (the smoothing denominator could be
  /// zero) or if `alpha` is not a finite positive number.
  pub fn new(table: FrequencyTable, alpha: f64) -> Result<Self> {
    if table.vocabulary().is_empty() {
      return Err(LibrusError::EmptyVocabulary);
    }
    if !alpha.is_finite() || alpha <= 0.0 {
      return Err(LibrusError::InvalidConfig(format!(
        "alpha must be finite and positive, got {alpha}"
      )));
    }
    let mass = table.category_mass();
    debug!(
      vocab_size = table.vocab_size(),
      total_mass = mass.total(),
      "Classifier ready"
    );
    Ok(Self { table, mass, alpha })
  }

  /// Train a classifier from tokenized records.
  pub fn train(records: &[Record], config: &ClassifierConfig) -> Result<Self> {
    config.validate()?;
    let table = crate::bow::build(records, config)?;
    Self::new(table, config.alpha)
  }

  /// The underlying frequency table.
  pub fn table(&self) -> &FrequencyTable {
    &self.table
  }

  /// Per-category total counts.
  pub fn category_mass(&self) -> &CategoryMass {
    &self.mass
  }

  /// The smoothing constant.
  pub fn alpha(&self) -> f64 {
    self.alpha
  }

  /// `P(word | category)`, or `None` if `category` is not configured.
  ///
  /// The result is always strictly positive.
  pub fn word_probability(&self, word: &str, category: &str) -> Option<f64> {
    let index = self.table.categories().index_of(category)?;
    Some(self.word_probability_at(word, index))
  }

  fn word_probability_at(&self, word: &str, index: usize) -> f64 {
    let mass = self.mass.get(index) as f64;
    let count = self
      .table
      .vocabulary()
      .get(word)
      .map(|column| self.table.row(index)[column])
      .unwrap_or(0);

    if count == 0 {
      self.alpha / (mass + self.alpha * self.table.vocab_size() as f64)
    } else {
      count as f64 / mass
    }
  }

  /// Log-likelihood of `record` under `category`, or `None` if `category` is
  /// not configured.
  pub fn category_log_likelihood(&self, record: &Record, category: &str) -> Option<f64> {
    let index = self.table.categories().index_of(category)?;
    Some(self.log_likelihood_at(record, index))
  }

  fn log_likelihood_at(&self, record: &Record, index: usize) -> f64 {
    record
      .tokens()
      .map(|word| self.word_probability_at(word, index).ln())
      .sum()
  }

  /// Log-likelihood of `record` under every category, in configured order.
  pub fn scores(&self, record: &Record) -> Vec<(Category, f64)> {
    self
      .table
      .categories()
      .iter()
      .enumerate()
      .map(|(index, category)| (category.clone(), self.log_likelihood_at(record, index)))
      .collect()
  }

  /// Classify `record`, keeping every category's score.
  ///
  /// The category with the strictly greatest log-likelihood wins; on a tie the
  /// category that comes first in the configured order is kept. A record with
  /// no tokens scores zero everywhere and therefore resolves to the first
  /// category.
  pub fn classify(&self, record: &Record) -> Prediction {
    if record.is_degenerate() {
      warn!("Record has no tokens; prediction falls back to the first category");
    }

    let log_likelihoods = self.scores(record);
    let mut best: Option<(usize, f64)> = None;
    for (index, (_, score)) in log_likelihoods.iter().enumerate() {
      match best {
        Some((_, best_score)) if *score <= best_score => {}
        _ => best = Some((index, *score)),
      }
    }

    let winner = best.map(|(index, _)| index).unwrap_or(0);
    Prediction {
      category: log_likelihoods[winner].0.clone(),
      log_likelihoods,
    }
  }

  /// Predicted category for `record`.
  pub fn predict(&self, record: &Record) -> Category {
    self.classify(record).category
  }

  /// Predicted categories for `records`, order-aligned with the input.
  pub fn predict_batch(&self, records: &[Record]) -> Vec<Category> {
    debug!(num_records = records.len(), "Predicting batch");

    #[cfg(feature = "parallel")]
    let predictions: Vec<Category> = records.par_iter().map(|r| self.predict(r)).collect();

    #[cfg(not(feature = "parallel"))]
    let predictions: Vec<Category> = records.iter().map(|r| self.predict(r)).collect();

    predictions
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn two_category_classifier() -> NaiveBayesClassifier {
    let config = ClassifierConfig::builder()
      .categories(["A", "B"])
      .build()
      .unwrap();
    let mut training = Vec::new();
    for _ in 0..3 {
      training.push(Record::new(["x"], []).with_category("A"));
      training.push(Record::new(["y"], []).with_category("B"));
    }
    NaiveBayesClassifier::train(&training, &config).unwrap()
  }

  #[test]
  fn test_known_word_uses_raw_frequency() {
    let classifier = two_category_classifier();
    assert_eq!(classifier.table().count("A", "x"), Some(15));
    assert_eq!(classifier.word_probability("x", "A"), Some(1.0));
  }

  #[test]
  fn test_zero_count_and_unknown_word_share_smoothed_value() {
    let classifier = two_category_classifier();
    let expected = 1.0 / (15.0 + 2.0);
    assert_eq!(classifier.word_probability("x", "B"), Some(expected));
    assert_eq!(classifier.word_probability("z", "A"), Some(expected));
    assert_eq!(classifier.word_probability("z", "B"), Some(expected));
    assert_eq!(classifier.word_probability("x", "C"), None);
  }

  #[test]
  fn test_predicts_seen_word_category() {
    let classifier = two_category_classifier();
    assert_eq!(classifier.predict(&Record::new(["x"], [])), "A");
    assert_eq!(classifier.predict(&Record::new(["y"], [])), "B");
  }

  #[test]
  fn test_tie_resolves_to_first_category() {
    let classifier = two_category_classifier();
    let prediction = classifier.classify(&Record::new(["z"], []));
    assert_eq!(prediction.category, "A");
    assert_eq!(prediction.margin(), 0.0);
  }

  #[test]
  fn test_degenerate_record_scores_zero() {
    let classifier = two_category_classifier();
    let prediction = classifier.classify(&Record::default());
    assert_eq!(prediction.category, "A");
    assert!(prediction.log_likelihoods.iter().all(|(_, s)| *s == 0.0));
  }

  #[test]
  fn test_log_likelihood_sums_over_both_fields() {
    let classifier = two_category_classifier();
    let record = Record::new(["x"], ["z"]);
    let expected = 1.0f64.ln() + (1.0f64 / 17.0).ln();
    let got = classifier.category_log_likelihood(&record, "A").unwrap();
    assert!((got - expected).abs() < 1e-12);
  }

  #[test]
  fn test_empty_vocabulary_rejected() {
    let config = ClassifierConfig::builder()
      .categories(["A", "B"])
      .build()
      .unwrap();
    let records = vec![Record::default().with_category("A")];
    assert!(matches!(
      NaiveBayesClassifier::train(&records, &config),
      Err(LibrusError::EmptyVocabulary)
    ));
  }

  #[test]
  fn test_batch_matches_single_predictions() {
    let classifier = two_category_classifier();
    let records = vec![
      Record::new(["y"], []),
      Record::new(["x", "y", "x"], []),
      Record::new(["q"], ["y"]),
    ];
    let batch = classifier.predict_batch(&records);
    let single: Vec<Category> = records.iter().map(|r| classifier.predict(r)).collect();
    assert_eq!(batch, single);
    assert_eq!(batch, vec!["B", "A", "B"]);
  }
}
