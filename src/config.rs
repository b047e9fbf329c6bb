//! Classifier and normalizer configuration.
//!
//! Both configs deserialize from JSON with per-field defaults and can also be
//! assembled in code through their builders.

use crate::error::{LibrusError, Result};
use crate::types::{Category, CategorySet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Additive smoothing constant used when a word has no count in a category.
pub const DEFAULT_ALPHA: f64 = 1.0;
/// Weight added per title token.
pub const DEFAULT_TITLE_WEIGHT: u64 = 5;
/// Weight added per description token.
pub const DEFAULT_DESCRIPTION_WEIGHT: u64 = 1;

/// Punctuation and joiner tokens dropped by the default normalizer.
///
/// Includes the Persian comma, question mark and semicolon, guillemets, the
/// bullet, the zero-width non-joiner, and common ASCII punctuation.
pub const DEFAULT_PUNCTUATION: &[&str] = &[
  "-", "\u{060C}", ":", ".", "\u{2022}", "!", "\u{061F}", "\u{061B}", "\u{200C}", "(", ")", "\u{00BB}",
  "\u{00AB}", ",", ";", "?", "\"", "'", "/",
];

/// Model configuration shared by the builder, the classifier and the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
  /// The closed set of labels, in tie-break order.
  pub categories: CategorySet,
  /// Smoothing constant for zero-count and unknown words.
  #[serde(default = "default_alpha")]
  pub alpha: f64,
  /// Count added per title token.
  #[serde(default = "default_title_weight")]
  pub title_weight: u64,
  /// Count added per description token.
  #[serde(default = "default_description_weight")]
  pub description_weight: u64,
}

fn default_alpha() -> f64 {
  DEFAULT_ALPHA
}

fn default_title_weight() -> u64 {
  DEFAULT_TITLE_WEIGHT
}

fn default_description_weight() -> u64 {
  DEFAULT_DESCRIPTION_WEIGHT
}

impl ClassifierConfig {
  /// Creates a config with default weights and smoothing.
  pub fn new(categories: CategorySet) -> Self {
    Self {
      categories,
      alpha: DEFAULT_ALPHA,
      title_weight: DEFAULT_TITLE_WEIGHT,
      description_weight: DEFAULT_DESCRIPTION_WEIGHT,
    }
  }

  /// Create a new config builder.
  pub fn builder() -> ClassifierConfigBuilder {
    ClassifierConfigBuilder::default()
  }

  /// Parses and validates a JSON config.
  pub fn from_json_str(json: &str) -> Result<Self> {
    let config: Self = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  /// Reads, parses and validates a JSON config file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let json = std::fs::read_to_string(path)?;
    Self::from_json_str(&json)
  }

  /// Checks the numeric invariants that deserialization cannot express.
  pub fn validate(&self) -> Result<()> {
    if !self.alpha.is_finite() || self.alpha <= 0.0 {
      return Err(LibrusError::InvalidConfig(format!(
        "alpha must be finite and positive, got {}",
        self.alpha
      )));
    }
    if self.title_weight == 0 || self.description_weight == 0 {
      return Err(LibrusError::InvalidConfig(
        "token weights must be at least 1".to_string(),
      ));
    }
    Ok(())
  }
}

/// Builder for [`ClassifierConfig`].
#[derive(Debug, Default)]
pub struct ClassifierConfigBuilder {
  categories: Vec<Category>,
  alpha: Option<f64>,
  title_weight: Option<u64>,
  description_weight: Option<u64>,
}

impl ClassifierConfigBuilder {
  /// Append a category.
  pub fn category(mut self, category: impl Into<Category>) -> Self {
    self.categories.push(category.into());
    self
  }

  /// Append several categories.
  pub fn categories<I, S>(mut self, categories: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<Category>,
  {
    self.categories.extend(categories.into_iter().map(Into::into));
    self
  }

  /// Set the smoothing constant.
  pub fn alpha(mut self, alpha: f64) -> Self {
    self.alpha = Some(alpha);
    self
  }

  /// Set the per-token title weight.
  pub fn title_weight(mut self, weight: u64) -> Self {
    self.title_weight = Some(weight);
    self
  }

  /// Set the per-token description weight.
  pub fn description_weight(mut self, weight: u64) -> Self {
    self.description_weight = Some(weight);
    self
  }

  /// Build and validate the config.
  pub fn build(self) -> Result<ClassifierConfig> {
    let config = ClassifierConfig {
      categories: CategorySet::new(self.categories)?,
      alpha: self.alpha.unwrap_or(DEFAULT_ALPHA),
      title_weight: self.title_weight.unwrap_or(DEFAULT_TITLE_WEIGHT),
      description_weight: self.description_weight.unwrap_or(DEFAULT_DESCRIPTION_WEIGHT),
    };
    config.validate()?;
    Ok(config)
  }
}

/// Settings for the [`StandardNormalizer`](crate::normalizer::StandardNormalizer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
  /// Words removed after tokenization.
  #[serde(default)]
  pub stop_words: Vec<String>,
  /// Tokens treated as punctuation and removed.
  #[serde(default = "default_punctuation")]
  pub punctuation: Vec<String>,
  /// Lowercase text before tokenizing.
  #[serde(default = "default_lowercase")]
  pub lowercase: bool,
  /// Optional word to lemma dictionary.
  #[serde(default)]
  pub lemmas: HashMap<String, String>,
}

fn default_punctuation() -> Vec<String> {
  DEFAULT_PUNCTUATION.iter().map(|p| p.to_string()).collect()
}

fn default_lowercase() -> bool {
  true
}

impl Default for NormalizerConfig {
  fn default() -> Self {
    Self {
      stop_words: Vec::new(),
      punctuation: default_punctuation(),
      lowercase: default_lowercase(),
      lemmas: HashMap::new(),
    }
  }
}

impl NormalizerConfig {
  /// Parses a JSON normalizer config.
  pub fn from_json_str(json: &str) -> Result<Self> {
    Ok(serde_json::from_str(json)?)
  }

  /// Reads and parses a JSON normalizer config file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let json = std::fs::read_to_string(path)?;
    Self::from_json_str(&json)
  }

  /// Set the stop-word list.
  pub fn stop_words<I, S>(mut self, words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.stop_words = words.into_iter().map(Into::into).collect();
    self
  }

  /// Add a lemma mapping.
  pub fn lemma(mut self, word: impl Into<String>, lemma: impl Into<String>) -> Self {
    self.lemmas.insert(word.into(), lemma.into());
    self
  }

  /// Toggle lowercasing.
  pub fn lowercase(mut self, lowercase: bool) -> Self {
    self.lowercase = lowercase;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_fill_missing_fields() {
    let config = ClassifierConfig::from_json_str(r#"{"categories": ["a", "b"]}"#).unwrap();
    assert_eq!(config.alpha, 1.0);
    assert_eq!(config.title_weight, 5);
    assert_eq!(config.description_weight, 1);
  }

  #[test]
  fn test_invalid_alpha_rejected() {
    let err = ClassifierConfig::builder()
      .categories(["a", "b"])
      .alpha(0.0)
      .build();
    assert!(matches!(err, Err(LibrusError::InvalidConfig(_))));
  }

  #[test]
  fn test_single_category_rejected() {
    let err = ClassifierConfig::from_json_str(r#"{"categories": ["a"]}"#);
    assert!(err.is_err());
  }

  #[test]
  fn test_normalizer_config_defaults() {
    let config = NormalizerConfig::from_json_str("{}").unwrap();
    assert!(config.lowercase);
    assert!(config.punctuation.iter().any(|p| p == "\u{061F}"));
    assert!(config.stop_words.is_empty());
  }

  #[test]
  fn test_normalizer_config_from_path() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/books.normalizer.json");
    let config = NormalizerConfig::from_path(path).unwrap();
    assert!(config.stop_words.iter().any(|w| w == "\u{0648}"));
    assert!(matches!(
      NormalizerConfig::from_path("does/not/exist.json"),
      Err(LibrusError::Io(_))
    ));
  }
}
