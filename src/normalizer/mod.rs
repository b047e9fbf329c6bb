//! Text normalization: raw text in, filtered and lemmatized tokens out.
//!
//! The classifier only ever sees the output of a [`TextNormalizer`]. The
//! crate ships [`StandardNormalizer`], which runs three steps in order:
//!
//! 1. **normalize**: NFKC, diacritic removal, Arabic to Persian letter
//!    folding, optional lowercasing, and segmentation on Unicode word
//!    boundaries (punctuation segments are kept as tokens);
//! 2. **filter**: drops tokens containing digits, punctuation tokens, and
//!    stop words;
//! 3. **lemmatize**: maps each surviving token through a [`Lemmatizer`].
//!    A lemma that cleans up to the empty string is dropped.
//!
//! # Example
//!
//! ```rust
//! use librus::prelude::*;
//!
//! let normalizer = StandardNormalizer::new(
//!     NormalizerConfig::default()
//!         .stop_words(["the", "of"])
//!         .lemma("wars", "war"),
//! );
//!
//! let tokens = normalizer.normalize("The Art of 1000 Wars");
//! assert_eq!(tokens, vec!["art", "war"]);
//! ```

/// Lemmatizer trait and implementations.
pub mod lemmatizer;
/// Unicode tokenization helpers.
pub mod tokenizer;

pub use lemmatizer::{clean_lemma, DictionaryLemmatizer, IdentityLemmatizer, Lemmatizer};

use crate::config::NormalizerConfig;
use crate::types::Shareable;
use std::collections::HashSet;

/// Turns free text into an ordered sequence of normalized tokens.
///
/// Implementations must be deterministic: the same text always yields the
/// same tokens, so that training and prediction see identical vocabularies.
pub trait TextNormalizer: Shareable {
  /// Normalize `text` into tokens.
  fn normalize(&self, text: &str) -> Vec<String>;
}

impl<F> TextNormalizer for F
where
  F: Fn(&str) -> Vec<String> + Shareable,
{
  fn normalize(&self, text: &str) -> Vec<String> {
    self(text)
  }
}

/// The default normalizer.
pub struct StandardNormalizer {
  stop_words: HashSet<String>,
  punctuation: HashSet<String>,
  lowercase: bool,
  lemmatizer: Box<dyn Lemmatizer>,
}

impl StandardNormalizer {
  /// Create a normalizer from config. A non-empty `lemmas` map selects a
  /// [`DictionaryLemmatizer`], otherwise words are kept as they are.
  ///
  /// Stop words are canonicalized like the text they are matched against.
  pub fn new(config: NormalizerConfig) -> Self {
    let lowercase = config.lowercase;
    let fold = |word: String| {
      let word = tokenizer::canonicalize(&word);
      if lowercase {
        word.to_lowercase()
      } else {
        word
      }
    };

    let lemmatizer: Box<dyn Lemmatizer> = if config.lemmas.is_empty() {
      Box::new(IdentityLemmatizer)
    } else {
      Box::new(DictionaryLemmatizer::new(config.lemmas))
    };

    Self {
      stop_words: config.stop_words.into_iter().map(fold).collect(),
      punctuation: config.punctuation.into_iter().collect(),
      lowercase,
      lemmatizer,
    }
  }

  /// Replace the lemmatizer.
  pub fn with_lemmatizer(mut self, lemmatizer: Box<dyn Lemmatizer>) -> Self {
    self.lemmatizer = lemmatizer;
    self
  }

  /// Whether a token survives the filter step.
  fn is_important(&self, token: &str) -> bool {
    !tokenizer::has_digit(token)
      && !self.punctuation.contains(token)
      && !self.stop_words.contains(token)
  }
}

impl Default for StandardNormalizer {
  fn default() -> Self {
    Self::new(NormalizerConfig::default())
  }
}

impl TextNormalizer for StandardNormalizer {
  fn normalize(&self, text: &str) -> Vec<String> {
    let canonical = tokenizer::canonicalize(text);

    tokenizer::tokenize(&canonical, self.lowercase)
      .into_iter()
      .filter(|token| self.is_important(token))
      .map(|token| clean_lemma(&self.lemmatizer.lemmatize(&token)).to_string())
      .filter(|lemma| !lemma.is_empty())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_filters_digits_and_stop_words() {
    let normalizer =
      StandardNormalizer::new(NormalizerConfig::default().stop_words(["a", "of"]));
    let tokens = normalizer.normalize("A History of 20th Century Art");
    assert_eq!(tokens, vec!["history", "century", "art"]);
  }

  #[test]
  fn test_stop_words_checked_before_lemmatizing() {
    let normalizer = StandardNormalizer::new(
      NormalizerConfig::default()
        .stop_words(["is"])
        .lemma("was", "was#is"),
    );
    assert_eq!(normalizer.normalize("it was"), vec!["it", "is"]);
  }

  #[test]
  fn test_closure_normalizer() {
    let split = |text: &str| text.split(',').map(str::to_string).collect::<Vec<_>>();
    assert_eq!(split.normalize("a,b"), vec!["a", "b"]);
  }

  #[test]
  fn test_persian_punctuation_removed() {
    let text = "\u{0631}\u{0645}\u{0627}\u{0646}\u{061F} \u{00AB}\u{06A9}\u{062A}\u{0627}\u{0628}\u{00BB}";
    let novel = "\u{0631}\u{0645}\u{0627}\u{0646}";
    let book = "\u{06A9}\u{062A}\u{0627}\u{0628}";

    let tokens = StandardNormalizer::default().normalize(text);
    assert_eq!(tokens, vec![novel, book]);

    let mut config = NormalizerConfig::default();
    config.punctuation.clear();
    let tokens = StandardNormalizer::new(config).normalize(text);
    assert_eq!(tokens, vec![novel, "\u{061F}", "\u{00AB}", book, "\u{00BB}"]);
  }

  #[test]
  fn test_stop_words_match_folded_spelling() {
    // "ki" listed with Persian keheh and yeh, text typed with Arabic letters.
    let normalizer =
      StandardNormalizer::new(NormalizerConfig::default().stop_words(["\u{06A9}\u{06CC}"]));
    let tokens = normalizer.normalize("\u{0643}\u{064A} \u{0639}\u{0634}\u{0642}");
    assert_eq!(tokens, vec!["\u{0639}\u{0634}\u{0642}"]);
  }

  #[test]
  fn test_empty_lemma_dropped() {
    let normalizer = StandardNormalizer::new(NormalizerConfig::default().lemma("x", "x#"));
    assert_eq!(normalizer.normalize("x y"), vec!["y"]);
  }
}
