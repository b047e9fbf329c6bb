//! Lemmatizers reduce inflected words to a base form.

use crate::types::Shareable;
use std::collections::HashMap;

/// Maps a word to its lemma.
///
/// Implementations may return compound lemmas of the form `past#present`
/// (common for verb stems); [`clean_lemma`] keeps the last segment.
pub trait Lemmatizer: Shareable {
  /// Returns the lemma for `word`.
  fn lemmatize(&self, word: &str) -> String;
}

/// Keeps the segment after the last `#`, or the whole lemma if there is none.
pub fn clean_lemma(lemma: &str) -> &str {
  lemma.rsplit('#').next().unwrap_or(lemma)
}

/// Returns every word unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
  fn lemmatize(&self, word: &str) -> String {
    word.to_string()
  }
}

/// Looks words up in a fixed dictionary, falling back to the word itself.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer {
  lemmas: HashMap<String, String>,
}

impl DictionaryLemmatizer {
  /// Create a lemmatizer from a word to lemma map.
  pub fn new(lemmas: HashMap<String, String>) -> Self {
    Self { lemmas }
  }

  /// Number of dictionary entries.
  pub fn len(&self) -> usize {
    self.lemmas.len()
  }

  /// Whether the dictionary is empty.
  pub fn is_empty(&self) -> bool {
    self.lemmas.is_empty()
  }
}

impl Lemmatizer for DictionaryLemmatizer {
  fn lemmatize(&self, word: &str) -> String {
    self
      .lemmas
      .get(word)
      .cloned()
      .unwrap_or_else(|| word.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_clean_lemma() {
    assert_eq!(clean_lemma("went#go"), "go");
    assert_eq!(clean_lemma("a#b#c"), "c");
    assert_eq!(clean_lemma("book"), "book");
  }

  #[test]
  fn test_dictionary_fallback() {
    let lemmatizer =
      DictionaryLemmatizer::new(HashMap::from([("books".to_string(), "book".to_string())]));
    assert_eq!(lemmatizer.lemmatize("books"), "book");
    assert_eq!(lemmatizer.lemmatize("novel"), "novel");
  }
}
