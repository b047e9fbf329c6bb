//! Text tokenization utilities.
//!
//! Segmentation follows Unicode word boundaries but, unlike a pure word
//! iterator, keeps punctuation segments such as `«` or `؟` as tokens so the
//! normalizer's punctuation filter can see them. Whitespace is dropped.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Fold Arabic code points onto their Persian counterparts, so both keyboard
/// layouts spell a word the same way.
fn fold_persian(c: char) -> char {
  match c {
    // ARABIC LETTER YEH, ALEF MAKSURA -> FARSI YEH
    '\u{064A}' | '\u{0649}' => '\u{06CC}',
    // ARABIC LETTER KAF -> KEHEH
    '\u{0643}' => '\u{06A9}',
    other => other,
  }
}

/// Canonicalize text: NFKC composition, removal of combining marks (vowel
/// diacritics and similar), and Arabic to Persian letter folding.
pub fn canonicalize(text: &str) -> String {
  text
    .nfkc()
    .filter(|c| !is_combining_mark(*c))
    .map(fold_persian)
    .collect()
}

/// Tokenize text into word and punctuation segments.
pub fn tokenize(text: &str, lowercase: bool) -> Vec<String> {
  text
    .split_word_bounds()
    .filter(|segment| !segment.chars().all(char::is_whitespace))
    .map(|segment| {
      if lowercase {
        segment.to_lowercase()
      } else {
        segment.to_string()
      }
    })
    .collect()
}

/// Whether a token contains any numeric character, in any script.
pub fn has_digit(token: &str) -> bool {
  token.chars().any(char::is_numeric)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tokenize_keeps_compounds_and_punctuation() {
    // «jame'e-shenasi» va tarikh: a ZWNJ compound between guillemets.
    let text = "\u{00AB}\u{062C}\u{0627}\u{0645}\u{0639}\u{0647}\u{200C}\u{0634}\u{0646}\u{0627}\u{0633}\u{06CC}\u{00BB} \u{0648} \u{062A}\u{0627}\u{0631}\u{06CC}\u{062E}";
    let tokens = tokenize(text, true);
    assert_eq!(
      tokens,
      vec![
        "\u{00AB}",
        "\u{062C}\u{0627}\u{0645}\u{0639}\u{0647}\u{200C}\u{0634}\u{0646}\u{0627}\u{0633}\u{06CC}",
        "\u{00BB}",
        "\u{0648}",
        "\u{062A}\u{0627}\u{0631}\u{06CC}\u{062E}",
      ]
    );
  }

  #[test]
  fn test_tokenize_keeps_case_when_asked() {
    assert_eq!(tokenize("Rust  Book!", false), vec!["Rust", "Book", "!"]);
  }

  #[test]
  fn test_canonicalize_strips_diacritics() {
    // "kitab" with a fatha and a kasra between the letters.
    let marked = "\u{06A9}\u{064E}\u{062A}\u{0650}\u{0627}\u{0628}";
    assert_eq!(canonicalize(marked), "\u{06A9}\u{062A}\u{0627}\u{0628}");
    assert_eq!(canonicalize("ﬁle"), "file");
  }

  #[test]
  fn test_canonicalize_folds_arabic_letters() {
    // "kitabi" typed with Arabic kaf and yeh.
    let arabic = "\u{0643}\u{062A}\u{0627}\u{0628}\u{064A}";
    let persian = "\u{06A9}\u{062A}\u{0627}\u{0628}\u{06CC}";
    assert_eq!(canonicalize(arabic), persian);
    assert_eq!(canonicalize("\u{0639}\u{0644}\u{0649}"), "\u{0639}\u{0644}\u{06CC}");
  }

  #[test]
  fn test_has_digit_covers_other_scripts() {
    assert!(has_digit("1984"));
    assert!(has_digit("\u{06F1}\u{06F3}\u{06F9}\u{06F9}"));
    assert!(!has_digit("novel"));
  }
}
