//! Accuracy and confusion matrices for a set of predictions.

use crate::error::{LibrusError, Result};
use crate::types::{Category, CategorySet, Record};
use serde::Serialize;
use tracing::debug;

fn check_aligned(records: &[Record], predictions: &[Category]) -> Result<()> {
  if records.is_empty() {
    return Err(LibrusError::EmptyInput);
  }
  if records.len() != predictions.len() {
    return Err(LibrusError::LengthMismatch {
      records: records.len(),
      predictions: predictions.len(),
    });
  }
  Ok(())
}

/// Resolves every (true, predicted) pair to category indices.
fn resolve_pairs(
  records: &[Record],
  predictions: &[Category],
  categories: &CategorySet,
) -> Result<Vec<(usize, usize)>> {
  check_aligned(records, predictions)?;
  records
    .iter()
    .zip(predictions)
    .map(|(record, predicted)| {
      let actual = categories.require(record.category.as_ref())?;
      let predicted = categories.require(Some(predicted))?;
      Ok((actual, predicted))
    })
    .collect()
}

/// Percentage (0 to 100) of records whose prediction equals their label.
///
/// Fails with [`LibrusError::EmptyInput`] on an empty set,
/// [`LibrusError::LengthMismatch`] when the slices differ in length, and
/// [`LibrusError::CategoryMismatch`] when a record is unlabeled or a label or
/// prediction lies outside `categories`.
pub fn accuracy(
  records: &[Record],
  predictions: &[Category],
  categories: &CategorySet,
) -> Result<f64> {
  let pairs = resolve_pairs(records, predictions, categories)?;
  let hits = pairs.iter().filter(|(actual, predicted)| actual == predicted).count();
  Ok(hits as f64 / pairs.len() as f64 * 100.0)
}

/// A dense `|C| x |C|` table of (true category, predicted category) counts.
///
/// Rows are true categories, columns are predicted categories, both in the
/// configured category order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
  categories: CategorySet,
  cells: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
  /// An all-zero matrix over `categories`.
  pub fn new(categories: &CategorySet) -> Self {
    Self {
      categories: categories.clone(),
      cells: vec![vec![0; categories.len()]; categories.len()],
    }
  }

  /// The categories labelling rows and columns.
  pub fn categories(&self) -> &CategorySet {
    &self.categories
  }

  /// Count for (`actual`, `predicted`); `None` if either is unknown.
  pub fn get(&self, actual: &str, predicted: &str) -> Option<usize> {
    let row = self.categories.index_of(actual)?;
    let column = self.categories.index_of(predicted)?;
    Some(self.cells[row][column])
  }

  /// Number of records whose true category is `actual`.
  pub fn row_total(&self, actual: &str) -> Option<usize> {
    let row = self.categories.index_of(actual)?;
    Some(self.cells[row].iter().sum())
  }

  /// Number of records predicted as `predicted`.
  pub fn column_total(&self, predicted: &str) -> Option<usize> {
    let column = self.categories.index_of(predicted)?;
    Some(self.cells.iter().map(|row| row[column]).sum())
  }

  /// Number of tallied records.
  pub fn total(&self) -> usize {
    self.cells.iter().flatten().sum()
  }

  /// Number of correct predictions.
  pub fn diagonal(&self) -> usize {
    (0..self.cells.len()).map(|i| self.cells[i][i]).sum()
  }

  /// Diagonal over total, as a percentage. `None` when the matrix is empty.
  pub fn accuracy(&self) -> Option<f64> {
    let total = self.total();
    (total > 0).then(|| self.diagonal() as f64 / total as f64 * 100.0)
  }

  /// Fraction of records predicted as `category` that truly are.
  ///
  /// `None` if the category is unknown or was never predicted.
  pub fn precision(&self, category: &str) -> Option<f64> {
    let hits = self.get(category, category)?;
    let predicted = self.column_total(category)?;
    (predicted > 0).then(|| hits as f64 / predicted as f64)
  }

  /// Fraction of records of `category` that were predicted as such.
  ///
  /// `None` if the category is unknown or absent from the truth labels.
  pub fn recall(&self, category: &str) -> Option<f64> {
    let hits = self.get(category, category)?;
    let actual = self.row_total(category)?;
    (actual > 0).then(|| hits as f64 / actual as f64)
  }

  /// Rows as (true category, counts per predicted category).
  pub fn rows(&self) -> impl Iterator<Item = (&Category, &[usize])> {
    self
      .categories
      .iter()
      .zip(self.cells.iter().map(Vec::as_slice))
  }
}

/// Build the confusion matrix for `records` against `predictions`.
///
/// Every record must carry a label in `categories`, and every prediction must
/// be in `categories`; otherwise [`LibrusError::CategoryMismatch`] is raised.
pub fn confusion_matrix(
  records: &[Record],
  predictions: &[Category],
  categories: &CategorySet,
) -> Result<ConfusionMatrix> {
  let mut matrix = ConfusionMatrix::new(categories);
  for (actual, predicted) in resolve_pairs(records, predictions, categories)? {
    matrix.cells[actual][predicted] += 1;
  }
  Ok(matrix)
}

/// Per-category precision and recall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
  /// The category.
  pub category: Category,
  /// Number of records truly in this category.
  pub support: usize,
  /// See [`ConfusionMatrix::precision`].
  pub precision: Option<f64>,
  /// See [`ConfusionMatrix::recall`].
  pub recall: Option<f64>,
}

/// Summary of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
  /// Percentage of correct predictions.
  pub accuracy: f64,
  /// The full confusion matrix.
  pub confusion: ConfusionMatrix,
  /// Per-category breakdown, in configured order.
  pub per_category: Vec<CategoryReport>,
}

impl EvaluationReport {
  /// Evaluate `predictions` against the labels of `records`.
  pub fn evaluate(
    records: &[Record],
    predictions: &[Category],
    categories: &CategorySet,
  ) -> Result<Self> {
    let accuracy = accuracy(records, predictions, categories)?;
    let confusion = confusion_matrix(records, predictions, categories)?;
    let per_category = categories
      .iter()
      .map(|category| CategoryReport {
        category: category.clone(),
        support: confusion.row_total(category).unwrap_or(0),
        precision: confusion.precision(category),
        recall: confusion.recall(category),
      })
      .collect();

    debug!(accuracy, num_records = records.len(), "Evaluation complete");
    Ok(Self {
      accuracy,
      confusion,
      per_category,
    })
  }
}
