//! The pipeline that wires normalization, training, prediction and evaluation.

use crate::classifier::NaiveBayesClassifier;
use crate::config::ClassifierConfig;
use crate::error::{LibrusError, Result};
use crate::evaluate::EvaluationReport;
use crate::normalizer::{StandardNormalizer, TextNormalizer};
use crate::preprocess::Preprocessor;
use crate::types::{Category, RawRecord, Record};
use tracing::{info, instrument};

/// The end-to-end classification pipeline.
///
/// `LibrusPipeline` owns a [`Preprocessor`] and a [`ClassifierConfig`] and
/// drives the full flow:
///
/// 1.  **Preprocess**: raw titles and descriptions are normalized into tokens.
/// 2.  **Train**: the training records become a
///     [`FrequencyTable`](crate::bow::FrequencyTable) wrapped in a
///     [`NaiveBayesClassifier`].
/// 3.  **Predict**: each test record is scored against every category.
/// 4.  **Evaluate**: predictions are compared against the test labels.
///
/// Create one with [`LibrusPipeline::builder`].
///
/// # Examples
///
/// ```rust
/// use librus::prelude::*;
///
/// let pipeline = LibrusPipeline::builder()
///     .categories(["fiction", "cooking"])
///     .build()
///     .unwrap();
///
/// let training = vec![
///     RawRecord::new("Dragon Quest", "a dragon and a knight").with_category("fiction"),
///     RawRecord::new("Pasta Basics", "simple pasta recipes").with_category("cooking"),
/// ];
/// let test = vec![RawRecord::new("The Last Dragon", "").with_category("fiction")];
///
/// let outcome = pipeline.run(&training, &test).unwrap();
/// assert_eq!(outcome.predictions, vec!["fiction"]);
/// assert_eq!(outcome.report.accuracy, 100.0);
/// ```
pub struct LibrusPipeline<N = StandardNormalizer> {
  preprocessor: Preprocessor<N>,
  config: ClassifierConfig,
}

/// Everything produced by [`LibrusPipeline::run`].
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
  /// The trained classifier.
  pub classifier: NaiveBayesClassifier,
  /// One prediction per test record, in input order.
  pub predictions: Vec<Category>,
  /// Accuracy and confusion matrix over the test records.
  pub report: EvaluationReport,
}

impl LibrusPipeline<StandardNormalizer> {
  /// Creates a new `LibrusPipelineBuilder` with the default normalizer.
  pub fn builder() -> LibrusPipelineBuilder<StandardNormalizer> {
    LibrusPipelineBuilder::new()
  }
}

impl<N: TextNormalizer> LibrusPipeline<N> {
  /// The classifier configuration.
  pub fn config(&self) -> &ClassifierConfig {
    &self.config
  }

  /// The preprocessor.
  pub fn preprocessor(&self) -> &Preprocessor<N> {
    &self.preprocessor
  }

  /// Normalize raw records into tokenized records.
  pub fn preprocess(&self, raws: &[RawRecord]) -> Vec<Record> {
    self.preprocessor.preprocess_all(raws)
  }

  /// Preprocess `training` and fit a classifier on it.
  #[instrument(skip_all, fields(num_records = training.len()))]
  pub fn train(&self, training: &[RawRecord]) -> Result<NaiveBayesClassifier> {
    let records = self.preprocess(training);
    let classifier = NaiveBayesClassifier::train(&records, &self.config)?;
    info!(
      vocab_size = classifier.table().vocab_size(),
      "Training complete"
    );
    Ok(classifier)
  }

  /// Preprocess `raws` and predict a category for each.
  #[instrument(skip_all, fields(num_records = raws.len()))]
  pub fn predict(&self, classifier: &NaiveBayesClassifier, raws: &[RawRecord]) -> Vec<Category> {
    let records = self.preprocess(raws);
    classifier.predict_batch(&records)
  }

  /// Preprocess `test`, predict, and evaluate against its labels.
  #[instrument(skip_all, fields(num_records = test.len()))]
  pub fn evaluate(
    &self,
    classifier: &NaiveBayesClassifier,
    test: &[RawRecord],
  ) -> Result<(Vec<Category>, EvaluationReport)> {
    let records = self.preprocess(test);
    let predictions = classifier.predict_batch(&records);
    let report = EvaluationReport::evaluate(&records, &predictions, &self.config.categories)?;
    info!(accuracy = report.accuracy, "Evaluation complete");
    Ok((predictions, report))
  }

  /// Train on `training`, then evaluate on `test`.
  pub fn run(&self, training: &[RawRecord], test: &[RawRecord]) -> Result<PipelineOutcome> {
    let classifier = self.train(training)?;
    let (predictions, report) = self.evaluate(&classifier, test)?;
    Ok(PipelineOutcome {
      classifier,
      predictions,
      report,
    })
  }
}

/// A builder for creating `LibrusPipeline` instances.
///
/// Categories can be supplied one by one, or a complete
/// [`ClassifierConfig`] can be provided with [`config`](Self::config).
pub struct LibrusPipelineBuilder<N> {
  normalizer: N,
  config: Option<ClassifierConfig>,
  categories: Vec<Category>,
}

impl LibrusPipelineBuilder<StandardNormalizer> {
  /// Creates a new builder using [`StandardNormalizer::default`].
  pub fn new() -> Self {
    Self {
      normalizer: StandardNormalizer::default(),
      config: None,
      categories: Vec::new(),
    }
  }
}

impl Default for LibrusPipelineBuilder<StandardNormalizer> {
  fn default() -> Self {
    Self::new()
  }
}

impl<N: TextNormalizer> LibrusPipelineBuilder<N> {
  /// Replaces the text normalizer.
  pub fn normalizer<M: TextNormalizer>(self, normalizer: M) -> LibrusPipelineBuilder<M> {
    LibrusPipelineBuilder {
      normalizer,
      config: self.config,
      categories: self.categories,
    }
  }

  /// Uses a complete classifier config. Takes precedence over categories
  /// added with [`categories`](Self::categories).
  pub fn config(mut self, config: ClassifierConfig) -> Self {
    self.config = Some(config);
    self
  }

  /// Adds categories for a config built with default weights and smoothing.
  pub fn categories<I, S>(mut self, categories: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<Category>,
  {
    self.categories.extend(categories.into_iter().map(Into::into));
    self
  }

  /// Builds the `LibrusPipeline`.
  pub fn build(self) -> Result<LibrusPipeline<N>> {
    let config = match self.config {
      Some(config) => {
        config.validate()?;
        config
      }
      None if self.categories.is_empty() => {
        return Err(LibrusError::InvalidConfig(
          "no categories or config supplied".to_string(),
        ))
      }
      None => ClassifierConfig::builder()
        .categories(self.categories)
        .build()?,
    };

    Ok(LibrusPipeline {
      preprocessor: Preprocessor::new(self.normalizer),
      config,
    })
  }
}
