//! Train on one record file, evaluate on another, and print the results.
//!
//! ```text
//! cargo run --example classify_books -- demos/books.config.json demos/books_train.json demos/books_test.json demos/books.normalizer.json
//! ```
//!
//! The normalizer config (stop words, lemmas) is optional.
//!
//! Set `RUST_LOG=debug` to see per-stage diagnostics.

use librus::prelude::*;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt::layer().with_target(false))
    .init();
}

fn run(
  config_path: &str,
  train_path: &str,
  test_path: &str,
  normalizer_path: Option<&str>,
) -> Result<(), LibrusError> {
  let config = ClassifierConfig::from_path(config_path)?;
  let normalizer = match normalizer_path {
    Some(path) => NormalizerConfig::from_path(path)?,
    None => NormalizerConfig::default(),
  };
  let pipeline = LibrusPipeline::builder()
    .normalizer(StandardNormalizer::new(normalizer))
    .config(config)
    .build()?;

  let training = load_records(train_path)?;
  let test = load_records(test_path)?;
  let outcome = pipeline.run(&training, &test)?;

  let confusion = &outcome.report.confusion;
  for (actual, counts) in confusion.rows() {
    println!("For category: {actual}");
    for (predicted, count) in confusion.categories().iter().zip(counts) {
      println!("  guessed {predicted} {count} times");
    }
  }
  println!("Accuracy: {:.2}%", outcome.report.accuracy);
  Ok(())
}

fn main() -> ExitCode {
  init_tracing();

  let args: Vec<String> = std::env::args().skip(1).collect();
  let (config, train, test, normalizer) = match args.as_slice() {
    [config, train, test] => (config, train, test, None),
    [config, train, test, normalizer] => (config, train, test, Some(normalizer.as_str())),
    _ => {
      eprintln!("usage: classify_books <config.json> <train.json> <test.json> [normalizer.json]");
      return ExitCode::FAILURE;
    }
  };

  match run(config, train, test, normalizer) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      tracing::error!(%err, "classification failed");
      ExitCode::FAILURE
    }
  }
}
