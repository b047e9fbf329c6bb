//! Librus - a naive Bayes bag-of-words classifier for book records.
//!
//! Librus normalizes the title and description of each record into tokens,
//! counts weighted token frequencies per category, and scores new records by
//! their log-likelihood under each category.

pub mod types;
pub mod error;
pub mod config;
pub mod normalizer;
pub mod preprocess;
pub mod bow;
pub mod classifier;
pub mod evaluate;
pub mod dataset;
pub mod engine;

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::types::*;
    pub use crate::error::LibrusError;
    pub use crate::config::*;
    pub use crate::normalizer::*;
    pub use crate::preprocess::*;
    pub use crate::bow::{BagOfWordsBuilder, CategoryMass, FrequencyTable, Vocabulary};
    pub use crate::classifier::*;
    pub use crate::evaluate::*;
    pub use crate::dataset::*;
    pub use crate::engine::*;
}
