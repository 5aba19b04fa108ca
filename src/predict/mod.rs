//! Prediction and inference
//!
//! Classifiers, matchup scoring and evaluation.

pub mod classifier;
pub mod inference;
pub mod metrics;
pub mod scorer;

pub use classifier::{Classifier, EloBaseline, LogisticModel};
pub use inference::{format_matchup, load_classifier, Predictor};
pub use metrics::Metrics;
pub use scorer::{Factor, MatchupResult, MatchupScorer};
