//! Rating replay and feature extraction
//!
//! Turns an ordered fight history into per-fighter state and comparison features.

pub mod comparison;
pub mod elo;
pub mod replay;
pub mod store;
pub mod weight_class;

pub use comparison::{FeatureExtractor, FeatureVector, TrainingRow};
pub use elo::{EloConfig, Finish};
pub use replay::{RatingUpdate, ReplayEngine, ReplaySummary};
pub use store::{CompetitorRecord, CompetitorSnapshot, RatingStore, Standing};
pub use weight_class::{SizeAdjustment, Side, WeightClassAdjuster};
