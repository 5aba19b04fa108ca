//! Binary classifiers over comparison features
//!
//! Training happens elsewhere; here a model is anything that can answer
//! "does the first fighter win, and how likely".

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::features::elo::expected_score;
use crate::features::FeatureVector;
use crate::{FightError, Result};

/// Outcome model. Index 1 of the probability pair is "first fighter wins".
pub trait Classifier: Send + Sync {
    /// `[p(first loses), p(first wins)]`
    fn predict_probability(&self, features: &FeatureVector) -> [f64; 2];

    /// 1 if the first fighter is predicted to win
    fn predict(&self, features: &FeatureVector) -> u8 {
        if self.predict_probability(features)[1] > 0.5 {
            1
        } else {
            0
        }
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict_probability(&self, features: &FeatureVector) -> [f64; 2] {
        (**self).predict_probability(features)
    }

    fn predict(&self, features: &FeatureVector) -> u8 {
        (**self).predict(features)
    }
}

/// Rating-only baseline: the Elo expected score of the rating gap
#[derive(Debug, Clone, Copy)]
pub struct EloBaseline {
    pub scale: f64,
}

impl Default for EloBaseline {
    fn default() -> Self {
        EloBaseline { scale: 400.0 }
    }
}

impl Classifier for EloBaseline {
    fn predict_probability(&self, features: &FeatureVector) -> [f64; 2] {
        let p = expected_score(features.elo_diff, 0.0, self.scale);
        [1.0 - p, p]
    }
}

/// Logistic regression exported as JSON by the training pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One weight per feature, in `FeatureVector::NAMES` order
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub fn new(coefficients: [f64; FeatureVector::DIM], intercept: f64) -> Self {
        LogisticModel {
            coefficients: coefficients.to_vec(),
            intercept,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let model: LogisticModel = serde_json::from_str(json)
            .map_err(|e| FightError::Parse(format!("Invalid model file: {}", e)))?;
        if model.coefficients.len() != FeatureVector::DIM {
            return Err(FightError::Parse(format!(
                "Model has {} coefficients, expected {}",
                model.coefficients.len(),
                FeatureVector::DIM
            )));
        }
        Ok(model)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn logit(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features.to_array())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for LogisticModel {
    fn predict_probability(&self, features: &FeatureVector) -> [f64; 2] {
        let p = 1.0 / (1.0 + (-self.logit(features)).exp());
        [1.0 - p, p]
    }
}
