//! Classifier evaluation over labelled rows

use std::fmt;

use super::classifier::Classifier;
use crate::features::TrainingRow;

/// Probabilities are clamped this far from 0 and 1 before taking logs
const LOG_EPS: f64 = 1e-15;

/// Metrics accumulated over predictions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    /// Number of correct winner picks
    pub correct: usize,
    /// Total predictions
    pub total: usize,
    /// Sum of per-row binary cross-entropy
    pub log_loss_sum: f64,
    /// Sum of squared probability errors
    pub brier_sum: f64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score every row with `classifier`
    pub fn evaluate<C: Classifier + ?Sized>(classifier: &C, rows: &[TrainingRow]) -> Self {
        let mut metrics = Metrics::new();
        for row in rows {
            let p = classifier.predict_probability(&row.features)[1];
            metrics.update(p, row.target);
        }
        metrics
    }

    /// Add one prediction: `p` = probability the first fighter wins
    pub fn update(&mut self, p: f64, target: u8) {
        let actual = if target == 1 { 1.0 } else { 0.0 };
        let predicted = if p > 0.5 { 1 } else { 0 };
        if predicted == target {
            self.correct += 1;
        }
        let clamped = p.clamp(LOG_EPS, 1.0 - LOG_EPS);
        self.log_loss_sum -= actual * clamped.ln() + (1.0 - actual) * (1.0 - clamped).ln();
        self.brier_sum += (p - actual).powi(2);
        self.total += 1;
    }

    /// Get winner-pick accuracy
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    /// Mean binary cross-entropy
    pub fn log_loss(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.log_loss_sum / self.total as f64
        }
    }

    /// Mean squared probability error
    pub fn brier(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.brier_sum / self.total as f64
        }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Acc: {:.2}% | Log loss: {:.4} | Brier: {:.4} | n={}",
            self.accuracy() * 100.0,
            self.log_loss(),
            self.brier(),
            self.total
        )
    }
}
