//! Elo rating system for fighter strength estimation
//!
//! Expected score and finish-sensitive K-factor used by the replay.

use serde::{Deserialize, Serialize};

/// Elo rating configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EloConfig {
    /// Starting rating for debutants
    pub initial_rating: f64,
    /// K-factor for a decision (or any unrecognised method)
    pub base_k: f64,
    /// Multiplier for KO/TKO finishes
    pub ko_multiplier: f64,
    /// Extra multiplier for a KO/TKO in round one, stacked on `ko_multiplier`
    pub first_round_multiplier: f64,
    /// Multiplier for submission finishes
    pub submission_multiplier: f64,
    /// Logistic scale in rating points
    pub scale: f64,
    /// Number of recent opponents kept for strength of schedule
    pub opponent_window: usize,
    /// Debutants start as if their last fight was this many days before their first
    pub debut_offset_days: i64,
}

impl Default for EloConfig {
    fn default() -> Self {
        EloConfig {
            initial_rating: 1500.0,
            base_k: 32.0,
            ko_multiplier: 1.5,
            first_round_multiplier: 1.2,
            submission_multiplier: 1.3,
            scale: 400.0,
            opponent_window: 3,
            debut_offset_days: 365,
        }
    }
}

/// How a fight ended, as far as the K-factor cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Knockout,
    Submission,
    Decision,
}

impl Finish {
    /// Classify free-text method. Anything unrecognised counts as a decision.
    pub fn from_method(method: &str) -> Self {
        let method = method.to_lowercase();
        // "tko" contains "ko"; both spellings land here
        if method.contains("ko") {
            Finish::Knockout
        } else if method.contains("submission") {
            Finish::Submission
        } else {
            Finish::Decision
        }
    }
}

/// Probability (0-1) that a fighter rated `rating` beats one rated `opponent`
pub fn expected_score(rating: f64, opponent: f64, scale: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent - rating) / scale))
}

impl EloConfig {
    /// Expected score for `rating` against `opponent` under this config
    pub fn expected_score(&self, rating: f64, opponent: f64) -> f64 {
        expected_score(rating, opponent, self.scale)
    }

    /// K-factor for a fight ending by `method` in `round`
    pub fn k_factor(&self, method: &str, round: &str) -> f64 {
        match Finish::from_method(method) {
            Finish::Knockout => {
                let k = self.base_k * self.ko_multiplier;
                if round.trim() == "1" {
                    k * self.first_round_multiplier
                } else {
                    k
                }
            }
            Finish::Submission => self.base_k * self.submission_multiplier,
            Finish::Decision => self.base_k,
        }
    }

    /// Points the winner takes from the loser
    pub fn rating_change(&self, winner: f64, loser: f64, method: &str, round: &str) -> f64 {
        let expected = self.expected_score(winner, loser);
        self.k_factor(method, round) * (1.0 - expected)
    }
}
