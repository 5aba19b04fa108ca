//! Head-to-head comparison features
//!
//! Four differences between two fighters, always "first minus second".

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::store::CompetitorRecord;

/// Differences between two fighters (first - second)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    pub elo_diff: f64,
    pub streak_diff: f64,
    /// Negative means the first fighter is less rusty
    pub months_since_diff: f64,
    pub exp_diff: f64,
}

impl FeatureVector {
    pub const DIM: usize = 4;

    pub const NAMES: [&'static str; Self::DIM] =
        ["elo_diff", "streak_diff", "months_since_diff", "exp_diff"];

    /// Compare two fighters using explicit (possibly adjusted) ratings
    pub fn from_records(
        first: &CompetitorRecord,
        first_rating: f64,
        second: &CompetitorRecord,
        second_rating: f64,
        as_of: NaiveDate,
    ) -> Self {
        FeatureVector {
            elo_diff: first_rating - second_rating,
            streak_diff: first.streak as f64 - second.streak as f64,
            months_since_diff: first.months_inactive(as_of) - second.months_inactive(as_of),
            exp_diff: first.total_fights as f64 - second.total_fights as f64,
        }
    }

    /// Compare two fighters on their stored ratings
    pub fn between(first: &CompetitorRecord, second: &CompetitorRecord, as_of: NaiveDate) -> Self {
        Self::from_records(first, first.rating, second, second.rating, as_of)
    }

    pub fn to_array(&self) -> [f64; Self::DIM] {
        [self.elo_diff, self.streak_diff, self.months_since_diff, self.exp_diff]
    }
}

/// One labelled example: features from the first fighter's point of view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingRow {
    pub features: FeatureVector,
    /// 1 when the first fighter won
    pub target: u8,
}

impl TrainingRow {
    /// Row with the winner or the loser bound to the first slot
    pub fn labelled(
        winner: &CompetitorRecord,
        loser: &CompetitorRecord,
        date: NaiveDate,
        winner_first: bool,
    ) -> Self {
        if winner_first {
            TrainingRow {
                features: FeatureVector::between(winner, loser, date),
                target: 1,
            }
        } else {
            TrainingRow {
                features: FeatureVector::between(loser, winner, date),
                target: 0,
            }
        }
    }
}

/// Builds training rows with a coin flip deciding which fighter goes first,
/// so a classifier can't learn "first slot wins".
pub struct FeatureExtractor<R: Rng> {
    rng: R,
}

impl FeatureExtractor<StdRng> {
    /// Reproducible extractor
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FeatureExtractor<R> {
    pub fn new(rng: R) -> Self {
        FeatureExtractor { rng }
    }

    /// Pre-fight row for a fight `winner` won on `date`
    pub fn training_row(
        &mut self,
        winner: &CompetitorRecord,
        loser: &CompetitorRecord,
        date: NaiveDate,
    ) -> TrainingRow {
        let winner_first = self.rng.gen_bool(0.5);
        TrainingRow::labelled(winner, loser, date, winner_first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EloConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(name: &str, rating: f64, streak: u32, fights: u32, last: NaiveDate) -> CompetitorRecord {
        let mut r = CompetitorRecord::debutant(name, last, &EloConfig::default());
        r.rating = rating;
        r.streak = streak;
        r.total_fights = fights;
        r.last_active = last;
        r
    }

    #[test]
    fn test_feature_values() {
        let a = record("A", 1600.0, 4, 12, date(2024, 1, 1));
        let b = record("B", 1450.0, 1, 20, date(2023, 7, 5));
        let f = FeatureVector::between(&a, &b, date(2024, 3, 1));

        assert!((f.elo_diff - 150.0).abs() < 1e-9);
        assert_eq!(f.streak_diff, 3.0);
        assert_eq!(f.exp_diff, -8.0);
        // 60 days vs 240 days
        assert!((f.months_since_diff - (2.0 - 8.0)).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_ratings_override_stored() {
        let a = record("A", 1600.0, 0, 0, date(2024, 1, 1));
        let b = record("B", 1600.0, 0, 0, date(2024, 1, 1));
        let f = FeatureVector::from_records(&a, 1600.0, &b, 1120.0, date(2024, 1, 1));
        assert!((f.elo_diff - 480.0).abs() < 1e-9);
    }

    #[test]
    fn test_swapping_sides_negates_and_flips_label() {
        let winner = record("W", 1532.7, 2, 7, date(2023, 11, 18));
        let loser = record("L", 1611.4, 5, 15, date(2024, 2, 3));
        let fight = date(2024, 4, 13);

        let first = TrainingRow::labelled(&winner, &loser, fight, true);
        let second = TrainingRow::labelled(&winner, &loser, fight, false);

        assert_eq!(first.target, 1);
        assert_eq!(second.target, 0);
        let a = first.features.to_array();
        let b = second.features.to_array();
        for i in 0..FeatureVector::DIM {
            assert_eq!(a[i], -b[i], "{} not negated", FeatureVector::NAMES[i]);
        }
    }

    #[test]
    fn test_seeded_extractor_is_reproducible() {
        let winner = record("W", 1550.0, 1, 3, date(2023, 1, 1));
        let loser = record("L", 1500.0, 0, 2, date(2023, 6, 1));
        let fight = date(2024, 1, 1);

        let mut first = FeatureExtractor::seeded(42);
        let mut second = FeatureExtractor::seeded(42);
        let a: Vec<_> = (0..50).map(|_| first.training_row(&winner, &loser, fight)).collect();
        let b: Vec<_> = (0..50).map(|_| second.training_row(&winner, &loser, fight)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_coin_flip_uses_both_orientations() {
        let winner = record("W", 1550.0, 1, 3, date(2023, 1, 1));
        let loser = record("L", 1500.0, 0, 2, date(2023, 6, 1));
        let mut extractor = FeatureExtractor::seeded(7);
        let wins: usize = (0..200)
            .map(|_| extractor.training_row(&winner, &loser, date(2024, 1, 1)).target as usize)
            .sum();
        assert!(wins > 50 && wins < 150, "{wins} of 200 rows had the winner first");
    }

    #[test]
    fn test_label_matches_elo_sign() {
        let winner = record("W", 1550.0, 0, 0, date(2023, 1, 1));
        let loser = record("L", 1500.0, 0, 0, date(2023, 1, 1));
        let mut extractor = FeatureExtractor::seeded(3);
        for _ in 0..20 {
            let row = extractor.training_row(&winner, &loser, date(2024, 1, 1));
            if row.target == 1 {
                assert!(row.features.elo_diff > 0.0);
            } else {
                assert!(row.features.elo_diff < 0.0);
            }
        }
    }
}
