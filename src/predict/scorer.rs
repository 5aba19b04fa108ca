//! Matchup scoring
//!
//! Size-adjust the two ratings, build the comparison vector, ask the
//! classifier, and explain the pick from the adjusted numbers.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::classifier::Classifier;
use crate::features::{CompetitorRecord, FeatureVector, Side, WeightClassAdjuster};
use crate::{FightError, Result, ScoringConfig};

/// Why the pick went the way it did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Factor {
    /// Winner's adjusted rating is higher by `gap`
    SkillEdge { gap: f64 },
    /// Winner is on a streak of at least the momentum threshold
    Momentum { streak: u32 },
    /// Winner has been out for `months` fewer months than the loser
    Activity { months: f64 },
}

impl Factor {
    pub fn describe(&self, winner: &str) -> String {
        match self {
            Factor::SkillEdge { gap } => format!(
                "Effective Skill Edge: {} has a higher adjusted ELO (+{}).",
                winner,
                gap.trunc() as i64
            ),
            Factor::Momentum { streak } => {
                format!("Momentum: {} is on a {}-fight win streak.", winner, streak)
            }
            Factor::Activity { .. } => format!("Activity: {} has been far more active.", winner),
        }
    }
}

/// Scored matchup
#[derive(Debug, Clone, Serialize)]
pub struct MatchupResult {
    pub first: String,
    pub second: String,
    pub winner: String,
    #[serde(skip)]
    pub winner_side: Side,
    /// Classifier probability that the first fighter wins
    pub first_win_probability: f64,
    /// Probability of the predicted winner, in [0.5, 1]
    pub confidence: f64,
    pub first_adjusted_rating: f64,
    pub second_adjusted_rating: f64,
    /// Winner's adjusted rating minus loser's (negative when the model
    /// picked the lower-rated fighter)
    pub adjusted_gap: f64,
    pub size_note: Option<String>,
    pub factors: Vec<Factor>,
}

impl MatchupResult {
    pub fn loser(&self) -> &str {
        match self.winner_side {
            Side::First => &self.second,
            Side::Second => &self.first,
        }
    }

    /// Size note followed by every factor, as display lines
    pub fn notes(&self) -> Vec<String> {
        self.size_note
            .iter()
            .cloned()
            .chain(self.factors.iter().map(|f| f.describe(&self.winner)))
            .collect()
    }
}

impl fmt::Display for MatchupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} def. {} ({:.1}%)",
            self.winner,
            self.loser(),
            self.confidence * 100.0
        )
    }
}

/// Scores matchups with an injected classifier. Read-only over records, so
/// one scorer can serve many threads.
pub struct MatchupScorer<C: Classifier> {
    classifier: C,
    adjuster: WeightClassAdjuster,
    momentum_streak: u32,
    activity_gap_months: f64,
}

impl<C: Classifier> MatchupScorer<C> {
    pub fn new(classifier: C) -> Self {
        Self::with_config(classifier, &ScoringConfig::default())
    }

    pub fn with_config(classifier: C, config: &ScoringConfig) -> Self {
        MatchupScorer {
            classifier,
            adjuster: WeightClassAdjuster::new(config.tier_penalty),
            momentum_streak: config.momentum_streak,
            activity_gap_months: config.activity_gap_months,
        }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Score `first` vs `second` as of `as_of`
    pub fn score(
        &self,
        first: &CompetitorRecord,
        second: &CompetitorRecord,
        as_of: NaiveDate,
    ) -> Result<MatchupResult> {
        if first.name == second.name {
            return Err(FightError::SameCompetitor(first.name.clone()));
        }

        let adjustment = self.adjuster.adjust(
            first.rating,
            first.weight_class.as_deref(),
            second.rating,
            second.weight_class.as_deref(),
        );

        let features = FeatureVector::from_records(
            first,
            adjustment.first_rating,
            second,
            adjustment.second_rating,
            as_of,
        );

        let p = self.classifier.predict_probability(&features)[1];
        let (winner_side, confidence) = if p > 0.5 {
            (Side::First, p)
        } else {
            (Side::Second, 1.0 - p)
        };

        let (winner, loser) = match winner_side {
            Side::First => (first, second),
            Side::Second => (second, first),
        };
        let adjusted_gap = adjustment.rating(winner_side) - adjustment.rating(winner_side.other());
        let factors = self.factors(winner, loser, adjusted_gap, as_of);

        log::debug!(
            "{} vs {}: features {:?}, p(first)={:.3}",
            first.name,
            second.name,
            features,
            p
        );

        Ok(MatchupResult {
            first: first.name.clone(),
            second: second.name.clone(),
            winner: winner.name.clone(),
            winner_side,
            first_win_probability: p,
            confidence,
            first_adjusted_rating: adjustment.first_rating,
            second_adjusted_rating: adjustment.second_rating,
            adjusted_gap,
            size_note: adjustment.note(&first.name, &second.name),
            factors,
        })
    }

    fn factors(
        &self,
        winner: &CompetitorRecord,
        loser: &CompetitorRecord,
        adjusted_gap: f64,
        as_of: NaiveDate,
    ) -> Vec<Factor> {
        let mut factors = Vec::new();

        if adjusted_gap > 0.0 {
            factors.push(Factor::SkillEdge { gap: adjusted_gap });
        }

        if winner.streak >= self.momentum_streak {
            factors.push(Factor::Momentum {
                streak: winner.streak,
            });
        }

        let activity_gap = loser.months_inactive(as_of) - winner.months_inactive(as_of);
        if activity_gap > self.activity_gap_months {
            factors.push(Factor::Activity {
                months: activity_gap,
            });
        }

        factors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::classifier::EloBaseline;
    use crate::EloConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fighter(name: &str, rating: f64, class: Option<&str>) -> CompetitorRecord {
        let mut r = CompetitorRecord::debutant(name, date(2024, 1, 1), &EloConfig::default());
        r.rating = rating;
        r.last_active = date(2024, 1, 1);
        r.total_fights = 10;
        r.weight_class = class.map(str::to_string);
        r
    }

    /// Always returns the same probability for the first fighter
    struct Fixed(f64);

    impl Classifier for Fixed {
        fn predict_probability(&self, _: &FeatureVector) -> [f64; 2] {
            [1.0 - self.0, self.0]
        }
    }

    /// Records the elo_diff it was asked about
    struct Spy(std::sync::Mutex<Vec<FeatureVector>>);

    impl Classifier for Spy {
        fn predict_probability(&self, features: &FeatureVector) -> [f64; 2] {
            self.0.lock().unwrap().push(*features);
            [0.5, 0.5]
        }
    }

    #[test]
    fn test_same_fighter_rejected() {
        let scorer = MatchupScorer::new(EloBaseline::default());
        let a = fighter("Fighter A", 1500.0, None);
        let err = scorer.score(&a, &a.clone(), date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, FightError::SameCompetitor(name) if name == "Fighter A"));
    }

    #[test]
    fn test_winner_and_confidence() {
        let a = fighter("A", 1500.0, None);
        let b = fighter("B", 1500.0, None);

        let result = MatchupScorer::new(Fixed(0.7)).score(&a, &b, date(2024, 6, 1)).unwrap();
        assert_eq!(result.winner, "A");
        assert_eq!(result.winner_side, Side::First);
        assert!((result.confidence - 0.7).abs() < 1e-12);

        let result = MatchupScorer::new(Fixed(0.2)).score(&a, &b, date(2024, 6, 1)).unwrap();
        assert_eq!(result.winner, "B");
        assert_eq!(result.loser(), "A");
        assert!((result.confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_coin_flip_goes_to_second() {
        let a = fighter("A", 1500.0, None);
        let b = fighter("B", 1500.0, None);
        let result = MatchupScorer::new(Fixed(0.5)).score(&a, &b, date(2024, 6, 1)).unwrap();
        assert_eq!(result.winner, "B");
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_classifier_sees_adjusted_ratings() {
        let heavy = fighter("Heavy", 1500.0, Some("Welterweight"));
        let light = fighter("Light", 1600.0, Some("Bantamweight"));
        let scorer = MatchupScorer::new(Spy(Default::default()));

        let result = scorer.score(&heavy, &light, date(2024, 6, 1)).unwrap();
        let seen = scorer.classifier().0.lock().unwrap()[0];
        // 1600 * 0.7 = 1120
        assert!((seen.elo_diff - 380.0).abs() < 1e-9);
        assert_eq!(result.first_adjusted_rating, 1500.0);
        assert!((result.second_adjusted_rating - 1120.0).abs() < 1e-9);
        assert_eq!(
            result.size_note.as_deref(),
            Some("SIZE MISMATCH: Light loses 30% effective ELO due to size difference (3 classes).")
        );
    }

    #[test]
    fn test_skill_edge_uses_adjusted_gap() {
        let heavy = fighter("Heavy", 1500.0, Some("Welterweight"));
        let light = fighter("Light", 1600.0, Some("Bantamweight"));
        let result = MatchupScorer::new(EloBaseline::default())
            .score(&heavy, &light, date(2024, 6, 1))
            .unwrap();

        assert_eq!(result.winner, "Heavy");
        assert!((result.adjusted_gap - 380.0).abs() < 1e-9);
        assert!(matches!(result.factors[0], Factor::SkillEdge { gap } if (gap - 380.0).abs() < 1e-9));
    }

    #[test]
    fn test_no_skill_edge_for_underdog_pick() {
        let a = fighter("A", 1400.0, None);
        let b = fighter("B", 1600.0, None);
        let result = MatchupScorer::new(Fixed(0.9)).score(&a, &b, date(2024, 6, 1)).unwrap();
        assert_eq!(result.winner, "A");
        assert!(result.adjusted_gap < 0.0);
        assert!(result.factors.is_empty());
    }

    #[test]
    fn test_momentum_and_activity_factors() {
        let mut hot = fighter("Hot", 1600.0, None);
        hot.streak = 4;
        hot.last_active = date(2024, 5, 1);
        let mut rusty = fighter("Rusty", 1500.0, None);
        rusty.streak = 6;
        rusty.last_active = date(2023, 1, 1);

        let result = MatchupScorer::new(EloBaseline::default())
            .score(&hot, &rusty, date(2024, 6, 1))
            .unwrap();

        assert_eq!(result.winner, "Hot");
        assert_eq!(result.factors.len(), 3);
        assert!(matches!(result.factors[1], Factor::Momentum { streak: 4 }));
        assert!(matches!(result.factors[2], Factor::Activity { months } if months > 6.0));

        let notes = result.notes();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[1], "Momentum: Hot is on a 4-fight win streak.");
        assert_eq!(notes[2], "Activity: Hot has been far more active.");
    }

    #[test]
    fn test_factor_thresholds() {
        let mut winner = fighter("W", 1600.0, None);
        winner.streak = 2;
        winner.last_active = date(2024, 1, 1);
        let mut loser = fighter("L", 1500.0, None);
        // 170 days more inactive: under the 6 month bar
        loser.last_active = date(2023, 7, 15);

        let result = MatchupScorer::new(EloBaseline::default())
            .score(&winner, &loser, date(2024, 6, 1))
            .unwrap();
        assert_eq!(result.factors.len(), 1);

        winner.streak = 3;
        let result = MatchupScorer::new(EloBaseline::default())
            .score(&winner, &loser, date(2024, 6, 1))
            .unwrap();
        assert!(result.factors.contains(&Factor::Momentum { streak: 3 }));
    }

    #[test]
    fn test_skill_edge_text_truncates() {
        let f = Factor::SkillEdge { gap: 57.9 };
        assert_eq!(
            f.describe("A"),
            "Effective Skill Edge: A has a higher adjusted ELO (+57)."
        );
    }

    #[test]
    fn test_scorer_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<MatchupScorer<EloBaseline>>();
    }
}
