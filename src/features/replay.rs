//! Chronological replay of fight history
//!
//! Folds an ordered list of fights into a [`RatingStore`]. Order matters:
//! every update reads the state left by the fights before it.

use chrono::NaiveDate;
use rand::Rng;

use super::comparison::{FeatureExtractor, TrainingRow};
use super::elo::EloConfig;
use super::store::RatingStore;
use crate::{Config, MatchEvent, CATCH_WEIGHT, NULL_RESULT};

/// What one counted fight did to the two ratings
#[derive(Debug, Clone, PartialEq)]
pub struct RatingUpdate {
    pub winner_before: f64,
    pub loser_before: f64,
    /// Winner's expected score going in
    pub expected: f64,
    pub k_factor: f64,
    /// Points moved from loser to winner
    pub delta: f64,
}

/// Counts from one replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub counted: usize,
    pub null_results: usize,
}

/// Applies fights to a rating store, one at a time, in date order
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    elo: EloConfig,
    null_result: String,
    catch_weight: String,
}

impl Default for ReplayEngine {
    fn default() -> Self {
        Self::new(EloConfig::default())
    }
}

impl ReplayEngine {
    pub fn new(elo: EloConfig) -> Self {
        ReplayEngine {
            elo,
            null_result: NULL_RESULT.to_string(),
            catch_weight: CATCH_WEIGHT.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        ReplayEngine {
            elo: config.elo.clone(),
            null_result: config.data.null_result_sentinel.clone(),
            catch_weight: config.data.catch_weight_sentinel.clone(),
        }
    }

    pub fn elo(&self) -> &EloConfig {
        &self.elo
    }

    /// True when the fight is a draw/no-contest and must not touch any record
    pub fn is_null_result(&self, event: &MatchEvent) -> bool {
        event.is_null_result(&self.null_result)
    }

    /// Apply one fight. Returns `None` for a null result, which leaves the
    /// store untouched.
    pub fn apply(&self, store: &mut RatingStore, event: &MatchEvent) -> Option<RatingUpdate> {
        if self.is_null_result(event) {
            return None;
        }
        self.ensure_records(store, event);
        Some(self.update(store, event))
    }

    /// Replay `events` into `store` and hand the store back.
    ///
    /// Fights are taken in ascending date order; fights sharing a date keep
    /// the order they were given in.
    pub fn replay(&self, mut store: RatingStore, events: &[MatchEvent]) -> (RatingStore, ReplaySummary) {
        let mut summary = ReplaySummary::default();
        for event in chronological(events) {
            match self.apply(&mut store, event) {
                Some(_) => summary.counted += 1,
                None => summary.null_results += 1,
            }
        }
        log::info!(
            "Replayed {} fights ({} draws/no-contests skipped), {} fighters rated",
            summary.counted,
            summary.null_results,
            store.len()
        );
        (store, summary)
    }

    /// Replay while emitting one labelled pre-fight row per counted fight
    pub fn replay_with_training<R: Rng>(
        &self,
        mut store: RatingStore,
        events: &[MatchEvent],
        extractor: &mut FeatureExtractor<R>,
    ) -> (RatingStore, Vec<TrainingRow>) {
        let mut rows = Vec::with_capacity(events.len());
        for event in chronological(events) {
            if self.is_null_result(event) {
                continue;
            }
            self.ensure_records(&mut store, event);
            // Both records exist after ensure_records
            if let (Some(winner), Some(loser)) = (store.get(&event.winner), store.get(&event.loser)) {
                rows.push(extractor.training_row(winner, loser, event.date));
            }
            self.update(&mut store, event);
        }
        log::info!("Built {} training rows", rows.len());
        (store, rows)
    }

    fn ensure_records(&self, store: &mut RatingStore, event: &MatchEvent) {
        store.ensure(&event.winner, event.date, &self.elo);
        store.ensure(&event.loser, event.date, &self.elo);
    }

    fn update(&self, store: &mut RatingStore, event: &MatchEvent) -> RatingUpdate {
        let winner_before = store.rating(&event.winner, &self.elo);
        let loser_before = store.rating(&event.loser, &self.elo);

        let expected = self.elo.expected_score(winner_before, loser_before);
        let k_factor = self.elo.k_factor(&event.method, &event.round);
        let delta = self
            .elo
            .rating_change(winner_before, loser_before, &event.method, &event.round);

        let division = if event.weight_class == self.catch_weight {
            None
        } else {
            Some(event.weight_class.as_str())
        };
        let window = self.elo.opponent_window;

        if let Some(winner) = store.get_mut(&event.winner) {
            winner.rating += delta;
            winner.push_opponent(loser_before, window);
            winner.streak += 1;
            winner.total_fights += 1;
            winner.last_active = event.date;
            if let Some(class) = division {
                winner.weight_class = Some(class.to_string());
            }
        }
        if let Some(loser) = store.get_mut(&event.loser) {
            loser.rating -= delta;
            loser.push_opponent(winner_before, window);
            loser.streak = 0;
            loser.total_fights += 1;
            loser.last_active = event.date;
            if let Some(class) = division {
                loser.weight_class = Some(class.to_string());
            }
        }

        log::debug!(
            "{} def. {} ({}, R{}): K={:.1} E={:.3} Δ={:.2}",
            event.winner,
            event.loser,
            event.method,
            event.round,
            k_factor,
            expected,
            delta
        );

        RatingUpdate {
            winner_before,
            loser_before,
            expected,
            k_factor,
            delta,
        }
    }
}

/// Stable date ordering; same-day fights keep their input order
fn chronological(events: &[MatchEvent]) -> Vec<&MatchEvent> {
    let mut ordered: Vec<&MatchEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.date);
    ordered
}

/// Latest fight date in a history, if any
pub fn last_event_date(events: &[MatchEvent]) -> Option<NaiveDate> {
    events.iter().map(|e| e.date).max()
}
