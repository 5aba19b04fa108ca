//! Per-fighter rating state
//!
//! The store is an explicit value owned by whoever runs the replay.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use super::elo::EloConfig;

/// Everything the replay knows about one fighter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRecord {
    pub name: String,
    pub rating: f64,
    /// Consecutive wins, reset by any loss
    pub streak: u32,
    pub total_fights: u32,
    pub last_active: NaiveDate,
    /// Pre-fight ratings of the most recent opponents, oldest first
    pub recent_opponents: VecDeque<f64>,
    /// Last division fought in, catch weight excluded
    pub weight_class: Option<String>,
}

impl CompetitorRecord {
    /// Neutral state for a fighter first seen on `first_fight`
    pub fn debutant(name: &str, first_fight: NaiveDate, config: &EloConfig) -> Self {
        CompetitorRecord {
            name: name.to_string(),
            rating: config.initial_rating,
            streak: 0,
            total_fights: 0,
            last_active: first_fight - Duration::days(config.debut_offset_days),
            recent_opponents: VecDeque::with_capacity(config.opponent_window),
            weight_class: None,
        }
    }

    /// Months (30-day) since the last fight, never negative
    pub fn months_inactive(&self, as_of: NaiveDate) -> f64 {
        let days = (as_of - self.last_active).num_days();
        (days as f64 / 30.0).max(0.0)
    }

    /// Mean rating of the recent opponents, if any
    pub fn strength_of_schedule(&self) -> Option<f64> {
        if self.recent_opponents.is_empty() {
            return None;
        }
        let total: f64 = self.recent_opponents.iter().sum();
        Some(total / self.recent_opponents.len() as f64)
    }

    /// Record an opponent's pre-fight rating, evicting the oldest past `window`
    pub fn push_opponent(&mut self, rating: f64, window: usize) {
        self.recent_opponents.push_back(rating);
        while self.recent_opponents.len() > window {
            self.recent_opponents.pop_front();
        }
    }
}

/// Leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub name: String,
    pub rating: f64,
}

/// Flattened record for export, evaluated at a reference date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorSnapshot {
    pub name: String,
    pub rating: f64,
    pub streak: u32,
    pub avg_opponent_rating: f64,
    pub months_inactive: f64,
    pub total_fights: u32,
    pub weight_class: Option<String>,
}

/// All fighter records from one replay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingStore {
    records: HashMap<String, CompetitorRecord>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CompetitorRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Current rating, or the starting rating for an unseen fighter
    pub fn rating(&self, name: &str, config: &EloConfig) -> f64 {
        self.records
            .get(name)
            .map(|r| r.rating)
            .unwrap_or(config.initial_rating)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut CompetitorRecord> {
        self.records.get_mut(name)
    }

    /// Create a debutant record if `name` has not been seen yet
    pub fn ensure(&mut self, name: &str, date: NaiveDate, config: &EloConfig) -> &mut CompetitorRecord {
        self.records
            .entry(name.to_string())
            .or_insert_with(|| CompetitorRecord::debutant(name, date, config))
    }

    pub fn records(&self) -> impl Iterator<Item = &CompetitorRecord> {
        self.records.values()
    }

    /// Records sorted by rating (highest first), ties by name
    pub fn ranked(&self) -> Vec<&CompetitorRecord> {
        let mut ranked: Vec<_> = self.records.values().collect();
        ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.name.cmp(&b.name)));
        ranked
    }

    /// Leaderboard, highest rating first
    pub fn standings(&self) -> Vec<Standing> {
        self.ranked()
            .into_iter()
            .map(|r| Standing {
                name: r.name.clone(),
                rating: r.rating,
            })
            .collect()
    }

    /// Export rows in leaderboard order. Fighters with no recorded opponents
    /// get `default_opponent_rating` as their strength of schedule.
    pub fn snapshot(&self, as_of: NaiveDate, default_opponent_rating: f64) -> Vec<CompetitorSnapshot> {
        self.ranked()
            .into_iter()
            .map(|r| CompetitorSnapshot {
                name: r.name.clone(),
                rating: r.rating,
                streak: r.streak,
                avg_opponent_rating: r.strength_of_schedule().unwrap_or(default_opponent_rating),
                months_inactive: r.months_inactive(as_of),
                total_fights: r.total_fights,
                weight_class: r.weight_class.clone(),
            })
            .collect()
    }
}
