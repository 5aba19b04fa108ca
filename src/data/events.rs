//! Cleaning raw fight rows into dated, ordered events

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::MatchEvent;

/// A fight row as stored, date still as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub winner: String,
    pub loser: String,
    pub method: String,
    pub round: String,
    pub weight_class: String,
    pub date: String,
}

impl RawEvent {
    /// Parse the date and trim names. `None` if the date can't be read.
    pub fn to_event(&self, date_format: &str) -> Option<MatchEvent> {
        let date = NaiveDate::parse_from_str(self.date.trim(), date_format).ok()?;
        Some(MatchEvent {
            winner: self.winner.trim().to_string(),
            loser: self.loser.trim().to_string(),
            method: self.method.clone(),
            round: self.round.trim().to_string(),
            date,
            weight_class: self.weight_class.trim().to_string(),
        })
    }
}

/// Parse, drop undatable rows, and stable-sort by date.
///
/// Rows sharing a date stay in storage order.
pub fn prepare_events(raw: &[RawEvent], date_format: &str) -> Vec<MatchEvent> {
    let mut events = Vec::with_capacity(raw.len());
    let mut dropped = 0usize;

    for row in raw {
        match row.to_event(date_format) {
            Some(event) => events.push(event),
            None => {
                dropped += 1;
                log::debug!(
                    "Dropping {} vs {}: unparseable date {:?}",
                    row.winner.trim(),
                    row.loser.trim(),
                    row.date
                );
            }
        }
    }

    if dropped > 0 {
        log::warn!("Dropped {} fights with unparseable dates", dropped);
    }

    events.sort_by_key(|e| e.date);
    log::info!("Loaded {} dated fights", events.len());
    events
}
