//! Combat-sports ratings and matchup prediction
//!
//! Replays a league's fight history in date order to build per-fighter Elo,
//! streak, activity and strength-of-schedule state, derives comparison
//! features from that state, and scores hypothetical matchups.

pub mod data;
pub mod features;
pub mod predict;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use features::elo::EloConfig;

/// Winner/loser placeholder the source uses for draws and no-contests
pub const NULL_RESULT: &str = "Draw/NC";

/// Weight class label that never overwrites a fighter's division
pub const CATCH_WEIGHT: &str = "Catch Weight";

/// A single historical fight, already cleaned and dated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub winner: String,
    pub loser: String,
    /// Free-text method of victory ("KO/TKO", "Submission", "Decision - Unanimous", ...)
    pub method: String,
    /// Round the fight ended in, as recorded
    pub round: String,
    pub date: NaiveDate,
    pub weight_class: String,
}

impl MatchEvent {
    /// True when either side carries the draw/no-contest placeholder
    pub fn is_null_result(&self, sentinel: &str) -> bool {
        self.winner == sentinel || self.loser == sentinel
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum FightError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Please select two different fighters (got {0} twice)")]
    SameCompetitor(String),

    #[error("Unknown fighter: {0}")]
    UnknownCompetitor(String),

    #[error("No usable fights in the database - load event data first")]
    NoEvents,
}

pub type Result<T> = std::result::Result<T, FightError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub elo: EloConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub database_path: String,
    /// chrono format string for event dates ("March 04, 2023")
    pub date_format: String,
    pub null_result_sentinel: String,
    pub catch_weight_sentinel: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            database_path: "ufc_data.db".to_string(),
            date_format: "%B %d, %Y".to_string(),
            null_result_sentinel: NULL_RESULT.to_string(),
            catch_weight_sentinel: CATCH_WEIGHT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Effective-rating discount per weight class of size disadvantage
    pub tier_penalty: f64,
    /// Winning streak that counts as momentum
    pub momentum_streak: u32,
    /// Inactivity gap (months) that counts as an activity edge
    pub activity_gap_months: f64,
    /// Logistic model exported by the trainer; Elo baseline when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            tier_penalty: 0.10,
            momentum_streak: 3,
            activity_gap_months: 6.0,
            model_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub ratings_csv: String,
    pub stats_csv: String,
    pub training_csv: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            ratings_csv: "current_ratings.csv".to_string(),
            stats_csv: "fighter_stats.csv".to_string(),
            training_csv: "training_data.csv".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FightError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| FightError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FightError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(winner: &str, loser: &str) -> MatchEvent {
        MatchEvent {
            winner: winner.to_string(),
            loser: loser.to_string(),
            method: "Decision".to_string(),
            round: "3".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            weight_class: "Lightweight".to_string(),
        }
    }

    #[test]
    fn test_null_result_detection() {
        assert!(event(NULL_RESULT, NULL_RESULT).is_null_result(NULL_RESULT));
        assert!(event("Fighter A", NULL_RESULT).is_null_result(NULL_RESULT));
        assert!(!event("Fighter A", "Fighter B").is_null_result(NULL_RESULT));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.elo.initial_rating, 1500.0);
        assert_eq!(parsed.data.date_format, "%B %d, %Y");
        assert_eq!(parsed.scoring.momentum_streak, 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str("[elo]\nbase_k = 24.0\n").unwrap();
        assert_eq!(parsed.elo.base_k, 24.0);
        assert_eq!(parsed.elo.initial_rating, 1500.0);
        assert_eq!(parsed.data.database_path, "ufc_data.db");
    }
}
