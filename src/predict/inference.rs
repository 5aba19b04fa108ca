//! Matchup predictions from a replayed fight history

use chrono::NaiveDate;

use super::classifier::{Classifier, EloBaseline, LogisticModel};
use super::scorer::{MatchupResult, MatchupScorer};
use crate::data::{prepare_events, Database};
use crate::features::{CompetitorRecord, RatingStore, ReplayEngine};
use crate::{Config, FightError, MatchEvent, Result};

/// Predictor for making matchup predictions
pub struct Predictor<C: Classifier> {
    store: RatingStore,
    scorer: MatchupScorer<C>,
    as_of: NaiveDate,
}

impl<C: Classifier> Predictor<C> {
    /// Create a predictor over an already replayed store
    pub fn new(store: RatingStore, scorer: MatchupScorer<C>, as_of: NaiveDate) -> Self {
        Predictor { store, scorer, as_of }
    }

    /// Replay `events` from scratch and predict as of `as_of`
    pub fn from_events(
        events: &[MatchEvent],
        config: &Config,
        classifier: C,
        as_of: NaiveDate,
    ) -> Result<Self> {
        if events.is_empty() {
            return Err(FightError::NoEvents);
        }
        let engine = ReplayEngine::from_config(config);
        let (store, _) = engine.replay(RatingStore::new(), events);
        let scorer = MatchupScorer::with_config(classifier, &config.scoring);
        Ok(Self::new(store, scorer, as_of))
    }

    /// Load the full history from the database and replay it
    pub fn from_database(db: &Database, config: &Config, classifier: C, as_of: NaiveDate) -> Result<Self> {
        let raw = db.load_raw_events()?;
        let events = prepare_events(&raw, &config.data.date_format);
        Self::from_events(&events, config, classifier, as_of)
    }

    /// Predict a single matchup by fighter name
    pub fn predict(&self, first: &str, second: &str) -> Result<MatchupResult> {
        if first.trim() == second.trim() {
            return Err(FightError::SameCompetitor(first.trim().to_string()));
        }
        let a = self.lookup(first)?;
        let b = self.lookup(second)?;
        self.scorer.score(a, b, self.as_of)
    }

    fn lookup(&self, name: &str) -> Result<&CompetitorRecord> {
        self.store
            .get(name.trim())
            .ok_or_else(|| FightError::UnknownCompetitor(name.to_string()))
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }
}

/// Trained logistic model if configured, otherwise the Elo baseline
pub fn load_classifier(config: &Config) -> Result<Box<dyn Classifier>> {
    match &config.scoring.model_path {
        Some(path) => {
            log::info!("Loading model from {}", path);
            Ok(Box::new(LogisticModel::load(path)?))
        }
        None => {
            log::info!("No model configured, using Elo baseline");
            Ok(Box::new(EloBaseline {
                scale: config.elo.scale,
            }))
        }
    }
}

/// Format a prediction for display
pub fn format_matchup(result: &MatchupResult) -> String {
    let mut factors = String::new();
    for note in result.notes() {
        factors.push_str(&format!("│    • {}\n", note));
    }
    if factors.is_empty() {
        factors.push_str("│    (none)\n");
    }

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  {} vs {}
├─────────────────────────────────────────────────┤
│  Prediction:       {} will win
│  Confidence:       {:.1}%
│  Adjusted ELO:     {:.0} - {:.0}
│  Key factors:
{}└─────────────────────────────────────────────────┘
"#,
        result.first,
        result.second,
        result.winner,
        result.confidence * 100.0,
        result.first_adjusted_rating,
        result.second_adjusted_rating,
        factors
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawEvent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.insert_event("e1", "Card 1", "January 18, 2020").unwrap();
        db.insert_event("e2", "Card 2", "July 10, 2021").unwrap();
        let fights = [
            ("f1", "e1", "Striker", "Grappler", "KO/TKO", "1"),
            ("f2", "e1", "Veteran", "Prospect", "Decision - Unanimous", "3"),
            ("f3", "e2", "Striker", "Veteran", "Submission", "2"),
        ];
        for (id, event, winner, loser, method, round) in fights {
            let raw = RawEvent {
                winner: winner.to_string(),
                loser: loser.to_string(),
                method: method.to_string(),
                round: round.to_string(),
                weight_class: "Lightweight".to_string(),
                date: String::new(),
            };
            db.insert_fight(id, event, &raw).unwrap();
        }
        db
    }

    #[test]
    fn test_predict_from_database() {
        let db = seeded_db();
        let predictor =
            Predictor::from_database(&db, &Config::default(), EloBaseline::default(), date(2022, 1, 1))
                .unwrap();
        assert_eq!(predictor.store().len(), 4);

        let result = predictor.predict("Striker", "Prospect").unwrap();
        assert_eq!(result.winner, "Striker");
        assert!(result.confidence > 0.5);
        assert!(result.notes().iter().any(|n| n.starts_with("Effective Skill Edge")));
    }

    #[test]
    fn test_unknown_and_duplicate_names() {
        let db = seeded_db();
        let predictor =
            Predictor::from_database(&db, &Config::default(), EloBaseline::default(), date(2022, 1, 1))
                .unwrap();

        assert!(matches!(
            predictor.predict("Striker", "Nobody"),
            Err(FightError::UnknownCompetitor(name)) if name == "Nobody"
        ));
        assert!(matches!(
            predictor.predict("Striker", "Striker"),
            Err(FightError::SameCompetitor(_))
        ));
    }

    #[test]
    fn test_empty_history() {
        let db = Database::in_memory().unwrap();
        let result =
            Predictor::from_database(&db, &Config::default(), EloBaseline::default(), date(2022, 1, 1));
        assert!(matches!(result, Err(FightError::NoEvents)));
    }

    #[test]
    fn test_default_classifier_is_baseline() {
        let classifier = load_classifier(&Config::default()).unwrap();
        let p = classifier.predict_probability(&crate::features::FeatureVector::default());
        assert!((p[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_format_matchup_lists_factors() {
        let db = seeded_db();
        let predictor =
            Predictor::from_database(&db, &Config::default(), EloBaseline::default(), date(2022, 1, 1))
                .unwrap();
        let result = predictor.predict("Striker", "Grappler").unwrap();
        let text = format_matchup(&result);
        assert!(text.contains("Striker will win"));
        assert!(text.contains("Effective Skill Edge"));
    }
}
