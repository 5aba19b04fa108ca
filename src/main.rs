//! Fight ratings and matchup prediction CLI
//!
//! Replays fight history into Elo ratings, exports stats and training data,
//! and predicts matchups.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fightiq::{Config, Result};

#[derive(Parser)]
#[command(name = "fightiq")]
#[command(about = "Elo ratings and matchup predictions for combat sports", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Data management commands
    Data {
        #[command(subcommand)]
        action: DataCommands,
    },
    /// Replay history and show the current leaderboard
    Ratings {
        /// Number of fighters to print
        #[arg(long, default_value = "10")]
        top: usize,
    },
    /// Export per-fighter stats (rating, streak, schedule strength, inactivity)
    ExportStats {
        /// Reference date for inactivity (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Build labelled pre-fight feature rows for model training
    PrepTraining {
        /// Seed for the winner/loser orientation coin flip
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Predict a matchup
    Predict {
        /// First fighter
        first: String,
        /// Second fighter
        second: String,
        /// Reference date for inactivity (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Score the configured classifier on every historical fight
    Evaluate {
        /// Seed for the winner/loser orientation coin flip
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Write a default config file
    Init,
}

#[derive(Subcommand)]
enum DataCommands {
    /// Show database status
    Status,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Data { action } => match action {
            DataCommands::Status => commands::data_status(&config),
        },
        Commands::Ratings { top } => commands::ratings(&config, top),
        Commands::ExportStats { as_of } => commands::export_stats(&config, as_of),
        Commands::PrepTraining { seed } => commands::prep_training(&config, seed),
        Commands::Predict {
            first,
            second,
            as_of,
            format,
        } => commands::predict(&config, &first, &second, as_of, format),
        Commands::Evaluate { seed } => commands::evaluate(&config, seed),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use fightiq::data::{export, prepare_events, Database};
    use fightiq::features::replay::last_event_date;
    use fightiq::features::{FeatureExtractor, RatingStore, ReplayEngine};
    use fightiq::predict::{format_matchup, load_classifier, Metrics, Predictor};
    use fightiq::{FightError, MatchEvent};

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Dated, ordered history from the configured database
    fn load_events(config: &Config) -> Result<Vec<MatchEvent>> {
        let db = Database::open(&config.data.database_path)?;
        let raw = db.load_raw_events()?;
        println!("Loaded {} fights from {}", raw.len(), config.data.database_path);
        let events = prepare_events(&raw, &config.data.date_format);
        if events.is_empty() {
            return Err(FightError::NoEvents);
        }
        Ok(events)
    }

    fn replay(config: &Config) -> Result<RatingStore> {
        let events = load_events(config)?;
        println!("Processing {} fights chronologically...", events.len());
        let engine = ReplayEngine::from_config(config);
        let (store, _) = engine.replay(RatingStore::new(), &events);
        Ok(store)
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Point data.database_path in {} at your scraped fight database", config_path);
        println!("  2. Run 'fightiq ratings' to see the leaderboard");
        println!("  3. Run 'fightiq prep-training' to export training rows");
        println!("  4. Run 'fightiq predict \"Fighter A\" \"Fighter B\"' to predict a matchup");

        Ok(())
    }

    pub fn data_status(config: &Config) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let stats = db.get_stats()?;

        println!("Database Status");
        println!("───────────────────────────────");
        println!("  Path:     {}", config.data.database_path);
        println!("  Events:   {}", stats.event_count);
        println!("  Fights:   {}", stats.fight_count);
        if let Some(latest) = stats.latest_event {
            println!("  Latest:   {}", latest);
        }

        let raw = db.load_raw_events()?;
        let events = prepare_events(&raw, &config.data.date_format);
        if let (Some(first), Some(last)) = (events.first(), last_event_date(&events)) {
            println!("  Range:    {} to {}", first.date, last);
        }
        let undated = raw.len() - events.len();
        if undated > 0 {
            println!("  Undated:  {} (skipped during replay)", undated);
        }

        Ok(())
    }

    pub fn ratings(config: &Config, top: usize) -> Result<()> {
        let store = replay(config)?;
        let standings = store.standings();

        println!("\n--- TOP {} FIGHTERS (CURRENT ELO) ---", top);
        for (rank, s) in standings.iter().take(top).enumerate() {
            println!("{:>3}. {:<30} {:>8.1}", rank + 1, s.name, s.rating);
        }

        export::to_file(&config.output.ratings_csv, |out| export::write_standings(out, &standings))?;
        println!("\nSaved ratings to '{}'", config.output.ratings_csv);
        Ok(())
    }

    pub fn export_stats(config: &Config, as_of: Option<NaiveDate>) -> Result<()> {
        let store = replay(config)?;
        let as_of = as_of.unwrap_or_else(today);
        let rows = store.snapshot(as_of, config.elo.initial_rating);

        export::to_file(&config.output.stats_csv, |out| export::write_stats(out, &rows))?;
        println!(
            "Exported stats for {} fighters (as of {}) to '{}'",
            rows.len(),
            as_of,
            config.output.stats_csv
        );
        Ok(())
    }

    pub fn prep_training(config: &Config, seed: u64) -> Result<()> {
        let events = load_events(config)?;
        println!("Engineering features for {} fights...", events.len());

        let engine = ReplayEngine::from_config(config);
        let mut extractor = FeatureExtractor::seeded(seed);
        let (_, rows) = engine.replay_with_training(RatingStore::new(), &events, &mut extractor);

        export::to_file(&config.output.training_csv, |out| export::write_training(out, &rows))?;
        let winners_first = rows.iter().filter(|r| r.target == 1).count();
        println!(
            "Saved {} rows to '{}' ({} with the winner first, seed {})",
            rows.len(),
            config.output.training_csv,
            winners_first,
            seed
        );
        Ok(())
    }

    pub fn predict(
        config: &Config,
        first: &str,
        second: &str,
        as_of: Option<NaiveDate>,
        format: OutputFormat,
    ) -> Result<()> {
        let events = load_events(config)?;
        let classifier = load_classifier(config)?;
        let predictor = Predictor::from_events(&events, config, classifier, as_of.unwrap_or_else(today))?;
        let result = predictor.predict(first, second)?;

        match format {
            OutputFormat::Table => {
                print!("{}", format_matchup(&result));
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&result)
                    .map_err(|e| FightError::Parse(e.to_string()))?;
                println!("{}", json);
            }
            OutputFormat::Csv => {
                println!("first,second,winner,confidence,adjusted_gap");
                println!(
                    "{},{},{},{:.3},{:.1}",
                    result.first, result.second, result.winner, result.confidence, result.adjusted_gap
                );
            }
        }

        Ok(())
    }

    pub fn evaluate(config: &Config, seed: u64) -> Result<()> {
        let events = load_events(config)?;
        let engine = ReplayEngine::from_config(config);
        let mut extractor = FeatureExtractor::seeded(seed);
        let (_, rows) = engine.replay_with_training(RatingStore::new(), &events, &mut extractor);

        let classifier = load_classifier(config)?;
        let metrics = Metrics::evaluate(classifier.as_ref(), &rows);

        println!("Evaluation on {} pre-fight rows", rows.len());
        println!("  {}", metrics);
        Ok(())
    }
}
