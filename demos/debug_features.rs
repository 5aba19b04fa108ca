// Quick debug script to check comparison feature values
// Run with: cargo run --example debug_features

use fightiq::data::{prepare_events, Database};
use fightiq::features::{FeatureExtractor, FeatureVector, RatingStore, ReplayEngine};
use fightiq::Config;

fn main() -> fightiq::Result<()> {
    let config = Config::default();
    let db = Database::open(&config.data.database_path)?;
    let raw = db.load_raw_events()?;
    let events = prepare_events(&raw, &config.data.date_format);

    let engine = ReplayEngine::from_config(&config);
    let mut extractor = FeatureExtractor::seeded(42);
    let (store, rows) = engine.replay_with_training(RatingStore::new(), &events, &mut extractor);

    println!("Replayed {} fights into {} fighters", rows.len(), store.len());

    // Check first 20 rows
    println!("\nFirst 20 rows:");
    println!("  elo_diff  | streak_diff | months_since_diff | exp_diff | target");
    println!("  --------- | ----------- | ----------------- | -------- | ------");

    for row in rows.iter().take(20) {
        let f = &row.features;
        println!(
            "  {:+9.2} | {:+11.0} | {:+17.2} | {:+8.0} | {}",
            f.elo_diff, f.streak_diff, f.months_since_diff, f.exp_diff, row.target
        );
    }

    if rows.is_empty() {
        return Ok(());
    }

    // Statistics across all rows
    println!("\nStatistics across all {} rows:", rows.len());

    let n = rows.len() as f64;
    for (i, name) in FeatureVector::NAMES.iter().enumerate() {
        let values: Vec<f64> = rows.iter().map(|r| r.features.to_array()[i]).collect();
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);
        println!("  {}: mean={:.4}, min={:.4}, max={:.4}", name, mean, min, max);
    }

    // Rows where the higher-rated fighter won
    let favourites = rows
        .iter()
        .filter(|r| (r.features.elo_diff > 0.0) == (r.target == 1) && r.features.elo_diff != 0.0)
        .count();
    let first_wins = rows.iter().filter(|r| r.target == 1).count();
    println!("  Favourite wins: {}/{} ({:.1}%)", favourites, rows.len(), 100.0 * favourites as f64 / n);
    println!("  First-slot wins: {}/{} ({:.1}%)", first_wins, rows.len(), 100.0 * first_wins as f64 / n);

    Ok(())
}
