//! CSV exports for standings, fighter stats and training rows

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::features::{CompetitorSnapshot, FeatureVector, Standing, TrainingRow};
use crate::Result;

/// `Fighter,ELO`, highest first
pub fn write_standings<W: Write>(out: &mut W, standings: &[Standing]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["Fighter", "ELO"])?;
    for s in standings {
        writer.write_record([s.name.clone(), s.rating.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Per-fighter snapshot as read by the matchup app
pub fn write_stats<W: Write>(out: &mut W, rows: &[CompetitorSnapshot]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "Fighter",
        "ELO",
        "Streak",
        "Avg_Opp_ELO",
        "Months_Inactive",
        "Total_Fights",
        "Weight_Class",
    ])?;
    for r in rows {
        writer.write_record([
            r.name.clone(),
            format!("{:.2}", r.rating),
            r.streak.to_string(),
            format!("{:.2}", r.avg_opponent_rating),
            format!("{:.1}", r.months_inactive),
            r.total_fights.to_string(),
            r.weight_class.clone().unwrap_or_else(|| "Unknown".to_string()),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Labelled feature rows
pub fn write_training<W: Write>(out: &mut W, rows: &[TrainingRow]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(FeatureVector::NAMES.iter().chain(&["target"]))?;
    for row in rows {
        let f = &row.features;
        writer.write_record([
            format!("{:.6}", f.elo_diff),
            f.streak_diff.to_string(),
            format!("{:.6}", f.months_since_diff),
            f.exp_diff.to_string(),
            row.target.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Create `path` and hand a buffered writer to `write`
pub fn to_file<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut out = BufWriter::new(File::create(path)?);
    write(&mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F: FnOnce(&mut Vec<u8>) -> Result<()>>(write: F) -> String {
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_standings_csv() {
        let rows = vec![
            Standing { name: "Fighter A".to_string(), rating: 1516.0 },
            Standing { name: "Fighter B".to_string(), rating: 1484.0 },
        ];
        let text = render(|out| write_standings(out, &rows));
        assert_eq!(text, "Fighter,ELO\nFighter A,1516\nFighter B,1484\n");
    }

    #[test]
    fn test_stats_csv_rounding_and_unknown_class() {
        let rows = vec![CompetitorSnapshot {
            name: "Fighter A".to_string(),
            rating: 1528.8123,
            streak: 2,
            avg_opponent_rating: 1471.2,
            months_inactive: 12.1666,
            total_fights: 3,
            weight_class: None,
        }];
        let text = render(|out| write_stats(out, &rows));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Fighter A,1528.81,2,1471.20,12.2,3,Unknown");
    }

    #[test]
    fn test_training_csv() {
        let rows = vec![TrainingRow {
            features: FeatureVector {
                elo_diff: -16.0,
                streak_diff: 1.0,
                months_since_diff: -2.5,
                exp_diff: 4.0,
            },
            target: 0,
        }];
        let text = render(|out| write_training(out, &rows));
        assert_eq!(
            text,
            "elo_diff,streak_diff,months_since_diff,exp_diff,target\n-16.000000,1,-2.500000,4,0\n"
        );
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let rows = vec![
            Standing { name: "Silva, Jr.".to_string(), rating: 1500.0 },
            Standing { name: "The \"Eagle\"".to_string(), rating: 1490.5 },
        ];
        let text = render(|out| write_standings(out, &rows));
        assert_eq!(
            text,
            "Fighter,ELO\n\"Silva, Jr.\",1500\n\"The \"\"Eagle\"\"\",1490.5\n"
        );
    }
}
