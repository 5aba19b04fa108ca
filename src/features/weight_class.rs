//! Weight class ladder and size-mismatch adjustment

/// Men's divisions, lightest first. Tier = position + 1.
pub const WEIGHT_LADDER: [&str; 8] = [
    "Flyweight",
    "Bantamweight",
    "Featherweight",
    "Lightweight",
    "Welterweight",
    "Middleweight",
    "Light Heavyweight",
    "Heavyweight",
];

/// Ordinal tier of a division (1 = lightest, 8 = heaviest), 0 if unknown
pub fn tier(weight_class: &str) -> u8 {
    WEIGHT_LADDER
        .iter()
        .position(|c| *c == weight_class)
        .map(|i| i as u8 + 1)
        .unwrap_or(0)
}

/// Which slot of a matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Ratings after the size adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeAdjustment {
    pub first_rating: f64,
    pub second_rating: f64,
    /// Lighter fighter, when a discount was applied
    pub penalized: Option<Side>,
    /// Fraction of rating removed (0.3 = 30%)
    pub penalty: f64,
    /// Number of divisions between the two fighters
    pub tier_gap: u8,
}

impl SizeAdjustment {
    fn unchanged(first_rating: f64, second_rating: f64) -> Self {
        SizeAdjustment {
            first_rating,
            second_rating,
            penalized: None,
            penalty: 0.0,
            tier_gap: 0,
        }
    }

    pub fn rating(&self, side: Side) -> f64 {
        match side {
            Side::First => self.first_rating,
            Side::Second => self.second_rating,
        }
    }

    /// Display note naming the penalised fighter, if any
    pub fn note(&self, first_name: &str, second_name: &str) -> Option<String> {
        let side = self.penalized?;
        let name = match side {
            Side::First => first_name,
            Side::Second => second_name,
        };
        Some(format!(
            "SIZE MISMATCH: {} loses {:.0}% effective ELO due to size difference ({} classes).",
            name,
            self.penalty * 100.0,
            self.tier_gap
        ))
    }
}

/// Discounts the lighter fighter's rating by a fixed fraction per division.
/// The heavier fighter never gains.
#[derive(Debug, Clone, Copy)]
pub struct WeightClassAdjuster {
    pub penalty_per_tier: f64,
}

impl Default for WeightClassAdjuster {
    fn default() -> Self {
        WeightClassAdjuster {
            penalty_per_tier: 0.10,
        }
    }
}

impl WeightClassAdjuster {
    pub fn new(penalty_per_tier: f64) -> Self {
        WeightClassAdjuster { penalty_per_tier }
    }

    /// Adjust ratings given each fighter's division (None = never recorded)
    pub fn adjust(
        &self,
        first_rating: f64,
        first_class: Option<&str>,
        second_rating: f64,
        second_class: Option<&str>,
    ) -> SizeAdjustment {
        let first_tier = first_class.map(tier).unwrap_or(0);
        let second_tier = second_class.map(tier).unwrap_or(0);
        self.adjust_tiers(first_rating, first_tier, second_rating, second_tier)
    }

    /// Adjust ratings given tiers directly
    pub fn adjust_tiers(
        &self,
        first_rating: f64,
        first_tier: u8,
        second_rating: f64,
        second_tier: u8,
    ) -> SizeAdjustment {
        if first_tier == 0 || second_tier == 0 || first_tier == second_tier {
            return SizeAdjustment::unchanged(first_rating, second_rating);
        }

        let tier_gap = first_tier.abs_diff(second_tier);
        let penalty = self.penalty_per_tier * tier_gap as f64;
        let factor = 1.0 - penalty;

        if first_tier > second_tier {
            SizeAdjustment {
                first_rating,
                second_rating: second_rating * factor,
                penalized: Some(Side::Second),
                penalty,
                tier_gap,
            }
        } else {
            SizeAdjustment {
                first_rating: first_rating * factor,
                second_rating,
                penalized: Some(Side::First),
                penalty,
                tier_gap,
            }
        }
    }
}
