// League settings and valuation tunables for one computation run.

use serde::{Deserialize, Serialize};

use crate::category::{Category, StatBasis};
use crate::error::ValuationError;

/// Upper bound for a category weight.
pub const MAX_CATEGORY_WEIGHT: f64 = 2.0;

// ---------------------------------------------------------------------------
// Category weights
// ---------------------------------------------------------------------------

fn default_weight() -> f64 {
    1.0
}

/// Weight multipliers per category, each in `[0, 2]`. A weight of 0 punts the
/// category entirely; values between 0 and 1 de-emphasize it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    #[serde(default = "default_weight")]
    pub points: f64,
    #[serde(default = "default_weight")]
    pub rebounds: f64,
    #[serde(default = "default_weight")]
    pub assists: f64,
    #[serde(default = "default_weight")]
    pub steals: f64,
    #[serde(default = "default_weight")]
    pub blocks: f64,
    #[serde(default = "default_weight")]
    pub threes: f64,
    #[serde(default = "default_weight")]
    pub fg_pct: f64,
    #[serde(default = "default_weight")]
    pub ft_pct: f64,
    #[serde(default = "default_weight")]
    pub turnovers: f64,
}

impl CategoryWeights {
    /// All categories at the same weight.
    pub fn uniform(weight: f64) -> Self {
        CategoryWeights {
            points: weight,
            rebounds: weight,
            assists: weight,
            steals: weight,
            blocks: weight,
            threes: weight,
            fg_pct: weight,
            ft_pct: weight,
            turnovers: weight,
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Points => self.points,
            Category::Rebounds => self.rebounds,
            Category::Assists => self.assists,
            Category::Steals => self.steals,
            Category::Blocks => self.blocks,
            Category::Threes => self.threes,
            Category::FieldGoalPct => self.fg_pct,
            Category::FreeThrowPct => self.ft_pct,
            Category::Turnovers => self.turnovers,
        }
    }

    pub fn set(&mut self, category: Category, weight: f64) {
        let slot = match category {
            Category::Points => &mut self.points,
            Category::Rebounds => &mut self.rebounds,
            Category::Assists => &mut self.assists,
            Category::Steals => &mut self.steals,
            Category::Blocks => &mut self.blocks,
            Category::Threes => &mut self.threes,
            Category::FieldGoalPct => &mut self.fg_pct,
            Category::FreeThrowPct => &mut self.ft_pct,
            Category::Turnovers => &mut self.turnovers,
        };
        *slot = weight;
    }

    /// Zero out each listed category.
    pub fn punt(&mut self, categories: &[Category]) {
        for &category in categories {
            self.set(category, 0.0);
        }
    }

    /// `(category, weight)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self::uniform(default_weight())
    }
}

// ---------------------------------------------------------------------------
// Blend tiers
// ---------------------------------------------------------------------------

/// One step of the ADP confidence table: ranks up to and including
/// `max_rank` take `weight` of their blend from the ADP dollar value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendTier {
    pub max_rank: u32,
    pub weight: f64,
}

/// Step function from ADP rank to blend weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendTiers {
    /// Ordered by strictly increasing `max_rank`.
    pub tiers: Vec<BlendTier>,
    /// Weight for ranks past the last tier.
    pub fallback_weight: f64,
}

impl BlendTiers {
    /// ADP weight for a 1-based ADP rank.
    pub fn weight_for(&self, adp_rank: u32) -> f64 {
        self.tiers
            .iter()
            .find(|tier| adp_rank <= tier.max_rank)
            .map(|tier| tier.weight)
            .unwrap_or(self.fallback_weight)
    }

    fn validate(&self) -> Result<(), ValuationError> {
        let mut previous = 0;
        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.max_rank <= previous {
                return Err(ValuationError::invalid(
                    format!("tuning.blend_tiers.tiers[{i}].max_rank"),
                    format!(
                        "must be greater than the previous tier's max_rank ({previous}), got {}",
                        tier.max_rank
                    ),
                ));
            }
            previous = tier.max_rank;
            check_unit_interval(&format!("tuning.blend_tiers.tiers[{i}].weight"), tier.weight)?;
        }
        check_unit_interval("tuning.blend_tiers.fallback_weight", self.fallback_weight)
    }
}

impl Default for BlendTiers {
    fn default() -> Self {
        BlendTiers {
            tiers: vec![
                BlendTier {
                    max_rank: 20,
                    weight: 0.7,
                },
                BlendTier {
                    max_rank: 50,
                    weight: 0.6,
                },
                BlendTier {
                    max_rank: 100,
                    weight: 0.5,
                },
            ],
            fallback_weight: 0.3,
        }
    }
}

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

fn default_rank_adp_weight() -> f64 {
    0.5
}

fn default_adp_curve_exponent() -> f64 {
    3.0
}

fn default_conserve_blended_budget() -> bool {
    true
}

/// Knobs that shape the valuation without changing league structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationTuning {
    #[serde(default)]
    pub blend_tiers: BlendTiers,
    /// Share of `blend_rank`'s combined score taken from `adp_rank`.
    #[serde(default = "default_rank_adp_weight")]
    pub rank_adp_weight: f64,
    /// Steepness of the ADP rank-to-dollar curve. Higher concentrates more of
    /// the pool on the earliest picks.
    #[serde(default = "default_adp_curve_exponent")]
    pub adp_curve_exponent: f64,
    #[serde(default)]
    pub stat_basis: StatBasis,
    /// Rescale blended values so the draftable players spend exactly the
    /// league pool. Off reproduces the raw tier blend, which can over- or
    /// under-spend when the two dollar curves disagree.
    #[serde(default = "default_conserve_blended_budget")]
    pub conserve_blended_budget: bool,
}

impl Default for ValuationTuning {
    fn default() -> Self {
        ValuationTuning {
            blend_tiers: BlendTiers::default(),
            rank_adp_weight: default_rank_adp_weight(),
            adp_curve_exponent: default_adp_curve_exponent(),
            stat_basis: StatBasis::default(),
            conserve_blended_budget: default_conserve_blended_budget(),
        }
    }
}

// ---------------------------------------------------------------------------
// League config
// ---------------------------------------------------------------------------

/// Everything one valuation run needs besides the player and ADP tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub season: String,
    /// Players with fewer games are dropped before any statistics are taken.
    pub min_games: u32,
    #[serde(default)]
    pub category_weights: CategoryWeights,
    /// Percentage applied uniformly after blending (`15.0` = +15%).
    #[serde(default)]
    pub inflation_rate: f64,
    pub league_teams: usize,
    pub roster_size: usize,
    /// Auction budget per team.
    pub budget: u32,
    #[serde(default)]
    pub tuning: ValuationTuning,
}

impl LeagueConfig {
    /// Number of players rostered league-wide.
    pub fn draftable_count(&self) -> usize {
        self.league_teams * self.roster_size
    }

    /// Dollars available across all teams.
    pub fn total_budget(&self) -> f64 {
        self.league_teams as f64 * self.budget as f64
    }

    /// Reject out-of-range settings.
    pub fn validate(&self) -> Result<(), ValuationError> {
        for (category, weight) in self.category_weights.iter() {
            if !weight.is_finite() || !(0.0..=MAX_CATEGORY_WEIGHT).contains(&weight) {
                return Err(ValuationError::invalid(
                    format!("category_weights.{}", category.key()),
                    format!("must be between 0 and {MAX_CATEGORY_WEIGHT} inclusive, got {weight}"),
                ));
            }
        }

        if !self.inflation_rate.is_finite() || self.inflation_rate < 0.0 {
            return Err(ValuationError::invalid(
                "inflation_rate",
                format!("must be >= 0, got {}", self.inflation_rate),
            ));
        }

        if self.league_teams == 0 {
            return Err(ValuationError::invalid("league_teams", "must be greater than 0"));
        }
        if self.roster_size == 0 {
            return Err(ValuationError::invalid("roster_size", "must be greater than 0"));
        }
        if self.budget == 0 {
            return Err(ValuationError::invalid("budget", "must be greater than 0"));
        }

        self.tuning.blend_tiers.validate()?;
        check_unit_interval("tuning.rank_adp_weight", self.tuning.rank_adp_weight)?;

        let exponent = self.tuning.adp_curve_exponent;
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(ValuationError::invalid(
                "tuning.adp_curve_exponent",
                format!("must be > 0, got {exponent}"),
            ));
        }

        Ok(())
    }
}

impl Default for LeagueConfig {
    fn default() -> Self {
        LeagueConfig {
            season: "2025".into(),
            min_games: 20,
            category_weights: CategoryWeights::default(),
            inflation_rate: 0.0,
            league_teams: 12,
            roster_size: 13,
            budget: 200,
            tuning: ValuationTuning::default(),
        }
    }
}

fn check_unit_interval(field: &str, value: f64) -> Result<(), ValuationError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ValuationError::invalid(
            field,
            format!("must be between 0.0 and 1.0 inclusive, got {value}"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
