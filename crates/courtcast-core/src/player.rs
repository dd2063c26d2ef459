// Pipeline inputs and the per-player output record.

use serde::{Deserialize, Serialize};

use crate::category::{Category, CATEGORY_COUNT};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Per-game averages (and shooting percentages) for the nine categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub threes: f64,
    pub fg_pct: f64,
    pub ft_pct: f64,
    pub turnovers: f64,
}

impl StatLine {
    /// The reported per-game (or percentage) value for a category.
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

    fn values(&self) -> [f64; CATEGORY_COUNT] {
        Category::ALL.map(|category| self.get(category))
    }
}

/// Made/attempted shot totals backing the two percentage categories.
///
/// All zeros means "not reported"; the stored percentages are used instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShootingTotals {
    pub fgm: f64,
    pub fga: f64,
    pub ftm: f64,
    pub fta: f64,
}

impl ShootingTotals {
    /// FGM / FGA, or `None` when no attempts were recorded.
    pub fn field_goal_pct(&self) -> Option<f64> {
        ratio(self.fgm, self.fga)
    }

    /// FTM / FTA, or `None` when no attempts were recorded.
    pub fn free_throw_pct(&self) -> Option<f64> {
        ratio(self.ftm, self.fta)
    }
}

fn ratio(made: f64, attempted: f64) -> Option<f64> {
    if attempted > 0.0 {
        Some(made / attempted)
    } else {
        None
    }
}

/// One player's season line, as supplied by the data-acquisition layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlayerRecord {
    pub name: String,
    pub team: String,
    pub position: String,
    pub games: u32,
    pub stats: StatLine,
    #[serde(default)]
    pub shooting: ShootingTotals,
}

impl RawPlayerRecord {
    /// False if any stat or shooting total is NaN or infinite.
    pub fn has_finite_stats(&self) -> bool {
        let s = &self.shooting;
        self.stats
            .values()
            .iter()
            .chain([s.fgm, s.fga, s.ftm, s.fta].iter())
            .all(|v| v.is_finite())
    }
}

/// Coarse roster slot derived from a listed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionGroup {
    #[serde(rename = "G")]
    Guard,
    #[serde(rename = "F")]
    Forward,
    #[serde(rename = "C")]
    Center,
    #[serde(rename = "UTIL")]
    Util,
}

impl PositionGroup {
    /// Group a listed position. Hyphenated listings (`"SF-PF"`) use the first
    /// part; blank or unrecognized positions are `Util`.
    pub fn from_position(position: &str) -> Self {
        let primary = position.split('-').next().unwrap_or("").trim().to_ascii_uppercase();
        match primary.as_str() {
            "PG" | "SG" | "G" => PositionGroup::Guard,
            "SF" | "PF" | "F" => PositionGroup::Forward,
            "C" => PositionGroup::Center,
            _ => PositionGroup::Util,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PositionGroup::Guard => "G",
            PositionGroup::Forward => "F",
            PositionGroup::Center => "C",
            PositionGroup::Util => "UTIL",
        }
    }
}

impl std::fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Market-consensus average draft position for one player.
///
/// `name` must already match `RawPlayerRecord::name`; matching policy lives
/// with whoever builds these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdpRecord {
    pub name: String,
    pub adp: f64,
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Standardized and weighted score for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    /// Z-score, already sign-corrected so that positive is good.
    pub standardized: f64,
    /// `standardized * weight`.
    pub weighted: f64,
}

/// The nine category scores for a player, in `Category::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores(pub [CategoryScore; CATEGORY_COUNT]);

impl CategoryScores {
    pub fn get(&self, category: Category) -> &CategoryScore {
        &self.0[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryScore> {
        self.0.iter()
    }

    /// Sum of the weighted contributions.
    pub fn total(&self) -> f64 {
        self.0.iter().map(|s| s.weighted).sum()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A player carried through the full valuation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerValuation {
    pub name: String,
    pub team: String,
    pub position: String,
    pub position_group: PositionGroup,
    pub games: u32,
    pub stats: StatLine,
    pub shooting: ShootingTotals,
    pub category_scores: CategoryScores,
    pub total_score: f64,
    /// Value above replacement: `total_score - replacement_level`.
    pub var: f64,
    /// Dollars from the statistical (VAR) curve.
    pub stat_value: u32,
    pub adp: Option<f64>,
    /// Dollars from the ADP rank curve, when the player has an ADP rank.
    pub adp_value: Option<u32>,
    /// Share of the blend taken from `adp_value` (0 without ADP).
    pub blend_weight: f64,
    /// Blended dollars before inflation and rounding.
    pub blended_value: f64,
    /// Inflation-adjusted, rounded, floored at $1.
    pub final_value: u32,
    pub value_rank: u32,
    pub adp_rank: Option<u32>,
    pub blend_rank: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
