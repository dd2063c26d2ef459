// The nine scoring categories and the table that drives per-category extraction.
//
// Every stage of the valuation pipeline walks `CATEGORY_SPECS` in order rather
// than looking fields up by name, so the category set is fixed at compile time.

use serde::{Deserialize, Serialize};

use crate::player::RawPlayerRecord;

/// Number of scoring categories.
pub const CATEGORY_COUNT: usize = 9;

// ---------------------------------------------------------------------------
// Category identifiers
// ---------------------------------------------------------------------------

/// A nine-category scoring column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Threes,
    #[serde(rename = "fg_pct")]
    FieldGoalPct,
    #[serde(rename = "ft_pct")]
    FreeThrowPct,
    Turnovers,
}

impl Category {
    /// All categories in table order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Points,
        Category::Rebounds,
        Category::Assists,
        Category::Steals,
        Category::Blocks,
        Category::Threes,
        Category::FieldGoalPct,
        Category::FreeThrowPct,
        Category::Turnovers,
    ];

    /// Position of this category in `CATEGORY_SPECS` and in every per-category array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The table entry for this category.
    pub fn spec(self) -> &'static CategorySpec {
        &CATEGORY_SPECS[self.index()]
    }

    /// Config/serialization key (e.g. `"fg_pct"`).
    pub fn key(self) -> &'static str {
        self.spec().key
    }

    /// Short column label (e.g. `"FG%"`).
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// Parse a config key. Accepts the snake_case key or the column label,
    /// case-insensitively.
    pub fn from_key(key: &str) -> Option<Category> {
        let trimmed = key.trim();
        CATEGORY_SPECS
            .iter()
            .find(|spec| {
                spec.key.eq_ignore_ascii_case(trimmed) || spec.label.eq_ignore_ascii_case(trimmed)
            })
            .map(|spec| spec.category)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Category table
// ---------------------------------------------------------------------------

/// Whether a higher raw value is better or worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Positive,
    /// Lower is better; the standardized score is negated before weighting.
    Negative,
}

/// Whether a category accumulates with games played or is a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryKind {
    Counting,
    Percentage,
}

/// Which form of the counting stats gets standardized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatBasis {
    /// Per-game averages as reported.
    #[default]
    PerGame,
    /// Per-game averages multiplied by games played. Percentages are unaffected.
    SeasonTotals,
}

/// One row of the category table.
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub category: Category,
    pub key: &'static str,
    pub label: &'static str,
    pub direction: Direction,
    pub kind: CategoryKind,
    /// Reads the per-game (or percentage) value from a record.
    pub extract: fn(&RawPlayerRecord) -> f64,
}

impl CategorySpec {
    /// The value this category standardizes for `record` under `basis`.
    pub fn raw_value(&self, record: &RawPlayerRecord, basis: StatBasis) -> f64 {
        let value = (self.extract)(record);
        match (self.kind, basis) {
            (CategoryKind::Counting, StatBasis::SeasonTotals) => value * record.games as f64,
            _ => value,
        }
    }

    /// Flip a standardized score so that a positive result is always good.
    pub fn orient(&self, standardized: f64) -> f64 {
        match self.direction {
            Direction::Positive => standardized,
            Direction::Negative => -standardized,
        }
    }
}

fn points(r: &RawPlayerRecord) -> f64 {
    r.stats.points
}

fn rebounds(r: &RawPlayerRecord) -> f64 {
    r.stats.rebounds
}

fn assists(r: &RawPlayerRecord) -> f64 {
    r.stats.assists
}

fn steals(r: &RawPlayerRecord) -> f64 {
    r.stats.steals
}

fn blocks(r: &RawPlayerRecord) -> f64 {
    r.stats.blocks
}

fn threes(r: &RawPlayerRecord) -> f64 {
    r.stats.threes
}

fn field_goal_pct(r: &RawPlayerRecord) -> f64 {
    r.shooting.field_goal_pct().unwrap_or(r.stats.fg_pct)
}

fn free_throw_pct(r: &RawPlayerRecord) -> f64 {
    r.shooting.free_throw_pct().unwrap_or(r.stats.ft_pct)
}

fn turnovers(r: &RawPlayerRecord) -> f64 {
    r.stats.turnovers
}

/// The fixed category table, in `Category::ALL` order.
pub static CATEGORY_SPECS: [CategorySpec; CATEGORY_COUNT] = [
    CategorySpec {
        category: Category::Points,
        key: "points",
        label: "PTS",
        direction: Direction::Positive,
        kind: CategoryKind::Counting,
        extract: points,
    },
    CategorySpec {
        category: Category::Rebounds,
        key: "rebounds",
        label: "REB",
        direction: Direction::Positive,
        kind: CategoryKind::Counting,
        extract: rebounds,
    },
    CategorySpec {
        category: Category::Assists,
        key: "assists",
        label: "AST",
        direction: Direction::Positive,
        kind: CategoryKind::Counting,
        extract: assists,
    },
    CategorySpec {
        category: Category::Steals,
        key: "steals",
        label: "STL",
        direction: Direction::Positive,
        kind: CategoryKind::Counting,
        extract: steals,
    },
    CategorySpec {
        category: Category::Blocks,
        key: "blocks",
        label: "BLK",
        direction: Direction::Positive,
        kind: CategoryKind::Counting,
        extract: blocks,
    },
    CategorySpec {
        category: Category::Threes,
        key: "threes",
        label: "3PM",
        direction: Direction::Positive,
        kind: CategoryKind::Counting,
        extract: threes,
    },
    CategorySpec {
        category: Category::FieldGoalPct,
        key: "fg_pct",
        label: "FG%",
        direction: Direction::Positive,
        kind: CategoryKind::Percentage,
        extract: field_goal_pct,
    },
    CategorySpec {
        category: Category::FreeThrowPct,
        key: "ft_pct",
        label: "FT%",
        direction: Direction::Positive,
        kind: CategoryKind::Percentage,
        extract: free_throw_pct,
    },
    CategorySpec {
        category: Category::Turnovers,
        key: "turnovers",
        label: "TO",
        direction: Direction::Negative,
        kind: CategoryKind::Counting,
        extract: turnovers,
    },
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
