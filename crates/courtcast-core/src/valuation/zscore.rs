// Per-category z-scores over the eligible pool.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::category::{Category, StatBasis, CATEGORY_COUNT};
use crate::error::ValuationWarning;
use crate::league::CategoryWeights;
use crate::player::{CategoryScore, CategoryScores, RawPlayerRecord};

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single category across a player pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
///
/// A pool of identical values can still produce a ~1e-17 deviation from
/// floating-point error in the mean.
pub const STDEV_EPSILON: f64 = 1e-9;

impl PoolStats {
    pub fn has_variance(&self) -> bool {
        self.stdev >= STDEV_EPSILON
    }
}

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator), since the pool
/// represents the full relevant player universe rather than a sample. Sums run
/// sequentially in slice order so results are bit-reproducible.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if !stats.has_variance() {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// Pool statistics for all nine categories, in `Category::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryPoolStats(pub [PoolStats; CATEGORY_COUNT]);

impl CategoryPoolStats {
    pub fn get(&self, category: Category) -> &PoolStats {
        &self.0[category.index()]
    }
}

/// Compute per-category pool stats. Categories are independent, so each one
/// is handled on its own rayon task.
pub fn compute_category_pool_stats(pool: &[&RawPlayerRecord], basis: StatBasis) -> CategoryPoolStats {
    let per_category: Vec<PoolStats> = Category::ALL[..]
        .par_iter()
        .map(|category| {
            let spec = category.spec();
            let values: Vec<f64> = pool.iter().map(|p| spec.raw_value(p, basis)).collect();
            compute_pool_stats(&values)
        })
        .collect();

    let mut stats = [PoolStats {
        mean: 0.0,
        stdev: 0.0,
    }; CATEGORY_COUNT];
    stats.copy_from_slice(&per_category);
    CategoryPoolStats(stats)
}

// ---------------------------------------------------------------------------
// Player scoring
// ---------------------------------------------------------------------------

/// Standardize, orient, and weight every category for one player.
pub fn score_player(
    player: &RawPlayerRecord,
    stats: &CategoryPoolStats,
    weights: &CategoryWeights,
    basis: StatBasis,
) -> CategoryScores {
    let scores = Category::ALL.map(|category| {
        let spec = category.spec();
        let z = compute_zscore(spec.raw_value(player, basis), stats.get(category));
        let standardized = spec.orient(z);
        CategoryScore {
            category,
            standardized,
            weighted: standardized * weights.get(category),
        }
    });
    CategoryScores(scores)
}

/// Score every player in the eligible pool, returning scores in pool order.
///
/// Categories with zero variance contribute 0 for every player and are
/// reported as `ZeroVariance` warnings.
pub fn compute_zscores(
    pool: &[&RawPlayerRecord],
    weights: &CategoryWeights,
    basis: StatBasis,
    warnings: &mut Vec<ValuationWarning>,
) -> Vec<CategoryScores> {
    let stats = compute_category_pool_stats(pool, basis);

    for category in Category::ALL {
        let s = stats.get(category);
        if !s.has_variance() {
            warn!("category {} has zero variance across {} players", category, pool.len());
            warnings.push(ValuationWarning::ZeroVariance { category });
        } else {
            debug!("category {}: mean={:.4} stdev={:.4}", category, s.mean, s.stdev);
        }
    }

    pool.par_iter()
        .map(|player| score_player(player, &stats, weights, basis))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
