// Blending statistical and ADP dollars, then applying inflation.

use crate::league::BlendTiers;
use crate::valuation::auction::{whole_dollars, MIN_BID};

/// Blend a player's statistical dollars with their ADP dollars.
///
/// `adp` is `(adp_rank, adp_value)`; without it the statistical value passes
/// through with weight 0. Returns `(weight, blended)`.
pub fn blend_value(stat_value: u32, adp: Option<(u32, u32)>, tiers: &BlendTiers) -> (f64, f64) {
    match adp {
        Some((rank, adp_value)) => {
            let weight = tiers.weight_for(rank);
            let blended = weight * adp_value as f64 + (1.0 - weight) * stat_value as f64;
            (weight, blended)
        }
        None => (0.0, stat_value as f64),
    }
}

/// `max(1, round(blended * (1 + inflation_rate / 100)))`.
pub fn apply_inflation(blended: f64, inflation_rate: f64) -> u32 {
    whole_dollars(blended * (1.0 + inflation_rate / 100.0))
}

/// Sum of the `count` highest values.
pub fn top_spend(values: &[f64], count: usize) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted.iter().take(count).sum()
}

/// Rescale blended values so the `draftable_count` highest sum to
/// `total_budget`.
///
/// Only the part above the $1 floor is scaled, by a single pool-wide factor,
/// so the ordering of blended values is unchanged. Returns the factor applied
/// (1.0 when there is nothing above the floor to scale).
pub fn conserve_budget(blended: &mut [f64], draftable_count: usize, total_budget: f64) -> f64 {
    let top = draftable_count.min(blended.len());
    let surplus = top_spend(blended, top) - top as f64 * MIN_BID;
    if surplus <= 0.0 {
        return 1.0;
    }
    let target = (total_budget - top as f64 * MIN_BID).max(0.0);
    let scale = target / surplus;
    for value in blended.iter_mut() {
        *value = MIN_BID + (*value - MIN_BID).max(0.0) * scale;
    }
    scale
}
