// Replacement level and value above replacement (VAR).
//
// The replacement level is the total score of the last draftable player
// (league_teams * roster_size deep). It serves as the zero point for the
// dollar conversion that follows.

use tracing::{debug, warn};

use crate::error::ValuationWarning;

/// Outcome of ranking the pool by total score.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementLevel {
    /// Total score of the marginal draftable player.
    pub level: f64,
    /// Draftable players actually present (`min(roster spots, pool size)`).
    pub draftable_count: usize,
    /// Pool indices sorted by total score descending, ties in input order.
    pub order: Vec<usize>,
}

impl ReplacementLevel {
    /// `total_score - level`. Negative below replacement.
    pub fn value_above(&self, total_score: f64) -> f64 {
        total_score - self.level
    }

    /// Pool indices of the draftable players, best first.
    pub fn draftable(&self) -> &[usize] {
        &self.order[..self.draftable_count]
    }

    /// Per-pool-index flag: is this player inside the draftable pool?
    pub fn draftable_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.order.len()];
        for &idx in self.draftable() {
            mask[idx] = true;
        }
        mask
    }
}

/// Pool indices ordered by total score descending. Ties keep input order.
pub fn order_by_total_score(totals: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    // sort_by is stable, so equal scores stay in input order.
    order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));
    order
}

/// Find the replacement level for a pool of total scores.
///
/// `roster_spots` is the one-based position of the last draftable player. A
/// pool shallower than that falls back to its lowest score and records a
/// `ShallowPool` warning.
pub fn determine_replacement_level(
    totals: &[f64],
    roster_spots: usize,
    warnings: &mut Vec<ValuationWarning>,
) -> ReplacementLevel {
    let order = order_by_total_score(totals);

    if order.len() < roster_spots {
        warn!(
            "only {} eligible players for {} roster spots; using lowest score as replacement",
            order.len(),
            roster_spots
        );
        warnings.push(ValuationWarning::ShallowPool {
            eligible: order.len(),
            draftable: roster_spots,
        });
    }

    let draftable_count = roster_spots.min(order.len());
    let level = match draftable_count {
        0 => 0.0,
        n => totals[order[n - 1]],
    };
    debug!(
        "replacement level {:.4} at draftable position {}",
        level, draftable_count
    );

    ReplacementLevel {
        level,
        draftable_count,
        order,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
