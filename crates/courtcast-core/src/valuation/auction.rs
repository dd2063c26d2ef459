// Auction dollar value conversion.
//
// Converts VAR (value above replacement) into auction dollars for a
// salary-cap draft. Every draftable roster spot is guaranteed $1, and the
// rest of the league budget is distributed proportionally to positive VAR
// across the draftable pool.

use tracing::{debug, warn};

use crate::error::ValuationWarning;
use crate::league::LeagueConfig;
use crate::valuation::replacement::ReplacementLevel;

/// Minimum bid for any player.
pub const MIN_BID: f64 = 1.0;

// ---------------------------------------------------------------------------
// AuctionValues struct
// ---------------------------------------------------------------------------

/// Pre-computed conversion factors for turning VAR into auction dollars.
///
/// These are derived once from the draftable pool and then applied to every
/// individual player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuctionValues {
    /// `league_teams * budget`.
    pub total_budget: f64,
    /// `$1` for each draftable player actually in the pool.
    pub min_bids: f64,
    /// Dollars left after the minimum bids, never negative.
    pub distributable: f64,
    /// Sum of positive VAR over the draftable pool.
    pub total_positive_var: f64,
    /// Dollars per unit of VAR.
    pub dollars_per_var: f64,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute the league-wide dollar conversion factors.
///
/// Algorithm:
/// 1. `total_budget` = `league_teams * budget`
/// 2. `min_bids` = `draftable_count * $1`
/// 3. `distributable` = `total_budget - min_bids` (clamped at 0)
/// 4. `dollars_per_var` = `distributable / sum(max(VAR, 0))` over the draftable pool
///
/// If the draftable pool has no positive VAR the rate is 0.0 and every
/// player gets the $1 minimum.
pub fn compute_auction_values(
    draftable_vars: &[f64],
    league: &LeagueConfig,
    warnings: &mut Vec<ValuationWarning>,
) -> AuctionValues {
    let total_budget = league.total_budget();
    let min_bids = draftable_vars.len() as f64 * MIN_BID;

    let distributable = if total_budget < min_bids {
        warn!(
            "league budget ${} is below the ${} needed for minimum bids",
            total_budget, min_bids
        );
        warnings.push(ValuationWarning::BudgetBelowFloor {
            total_budget,
            floor: min_bids,
        });
        0.0
    } else {
        total_budget - min_bids
    };

    let total_positive_var: f64 = draftable_vars.iter().filter(|v| **v > 0.0).sum();

    let dollars_per_var = if total_positive_var > 0.0 {
        distributable / total_positive_var
    } else {
        if !draftable_vars.is_empty() {
            warn!("no positive VAR in the draftable pool; all players valued at the minimum bid");
            warnings.push(ValuationWarning::NoPositiveValue);
        }
        0.0
    };

    debug!(
        "auction: total=${} min_bids=${} distributable=${} total_var={:.4} $/var={:.4}",
        total_budget, min_bids, distributable, total_positive_var, dollars_per_var
    );

    AuctionValues {
        total_budget,
        min_bids,
        distributable,
        total_positive_var,
        dollars_per_var,
    }
}

/// Round a raw dollar amount to whole dollars with the $1 floor.
pub fn whole_dollars(raw: f64) -> u32 {
    raw.round().max(MIN_BID) as u32
}

/// Dollar value for a single player.
///
/// - Draftable players: `max(1, round(1 + VAR * dollars_per_var))`
/// - Everyone else: the $1 floor
pub fn stat_dollar_value(var: f64, draftable: bool, auction: &AuctionValues) -> u32 {
    if !draftable {
        return MIN_BID as u32;
    }
    whole_dollars(MIN_BID + var * auction.dollars_per_var)
}

// ---------------------------------------------------------------------------
// Pipeline entry point
// ---------------------------------------------------------------------------

/// Convert every pool player's VAR into statistical dollars.
///
/// Returns the conversion factors and the dollar values in pool order.
pub fn apply_auction_values(
    vars: &[f64],
    replacement: &ReplacementLevel,
    league: &LeagueConfig,
    warnings: &mut Vec<ValuationWarning>,
) -> (AuctionValues, Vec<u32>) {
    let draftable_vars: Vec<f64> = replacement.draftable().iter().map(|&i| vars[i]).collect();
    let auction = compute_auction_values(&draftable_vars, league, warnings);

    let mask = replacement.draftable_mask();
    let values = vars
        .iter()
        .zip(mask.iter())
        .map(|(&var, &draftable)| stat_dollar_value(var, draftable, &auction))
        .collect();

    (auction, values)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
