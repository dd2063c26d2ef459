// Market-consensus (ADP) ranking and the ADP rank-to-dollar curve.
//
// ADP dollars are derived independently of the statistical valuation: each
// ranked player's share of the league budget comes from a power curve over
// ADP rank, anchored so the draftable ranks spend exactly the league pool.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::ValuationWarning;
use crate::league::LeagueConfig;
use crate::player::{AdpRecord, RawPlayerRecord};
use crate::valuation::auction::{whole_dollars, MIN_BID};

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// A pool player's matched ADP and its derived 1-based rank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdpRank {
    pub adp: f64,
    pub rank: u32,
}

/// Match ADP records to the pool by name and rank the matched players by ADP
/// ascending. Ties keep pool order.
///
/// Returns one entry per pool player, in pool order. Players with no usable
/// record get `None` and an `UnmatchedAdp` warning.
pub fn rank_by_adp(
    pool: &[&RawPlayerRecord],
    records: &[AdpRecord],
    warnings: &mut Vec<ValuationWarning>,
) -> Vec<Option<AdpRank>> {
    let mut by_name: HashMap<&str, f64> = HashMap::with_capacity(records.len());
    for record in records {
        if !record.adp.is_finite() {
            warn!("ignoring non-finite ADP for '{}'", record.name);
            continue;
        }
        if by_name.contains_key(record.name.as_str()) {
            warn!("duplicate ADP record for '{}', keeping the first", record.name);
            warnings.push(ValuationWarning::DuplicateAdp {
                name: record.name.clone(),
            });
            continue;
        }
        by_name.insert(record.name.as_str(), record.adp);
    }

    let mut matched: Vec<(usize, f64)> = Vec::with_capacity(pool.len());
    let mut unmatched = 0usize;
    for (idx, player) in pool.iter().enumerate() {
        match by_name.get(player.name.as_str()) {
            Some(&adp) => matched.push((idx, adp)),
            None => {
                debug!("no ADP record for '{}'", player.name);
                warnings.push(ValuationWarning::UnmatchedAdp {
                    name: player.name.clone(),
                });
                unmatched += 1;
            }
        }
    }
    if unmatched > 0 {
        warn!(
            "{} of {} eligible players have no ADP record; they keep their statistical value",
            unmatched,
            pool.len()
        );
    }

    // sort_by is stable, so equal ADPs stay in pool order.
    matched.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ranks = vec![None; pool.len()];
    for (position, &(idx, adp)) in matched.iter().enumerate() {
        ranks[idx] = Some(AdpRank {
            adp,
            rank: position as u32 + 1,
        });
    }
    ranks
}

// ---------------------------------------------------------------------------
// Rank-to-dollar curve
// ---------------------------------------------------------------------------

/// Budget-anchored dollar curve over ADP rank.
///
/// Rank `r` within the `draftable_count` roster spots earns
/// `((N - r + 1) / N) ^ exponent` curve units; ranks past `N` earn none. The
/// curve is anchored on all `N` spots, so a rank's price does not depend on
/// how many players happen to carry an ADP record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdpCurve {
    pub draftable_count: usize,
    pub exponent: f64,
    pub dollars_per_unit: f64,
}

impl AdpCurve {
    /// Anchor the curve so that ranks `1..=N` spend `league_teams * budget`
    /// between them, $1 floor included.
    pub fn new(league: &LeagueConfig) -> Self {
        let draftable_count = league.draftable_count();
        let exponent = league.tuning.adp_curve_exponent;

        let mut curve = AdpCurve {
            draftable_count,
            exponent,
            dollars_per_unit: 0.0,
        };

        let total_units: f64 = (1..=draftable_count as u32).map(|rank| curve.units(rank)).sum();
        let distributable = (league.total_budget() - draftable_count as f64 * MIN_BID).max(0.0);
        if total_units > 0.0 {
            curve.dollars_per_unit = distributable / total_units;
        }

        debug!(
            "ADP curve: {} draftable ranks, exponent {}, ${:.4} per unit",
            draftable_count, exponent, curve.dollars_per_unit
        );
        curve
    }

    /// Curve units for a 1-based rank. Strictly decreasing up to `N`.
    pub fn units(&self, rank: u32) -> f64 {
        let n = self.draftable_count;
        let rank = rank as usize;
        if rank == 0 || rank > n {
            return 0.0;
        }
        ((n - rank + 1) as f64 / n as f64).powf(self.exponent)
    }

    /// ADP-derived dollars for a 1-based rank, floored at $1.
    pub fn dollar_value(&self, rank: u32) -> u32 {
        whole_dollars(MIN_BID + self.units(rank) * self.dollars_per_unit)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
