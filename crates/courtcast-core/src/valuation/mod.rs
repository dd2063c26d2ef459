// Valuation engine: eligibility, z-scores, replacement level, auction dollars,
// ADP dollars, blending, and ranking.

pub mod adp;
pub mod auction;
pub mod blend;
pub mod eligibility;
pub mod rank;
pub mod replacement;
pub mod zscore;

use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::{info, warn};

use crate::category::Category;
use crate::error::{ValuationError, ValuationWarning};
use crate::league::LeagueConfig;
use crate::player::{AdpRecord, PlayerValuation, PositionGroup, RawPlayerRecord};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Pool-level numbers behind a valuation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolSummary {
    pub season: String,
    pub eligible_count: usize,
    /// Draftable players actually present in the pool.
    pub draftable_count: usize,
    pub replacement_level: f64,
    pub total_budget: f64,
    pub dollars_per_var: f64,
    pub adp_ranked_count: usize,
    pub adp_dollars_per_unit: f64,
    /// Statistical dollars assigned to the draftable pool.
    pub stat_dollars_spent: u64,
    /// Factor applied to blended dollars above the $1 floor (1.0 when the
    /// blend was left as is).
    pub blend_scale: f64,
    /// Pre-inflation blended dollars of the top `draftable_count` players.
    pub blended_dollars_spent: f64,
    /// Final dollars of the top `draftable_count` players by value rank.
    pub final_dollars_spent: u64,
}

/// Everything a valuation run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationReport {
    /// Ordered by `value_rank`.
    pub players: Vec<PlayerValuation>,
    pub warnings: Vec<ValuationWarning>,
    pub summary: PoolSummary,
}

impl ValuationReport {
    /// Look up a player by exact name.
    pub fn player(&self, name: &str) -> Option<&PlayerValuation> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Players whose name contains every whitespace-separated token of
    /// `query`, case-insensitively, in board order. `"jal john"` finds
    /// "Jalen Johnson". A blank query matches nobody.
    pub fn find_players(&self, query: &str) -> Vec<&PlayerValuation> {
        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return Vec::new();
        }
        self.players
            .iter()
            .filter(|p| {
                let name = p.name.to_lowercase();
                tokens.iter().all(|t| name.contains(t.as_str()))
            })
            .collect()
    }

    /// Players whose reported `category` stat falls in `range`, highest
    /// final value first.
    pub fn in_stat_range(&self, category: Category, range: RangeInclusive<f64>) -> Vec<&PlayerValuation> {
        self.players
            .iter()
            .filter(|p| range.contains(&p.stats.get(category)))
            .collect()
    }

    /// Players in one position group, in board order.
    pub fn in_position_group(&self, group: PositionGroup) -> Vec<&PlayerValuation> {
        self.players.iter().filter(|p| p.position_group == group).collect()
    }
}

// ---------------------------------------------------------------------------
// Pipeline entry point
// ---------------------------------------------------------------------------

/// Run the full valuation pipeline.
///
/// Steps:
/// 1. Validate the league config.
/// 2. Drop players below `min_games`.
/// 3. Z-score every category over the eligible pool, apply weights, sum.
/// 4. Find the replacement level at `league_teams * roster_size`.
/// 5. Convert VAR to budget-conserving statistical dollars.
/// 6. Rank matched players by ADP and price them on the ADP curve.
/// 7. Blend the two dollar values by ADP tier, rescale the blend so the
///    draftable players spend the league pool, and apply inflation.
/// 8. Assign value / blend ranks and order the board.
///
/// The result depends only on the arguments; identical inputs give identical
/// output.
pub fn compute_valuations(
    players: &[RawPlayerRecord],
    adp_records: &[AdpRecord],
    league: &LeagueConfig,
) -> Result<ValuationReport, ValuationError> {
    league.validate()?;
    let tuning = &league.tuning;
    let mut warnings = Vec::new();

    // ---- 2. Eligibility ----
    let pool = eligibility::filter_eligible(players, league.min_games, &mut warnings)?;

    // ---- 3. Z-scores ----
    let scores = zscore::compute_zscores(
        &pool,
        &league.category_weights,
        tuning.stat_basis,
        &mut warnings,
    );
    let totals: Vec<f64> = scores.iter().map(|s| s.total()).collect();

    // ---- 4. Replacement level ----
    let replacement =
        replacement::determine_replacement_level(&totals, league.draftable_count(), &mut warnings);
    let vars: Vec<f64> = totals.iter().map(|&t| replacement.value_above(t)).collect();

    // ---- 5. Statistical dollars ----
    let (auction, stat_values) =
        auction::apply_auction_values(&vars, &replacement, league, &mut warnings);

    // ---- 6. ADP dollars ----
    let adp_ranks = adp::rank_by_adp(&pool, adp_records, &mut warnings);
    let ranked_count = adp_ranks.iter().filter(|r| r.is_some()).count();
    let curve = adp::AdpCurve::new(league);
    let adp_values: Vec<Option<u32>> = adp_ranks
        .iter()
        .map(|r| r.map(|a| curve.dollar_value(a.rank)))
        .collect();

    // ---- 7. Blend, conserve, inflate ----
    let mut weights = Vec::with_capacity(pool.len());
    let mut blended = Vec::with_capacity(pool.len());
    for i in 0..pool.len() {
        let adp = adp_ranks[i].zip(adp_values[i]).map(|(a, v)| (a.rank, v));
        let (weight, value) = blend::blend_value(stat_values[i], adp, &tuning.blend_tiers);
        weights.push(weight);
        blended.push(value);
    }

    let draftable_count = replacement.draftable_count;
    let adp_contributed = weights.iter().any(|&w| w > 0.0);
    let blend_scale = if tuning.conserve_blended_budget && adp_contributed {
        blend::conserve_budget(&mut blended, draftable_count, auction.total_budget)
    } else {
        1.0
    };
    let blended_dollars_spent = blend::top_spend(&blended, draftable_count);
    if (blended_dollars_spent - auction.total_budget).abs() > draftable_count as f64 {
        warn!(
            "blended values of the top {} players spend ${:.0} of ${}",
            draftable_count, blended_dollars_spent, auction.total_budget
        );
        warnings.push(ValuationWarning::BlendedBudgetDrift {
            spent: blended_dollars_spent,
            total_budget: auction.total_budget,
        });
    }

    let mut valuations: Vec<PlayerValuation> = Vec::with_capacity(pool.len());
    for (i, player) in pool.iter().enumerate() {
        let adp = adp_ranks[i];
        valuations.push(PlayerValuation {
            name: player.name.clone(),
            team: player.team.clone(),
            position: player.position.clone(),
            position_group: PositionGroup::from_position(&player.position),
            games: player.games,
            stats: player.stats,
            shooting: player.shooting,
            category_scores: scores[i],
            total_score: totals[i],
            var: vars[i],
            stat_value: stat_values[i],
            adp: adp.map(|a| a.adp),
            adp_value: adp_values[i],
            blend_weight: weights[i],
            blended_value: blended[i],
            final_value: blend::apply_inflation(blended[i], league.inflation_rate),
            value_rank: 0,
            adp_rank: adp.map(|a| a.rank),
            blend_rank: 0,
        });
    }

    // ---- 8. Ranks ----
    rank::assign_ranks(&mut valuations, tuning.rank_adp_weight);

    let stat_dollars_spent: u64 = replacement
        .draftable()
        .iter()
        .map(|&i| stat_values[i] as u64)
        .sum();
    let final_dollars_spent: u64 = valuations
        .iter()
        .take(draftable_count)
        .map(|p| p.final_value as u64)
        .sum();

    let summary = PoolSummary {
        season: league.season.clone(),
        eligible_count: pool.len(),
        draftable_count,
        replacement_level: replacement.level,
        total_budget: auction.total_budget,
        dollars_per_var: auction.dollars_per_var,
        adp_ranked_count: ranked_count,
        adp_dollars_per_unit: curve.dollars_per_unit,
        stat_dollars_spent,
        blend_scale,
        blended_dollars_spent,
        final_dollars_spent,
    };

    info!(
        "valued {} eligible players ({} draftable, replacement {:.3}, ${} of ${} assigned, blend scale {:.3}, {} warnings)",
        summary.eligible_count,
        summary.draftable_count,
        summary.replacement_level,
        summary.stat_dollars_spent,
        summary.total_budget,
        summary.blend_scale,
        warnings.len()
    );

    Ok(ValuationReport {
        players: valuations,
        warnings,
        summary,
    })
}
