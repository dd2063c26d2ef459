// Value, ADP, and blended rankings for the final board.

use crate::player::PlayerValuation;

/// Assign `value_rank` and `blend_rank`, then sort the board by `value_rank`.
///
/// `players` must be in pool (input) order on entry; that order breaks any
/// remaining ties. `adp_rank` is expected to be filled in already.
///
/// - `value_rank`: `final_value` descending, then `total_score` descending.
/// - `blend_rank`: `adp_weight * adp_rank + (1 - adp_weight) * value_rank`
///   ascending (`value_rank` alone without an ADP rank), then `value_rank`.
pub fn assign_ranks(players: &mut [PlayerValuation], adp_weight: f64) {
    let mut by_value: Vec<usize> = (0..players.len()).collect();
    by_value.sort_by(|&a, &b| {
        let (pa, pb) = (&players[a], &players[b]);
        pb.final_value
            .cmp(&pa.final_value)
            .then_with(|| pb.total_score.total_cmp(&pa.total_score))
    });
    for (position, &idx) in by_value.iter().enumerate() {
        players[idx].value_rank = position as u32 + 1;
    }

    let combined: Vec<f64> = players
        .iter()
        .map(|p| combined_rank_score(p.value_rank, p.adp_rank, adp_weight))
        .collect();
    let mut by_blend: Vec<usize> = (0..players.len()).collect();
    by_blend.sort_by(|&a, &b| {
        combined[a]
            .total_cmp(&combined[b])
            .then_with(|| players[a].value_rank.cmp(&players[b].value_rank))
    });
    for (position, &idx) in by_blend.iter().enumerate() {
        players[idx].blend_rank = position as u32 + 1;
    }

    players.sort_by_key(|p| p.value_rank);
}

/// The score `blend_rank` orders by; lower is better.
pub fn combined_rank_score(value_rank: u32, adp_rank: Option<u32>, adp_weight: f64) -> f64 {
    match adp_rank {
        Some(adp_rank) => adp_weight * adp_rank as f64 + (1.0 - adp_weight) * value_rank as f64,
        None => value_rank as f64,
    }
}
