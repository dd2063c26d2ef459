// Games-played eligibility filter.

use tracing::{debug, warn};

use crate::error::{ValuationError, ValuationWarning};
use crate::player::RawPlayerRecord;

/// Keep players with at least `min_games` games, preserving input order.
///
/// A player with a NaN or infinite stat would poison every pool mean it
/// touches, so such records are dropped with a `NonFiniteStats` warning.
///
/// An empty result is fatal: every later stage needs at least one player to
/// take statistics over.
pub fn filter_eligible<'a>(
    players: &'a [RawPlayerRecord],
    min_games: u32,
    warnings: &mut Vec<ValuationWarning>,
) -> Result<Vec<&'a RawPlayerRecord>, ValuationError> {
    let mut eligible: Vec<&RawPlayerRecord> = Vec::with_capacity(players.len());
    for player in players.iter().filter(|p| p.games >= min_games) {
        if !player.has_finite_stats() {
            warn!("excluding '{}': non-finite stat value", player.name);
            warnings.push(ValuationWarning::NonFiniteStats {
                name: player.name.clone(),
            });
            continue;
        }
        eligible.push(player);
    }

    if eligible.is_empty() {
        return Err(ValuationError::InsufficientData {
            reason: format!(
                "no players with at least {min_games} games played and finite stats (out of {} supplied)",
                players.len()
            ),
        });
    }

    debug!(
        "{} of {} players meet the {}-game minimum",
        eligible.len(),
        players.len(),
        min_games
    );
    Ok(eligible)
}
