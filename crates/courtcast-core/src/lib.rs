// Library root: the nine-category auction valuation pipeline.
//
// Pure computation over an in-memory snapshot: no I/O, no shared state.

pub mod category;
pub mod error;
pub mod league;
pub mod player;
pub mod valuation;

pub use category::{Category, StatBasis};
pub use error::{ValuationError, ValuationWarning};
pub use league::{BlendTier, BlendTiers, CategoryWeights, LeagueConfig, ValuationTuning};
pub use player::{AdpRecord, PlayerValuation, PositionGroup, RawPlayerRecord, ShootingTotals, StatLine};
pub use valuation::{compute_valuations, PoolSummary, ValuationReport};
