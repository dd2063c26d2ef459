// Fatal errors and non-fatal warnings raised by the valuation pipeline.

use serde::Serialize;
use thiserror::Error;

use crate::category::Category;

/// Conditions that abort a valuation run. No partial output is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("invalid config for field `{field}`: {message}")]
    InvalidConfig { field: String, message: String },
}

impl ValuationError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValuationError::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Degraded-mode conditions. The run continues under the documented fallback
/// and the warning is reported alongside the output.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValuationWarning {
    #[error("only {eligible} eligible players for {draftable} roster spots; replacement level uses the lowest score")]
    ShallowPool { eligible: usize, draftable: usize },

    #[error("category `{category}` has zero variance; its standardized score is 0 for every player")]
    ZeroVariance { category: Category },

    #[error("no ADP record for `{name}`; using statistical value only")]
    UnmatchedAdp { name: String },

    #[error("duplicate ADP record for `{name}`; keeping the first")]
    DuplicateAdp { name: String },

    #[error("no draftable player has positive value above replacement; every player is valued at $1")]
    NoPositiveValue,

    #[error("budget pool ${total_budget} cannot cover the ${floor} minimum-bid floor")]
    BudgetBelowFloor { total_budget: f64, floor: f64 },

    #[error("`{name}` has a non-finite stat value; excluded from the pool")]
    NonFiniteStats { name: String },

    #[error("draftable players' blended values spend ${spent:.0} of a ${total_budget} pool")]
    BlendedBudgetDrift { spent: f64, total_budget: f64 },
}
