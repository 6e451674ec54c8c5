/// Errors produced while configuring the optimizer or loading action plans.
///
/// Ledger operations themselves never fail; see [`crate::ActionLedger`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("merge tolerance must not be negative, got {0}")]
    NegativeTolerance(i64),

    #[error("merge tolerance {0} exceeds the supported range")]
    ToleranceOutOfRange(i64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid plan entry {index}: {reason}")]
    InvalidPlanEntry { index: usize, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for fallible action operations.
pub type ActionResult<T> = Result<T, ActionError>;
