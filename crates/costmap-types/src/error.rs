use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("inverted region bounds: [{min_x},{min_y}]-[{max_x},{max_y}]")]
    InvertedRegion {
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
    },

    #[error("invalid region text: {0}")]
    InvalidRegion(String),

    #[error("unknown action kind: {0}")]
    UnknownActionKind(String),
}
