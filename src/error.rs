//! Error Types for the Topological Pipeline
//!
//! Failure kinds follow the recovery contract of the pipeline:
//!
//! - **Invalid input** fails fast before any computation and is surfaced
//!   to the caller directly.
//! - **Degenerate windows** (too few distinct points, empty diagrams) are
//!   not errors at all; they flow through as empty diagrams and zero norms.
//! - **Per-window failures** (resource budget, storage) are recorded
//!   against their window index by the orchestrator; no window's failure
//!   may corrupt or block any other window.

use thiserror::Error;

/// Crate-wide result alias.
pub type TdaResult<T> = Result<T, TdaError>;

/// Unified error type for the windowed persistence pipeline.
#[derive(Debug, Error)]
pub enum TdaError {
    /// Input rejected before any computation (bad configuration,
    /// malformed series, non-increasing dates).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A point-cloud entry is NaN or infinite.
    #[error("non-finite value {value} at row {row}, column {col}")]
    NonFiniteValue { row: usize, col: usize, value: f64 },

    /// The filtration grew past the configured simplex budget.
    ///
    /// Recorded per window by the orchestrator; the run continues.
    #[error("simplex budget exceeded: {count} simplices, budget {budget}")]
    BudgetExceeded { count: usize, budget: usize },

    /// A reduced persistence pair came out with birth > death.
    ///
    /// Indicates a broken filtration order and is never recoverable.
    #[error("filtration order violated: birth {birth} > death {death}")]
    InvertedInterval { birth: f64, death: f64 },

    /// No stored diagram exists for the requested window.
    #[error("no stored diagram for window {window_index}")]
    DiagramNotFound { window_index: usize },

    /// Underlying filesystem failure while persisting or loading artifacts.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Malformed or unwritable norms table.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed or unwritable diagram file.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl TdaError {
    /// Shorthand for [`TdaError::InvalidInput`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        TdaError::InvalidInput { reason: reason.into() }
    }
}
