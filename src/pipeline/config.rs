//! Pipeline Configuration
//!
//! An explicit configuration struct passed into the orchestrator at
//! construction. No process-wide mutable state: the window generator,
//! engine and transform stay independently testable with injected
//! parameters.

use crate::error::{TdaError, TdaResult};
use crate::topology::RipsConfig;

/// Configuration for a windowed persistence run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Rows per window (T).
    pub window_size: usize,
    /// Rows between consecutive window starts (S).
    pub step: usize,
    /// Maximum homology degree computed per window. Degree 1 is what the
    /// landscape transform consumes.
    pub maxdim: usize,
    /// Optional Rips filtration truncation threshold.
    pub max_distance: Option<f64>,
    /// Optional per-window simplex budget. Windows exceeding it are
    /// recorded as failures while the run continues.
    pub max_simplices: Option<usize>,
    /// Bounded retries for transient storage failures.
    pub storage_retries: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_size: 50,
            step: 1,
            maxdim: 1,
            max_distance: None,
            max_simplices: None,
            storage_retries: 3,
        }
    }
}

impl PipelineConfig {
    /// Reject configurations the window generator cannot honor.
    pub fn validate(&self) -> TdaResult<()> {
        if self.window_size == 0 {
            return Err(TdaError::invalid("window_size must be positive"));
        }
        if self.step == 0 {
            return Err(TdaError::invalid("step must be positive"));
        }
        Ok(())
    }

    /// The per-window engine configuration.
    pub fn rips_config(&self) -> RipsConfig {
        RipsConfig {
            max_dim: self.maxdim,
            max_distance: self.max_distance,
            max_simplices: self.max_simplices,
        }
    }
}
