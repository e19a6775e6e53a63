//! Pipeline Orchestration: Windows Through Persistence to Norms
//!
//! Drives the full analysis: sliding windows over the series, a
//! persistence diagram per window, landscape norms per diagram, and an
//! ordered norms table keyed by window index.
//!
//! Every window is a pure function of its own point cloud, so windows
//! are processed on a rayon worker pool with no ordering dependency and
//! no shared mutable state; results land in their window-index slot
//! regardless of worker scheduling. A failure in one window (resource
//! budget, storage) is recorded against that window alone and never
//! blocks or corrupts the rest of the run.

mod config;
mod orchestrator;
mod records;

pub use config::PipelineConfig;
pub use orchestrator::Pipeline;
pub use records::{
    NormRow, NormsTable, RunOutput, RunSummary, WindowFailure, WindowRecord,
};
