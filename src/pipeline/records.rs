//! Run Artifacts: Window Records, Failures and the Norms Table
//!
//! A [`WindowRecord`] is immutable once computed: the window's identity,
//! its finite degree-1 diagram and its landscape norms. The final
//! artifact of a run is the ordered collection of records plus any
//! per-window failures, summarized in a [`RunSummary`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TdaError;
use crate::landscape::LandscapeNorms;

/// One successfully processed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub window_index: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Finite degree-1 (birth, death) pairs of the window's point cloud.
    pub h1: Vec<(f64, f64)>,
    pub norms: LandscapeNorms,
}

/// One window whose computation or persistence failed. The run carries
/// on; the failure is reported in the run summary.
#[derive(Debug)]
pub struct WindowFailure {
    pub window_index: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub error: TdaError,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub windows_total: usize,
    pub windows_ok: usize,
    pub windows_failed: usize,
}

/// Everything a run produces.
#[derive(Debug)]
pub struct RunOutput {
    /// Successful windows, ordered by window index.
    pub records: Vec<WindowRecord>,
    /// Failed windows, ordered by window index.
    pub failures: Vec<WindowFailure>,
    pub summary: RunSummary,
}

impl RunOutput {
    /// The final norms table: one row per successful window, sorted by
    /// window index (equivalently by start date).
    pub fn norms_table(&self) -> NormsTable {
        NormsTable {
            rows: self
                .records
                .iter()
                .map(|r| NormRow {
                    window_index: r.window_index,
                    start_date: r.start_date,
                    end_date: r.end_date,
                    l1_norm: r.norms.l1,
                    l2_norm: r.norms.l2,
                })
                .collect(),
        }
    }
}

/// One row of the norms table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormRow {
    pub window_index: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub l1_norm: f64,
    pub l2_norm: f64,
}

/// The time-indexed table of landscape norms.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormsTable {
    pub rows: Vec<NormRow>,
}

impl NormsTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
