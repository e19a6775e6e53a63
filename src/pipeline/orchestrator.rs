//! The Orchestrator: Per-Window Drive Loop
//!
//! Sequences windows through the persistence engine and the landscape
//! transform, associates each result with its window metadata and
//! assembles the final ordered table. Re-running with identical inputs
//! and configuration reproduces an identical table.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::TdaResult;
use crate::landscape::landscape_norms;
use crate::series::{Series, Window};
use crate::storage::DiagramStore;
use crate::topology::{compute_persistence, RipsConfig};

use super::config::PipelineConfig;
use super::records::{RunOutput, RunSummary, WindowFailure, WindowRecord};

/// Windowed persistence pipeline over a prepared series.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Build a pipeline, rejecting invalid configurations up front.
    pub fn new(config: PipelineConfig) -> TdaResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process every window of the series, keeping all artifacts in
    /// memory.
    pub fn run(&self, series: &Series) -> TdaResult<RunOutput> {
        self.run_inner(series, None)
    }

    /// Process every window, persisting each window's degree-1 diagram
    /// to the store as it completes. A storage failure (after bounded
    /// retries) fails only the affected window.
    pub fn run_with_store(
        &self,
        series: &Series,
        store: &DiagramStore,
    ) -> TdaResult<RunOutput> {
        self.run_inner(series, Some(store))
    }

    fn run_inner(
        &self,
        series: &Series,
        store: Option<&DiagramStore>,
    ) -> TdaResult<RunOutput> {
        let windows: Vec<Window<'_>> = series
            .windows(self.config.window_size, self.config.step)?
            .collect();

        info!(
            windows = windows.len(),
            window_size = self.config.window_size,
            step = self.config.step,
            maxdim = self.config.maxdim,
            "starting windowed persistence run"
        );

        let rips = self.config.rips_config();

        // Each window is independent; collect() keeps index order no
        // matter how the workers are scheduled.
        let outcomes: Vec<Result<WindowRecord, WindowFailure>> = windows
            .into_par_iter()
            .map(|window| process_window(window, &rips, store))
            .collect();

        let mut records = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(record) => records.push(record),
                Err(failure) => failures.push(failure),
            }
        }

        let summary = RunSummary {
            windows_total: records.len() + failures.len(),
            windows_ok: records.len(),
            windows_failed: failures.len(),
        };
        info!(
            total = summary.windows_total,
            ok = summary.windows_ok,
            failed = summary.windows_failed,
            "run complete"
        );

        Ok(RunOutput { records, failures, summary })
    }
}

fn process_window(
    window: Window<'_>,
    rips: &RipsConfig,
    store: Option<&DiagramStore>,
) -> Result<WindowRecord, WindowFailure> {
    let meta = window.meta();

    let outcome = compute_persistence(window.points(), rips)
        .map(|diagram| diagram.h1_pairs())
        .and_then(|h1| {
            if let Some(store) = store {
                store.save_h1(meta.window_index, &h1)?;
            }
            Ok(h1)
        });

    match outcome {
        Ok(h1) => {
            let norms = landscape_norms(&h1);
            debug!(
                window = meta.window_index,
                features = h1.len(),
                l1 = norms.l1,
                l2 = norms.l2,
                "window processed"
            );
            Ok(WindowRecord {
                window_index: meta.window_index,
                start_date: meta.start_date,
                end_date: meta.end_date,
                h1,
                norms,
            })
        }
        Err(error) => {
            warn!(
                window = meta.window_index,
                %error,
                "window failed, continuing with remaining windows"
            );
            Err(WindowFailure {
                window_index: meta.window_index,
                start_date: meta.start_date,
                end_date: meta.end_date,
                error,
            })
        }
    }
}
