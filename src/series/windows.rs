//! Sliding-Window Generation
//!
//! Turns an ordered series into a finite sequence of fixed-size
//! overlapping point clouds. Each window is a T x d view of the series
//! rows together with its window index and date range.
//!
//! The sequence is lazy and restartable: [`SlidingWindows`] is a `Clone`
//! iterator that computes nothing until pulled, so consumers can pull
//! windows on demand or re-enumerate from the start. For a series of
//! length N, window size T and step S the sequence has exactly
//! floor((N - T)/S) + 1 windows when T <= N, and is empty otherwise.
//! No partial windows are ever emitted.

use chrono::NaiveDate;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use super::Series;
use crate::error::{TdaError, TdaResult};

/// A fixed-length slice of the series, interpreted as a point cloud of
/// T points in R^d.
#[derive(Debug, Clone)]
pub struct Window<'a> {
    /// Monotonically increasing window index (0-based).
    pub index: usize,
    /// Timestamp of the window's first row.
    pub start_date: NaiveDate,
    /// Timestamp of the window's last row.
    pub end_date: NaiveDate,
    points: ArrayView2<'a, f64>,
}

impl<'a> Window<'a> {
    /// The T x d matrix underlying this window.
    pub fn points(&self) -> ArrayView2<'a, f64> {
        self.points
    }

    /// Number of rows (points) in the window.
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    /// True if the window holds no rows. Never the case for windows
    /// produced by [`SlidingWindows`].
    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// The window's metadata record.
    pub fn meta(&self) -> WindowMeta {
        WindowMeta {
            window_index: self.index,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Window metadata exposed to downstream collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowMeta {
    pub window_index: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Lazy iterator over the sliding windows of a [`Series`].
#[derive(Debug, Clone)]
pub struct SlidingWindows<'a> {
    series: &'a Series,
    window_size: usize,
    step: usize,
    next_index: usize,
}

impl<'a> SlidingWindows<'a> {
    pub(super) fn over(
        series: &'a Series,
        window_size: usize,
        step: usize,
    ) -> TdaResult<Self> {
        if window_size == 0 {
            return Err(TdaError::invalid("window_size must be positive"));
        }
        if step == 0 {
            return Err(TdaError::invalid("step must be positive"));
        }
        Ok(Self { series, window_size, step, next_index: 0 })
    }

    /// Total number of windows the full sequence yields.
    pub fn total(&self) -> usize {
        let n = self.series.len();
        if self.window_size > n {
            0
        } else {
            (n - self.window_size) / self.step + 1
        }
    }
}

impl<'a> Iterator for SlidingWindows<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Window<'a>> {
        let start = self.next_index.checked_mul(self.step)?;
        let end = start.checked_add(self.window_size)?;
        if end > self.series.len() {
            return None;
        }

        let index = self.next_index;
        self.next_index += 1;

        let dates = self.series.dates();
        Some(Window {
            index,
            start_date: dates[start],
            end_date: dates[end - 1],
            points: self.series.values().slice_move(ndarray::s![start..end, ..]),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.next_index);
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for SlidingWindows<'a> {}
