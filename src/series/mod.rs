//! Date-Indexed Multivariate Series
//!
//! The pipeline consumes a cleaned, gap-free matrix of d simultaneous
//! market series: one row per trading day, one column per index. Upstream
//! collaborators are responsible for alignment and gap filling; this type
//! enforces the resulting invariants at construction:
//!
//! - timestamps strictly increasing (no duplicate dates)
//! - one timestamp per row
//! - every value finite
//!
//! A [`Series`] of price levels can be converted to the one-step
//! log-return series the topological analysis operates on via
//! [`Series::log_returns`].

use chrono::NaiveDate;
use ndarray::{Array2, ArrayView2};

use crate::error::{TdaError, TdaResult};

mod windows;

pub use windows::{SlidingWindows, Window, WindowMeta};

/// An ordered, evenly-indexed multivariate series: N dates by d columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    dates: Vec<NaiveDate>,
    values: Array2<f64>,
}

impl Series {
    /// Build a series from parallel dates and values, validating the
    /// invariants the rest of the pipeline relies on.
    pub fn new(dates: Vec<NaiveDate>, values: Array2<f64>) -> TdaResult<Self> {
        if dates.len() != values.nrows() {
            return Err(TdaError::invalid(format!(
                "{} dates but {} value rows",
                dates.len(),
                values.nrows()
            )));
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(TdaError::invalid(format!(
                    "dates not strictly increasing: {} then {}",
                    pair[0], pair[1]
                )));
            }
        }
        for ((row, col), &v) in values.indexed_iter() {
            if !v.is_finite() {
                return Err(TdaError::NonFiniteValue { row, col, value: v });
            }
        }
        Ok(Self { dates, values })
    }

    /// Number of rows (dates).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True if the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of columns (tracked indices).
    pub fn dim(&self) -> usize {
        self.values.ncols()
    }

    /// The date index.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The full N x d value matrix.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// One-step log returns: row t becomes ln(x_t / x_{t-1}).
    ///
    /// The first date is dropped, so the result has N - 1 rows. Requires
    /// strictly positive values (price levels).
    pub fn log_returns(&self) -> TdaResult<Series> {
        if self.len() < 2 {
            return Err(TdaError::invalid(
                "log returns need at least two rows",
            ));
        }
        for ((row, col), &v) in self.values.indexed_iter() {
            if v <= 0.0 {
                return Err(TdaError::invalid(format!(
                    "non-positive level {v} at row {row}, column {col}"
                )));
            }
        }

        let n = self.len() - 1;
        let d = self.dim();
        let mut returns = Array2::<f64>::zeros((n, d));
        for t in 0..n {
            for j in 0..d {
                returns[[t, j]] =
                    (self.values[[t + 1, j]] / self.values[[t, j]]).ln();
            }
        }

        Series::new(self.dates[1..].to_vec(), returns)
    }

    /// Lazy sliding-window sequence over the rows of this series.
    ///
    /// The i-th window covers rows [i*step, i*step + window_size). Windows
    /// are emitted in increasing start order, which is chronological order.
    /// `window_size > len()` yields an empty sequence, not an error.
    pub fn windows(
        &self,
        window_size: usize,
        step: usize,
    ) -> TdaResult<SlidingWindows<'_>> {
        SlidingWindows::over(self, window_size, step)
    }

    /// Metadata for every window: index plus first and last timestamp.
    pub fn windows_metadata(
        &self,
        window_size: usize,
        step: usize,
    ) -> TdaResult<Vec<WindowMeta>> {
        Ok(self.windows(window_size, step)?.map(|w| w.meta()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(Series::new(dates(3), values).is_err());
    }

    #[test]
    fn test_rejects_unsorted_dates() {
        let mut ds = dates(3);
        ds.swap(0, 2);
        let values = array![[1.0], [2.0], [3.0]];
        assert!(Series::new(ds, values).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        let values = array![[1.0], [f64::NAN], [3.0]];
        let err = Series::new(dates(3), values).unwrap_err();
        match err {
            TdaError::NonFiniteValue { row, col, .. } => {
                assert_eq!((row, col), (1, 0));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_log_returns() {
        let values = array![[100.0, 1.0], [110.0, 1.0], [99.0, 1.0]];
        let series = Series::new(dates(3), values).unwrap();
        let returns = series.log_returns().unwrap();

        assert_eq!(returns.len(), 2);
        assert_eq!(returns.dates()[0], series.dates()[1]);
        assert!((returns.values()[[0, 0]] - (1.1_f64).ln()).abs() < 1e-12);
        assert!((returns.values()[[1, 0]] - (0.9_f64).ln()).abs() < 1e-12);
        assert_eq!(returns.values()[[0, 1]], 0.0);
    }

    #[test]
    fn test_log_returns_rejects_non_positive() {
        let values = array![[100.0], [0.0], [99.0]];
        let series = Series::new(dates(3), values).unwrap();
        assert!(series.log_returns().is_err());
    }
}
