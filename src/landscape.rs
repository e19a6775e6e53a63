//! Persistence Landscapes: Functional Summaries of Degree-1 Diagrams
//!
//! A persistence landscape turns a diagram {(b_i, d_i)} into an ordered
//! family of functions lambda_1 >= lambda_2 >= ..., where lambda_k(t) is
//! the k-th largest of the tent values
//!
//!   tent_i(t) = max(0, min(t - b_i, d_i - t))
//!
//! Each lambda_k is piecewise linear with compact support, so its Lp
//! norms have closed forms. The representation here is exact: a shared
//! breakpoint grid containing every birth, every death and every
//! crossing (b_i + d_j)/2 of an ascending with a descending tent edge
//! (the i == j case is the tent apex). Between consecutive breakpoints
//! no tent has a kink and no two tents cross, so the k-th largest is a
//! single linear segment and evaluating at the endpoints loses nothing.
//!
//! Norms aggregate across levels as
//!
//!   ||L||_p = (sum_k integral lambda_k(t)^p dt)^(1/p),  p = 1, 2
//!
//! with each integral computed segment by segment in closed form. An
//! empty diagram (or one with only zero-persistence pairs) has an empty
//! landscape and norms exactly 0.0.

use serde::{Deserialize, Serialize};

/// L1 and L2 norms of one window's landscape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandscapeNorms {
    pub l1: f64,
    pub l2: f64,
}

impl LandscapeNorms {
    /// The norms of the empty landscape.
    pub fn zero() -> Self {
        Self { l1: 0.0, l2: 0.0 }
    }
}

/// Exact piecewise-linear persistence landscape.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceLandscape {
    /// Sorted breakpoints shared by all levels.
    grid: Vec<f64>,
    /// levels[k][i] = lambda_{k+1}(grid[i]); linear in between.
    levels: Vec<Vec<f64>>,
}

impl PersistenceLandscape {
    /// Build the landscape of a finite diagram given as (birth, death)
    /// pairs. Pairs with death <= birth or non-finite endpoints carry no
    /// persistence and are dropped before construction.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        let pairs: Vec<(f64, f64)> = pairs
            .iter()
            .copied()
            .filter(|&(b, d)| b.is_finite() && d.is_finite() && d > b)
            .collect();

        if pairs.is_empty() {
            return Self { grid: Vec::new(), levels: Vec::new() };
        }

        let mut grid =
            Vec::with_capacity(pairs.len() * (pairs.len() + 2));
        for &(b, d) in &pairs {
            grid.push(b);
            grid.push(d);
        }
        for &(b, _) in &pairs {
            for &(_, d) in &pairs {
                grid.push(0.5 * (b + d));
            }
        }
        grid.sort_by(|a, b| a.partial_cmp(b).unwrap());
        grid.dedup();

        let mut levels = vec![vec![0.0; grid.len()]; pairs.len()];
        let mut tents = vec![0.0; pairs.len()];
        for (i, &t) in grid.iter().enumerate() {
            for (slot, &(b, d)) in tents.iter_mut().zip(&pairs) {
                *slot = tent(t, b, d);
            }
            tents.sort_by(|a, b| b.partial_cmp(a).unwrap());
            for (k, level) in levels.iter_mut().enumerate() {
                level[i] = tents[k];
            }
        }

        // Deeper levels vanish once supports stop overlapping.
        while levels
            .last()
            .map_or(false, |level| level.iter().all(|&v| v == 0.0))
        {
            levels.pop();
        }

        Self { grid, levels }
    }

    /// Number of non-zero levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// True iff the source diagram had no positive-persistence pairs.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The shared breakpoint grid.
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// lambda_{k+1} evaluated at t (0-based level index), by linear
    /// interpolation between breakpoints; zero outside the support.
    pub fn value(&self, k: usize, t: f64) -> f64 {
        let level = match self.levels.get(k) {
            Some(level) => level,
            None => return 0.0,
        };
        let first = self.grid[0];
        let last = self.grid[self.grid.len() - 1];
        if t < first || t > last {
            return 0.0;
        }

        match self.grid.binary_search_by(|g| g.partial_cmp(&t).unwrap()) {
            Ok(i) => level[i],
            Err(i) => {
                let (g0, g1) = (self.grid[i - 1], self.grid[i]);
                let (v0, v1) = (level[i - 1], level[i]);
                v0 + (v1 - v0) * (t - g0) / (g1 - g0)
            }
        }
    }

    /// L1 norm: sum over levels of the exact area under lambda_k.
    pub fn l1_norm(&self) -> f64 {
        let mut total = 0.0;
        for level in &self.levels {
            for i in 1..self.grid.len() {
                let h = self.grid[i] - self.grid[i - 1];
                total += h * (level[i - 1] + level[i]) / 2.0;
            }
        }
        total
    }

    /// L2 norm: square root of the summed exact energies. For a segment
    /// running linearly from v0 to v1 over width h the energy is
    /// h * (v0^2 + v0*v1 + v1^2) / 3.
    pub fn l2_norm(&self) -> f64 {
        let mut total = 0.0;
        for level in &self.levels {
            for i in 1..self.grid.len() {
                let h = self.grid[i] - self.grid[i - 1];
                let (v0, v1) = (level[i - 1], level[i]);
                total += h * (v0 * v0 + v0 * v1 + v1 * v1) / 3.0;
            }
        }
        total.sqrt()
    }

    /// Both norms at once.
    pub fn norms(&self) -> LandscapeNorms {
        LandscapeNorms { l1: self.l1_norm(), l2: self.l2_norm() }
    }
}

/// Landscape norms of a diagram without keeping the landscape around.
pub fn landscape_norms(pairs: &[(f64, f64)]) -> LandscapeNorms {
    PersistenceLandscape::from_pairs(pairs).norms()
}

/// Tent function of one persistence pair.
fn tent(t: f64, birth: f64, death: f64) -> f64 {
    (t - birth).min(death - t).max(0.0)
}
