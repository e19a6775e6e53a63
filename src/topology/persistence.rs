//! Persistent Homology via Boundary-Matrix Reduction
//!
//! Implements the standard reduction algorithm over Z/2 coefficients:
//! simplices enter in filtration order, each column of the boundary
//! matrix is reduced against earlier columns sharing its lowest non-zero
//! row, and surviving pivots read off the (birth, death) pairs. Unpaired
//! creator simplices with a zero column are essential classes with
//! infinite death.
//!
//! A persistence interval [b, d) represents a feature born at filtration
//! value b that dies at value d. Long-lived features are robust
//! structure; short-lived features are noise. Pairs with zero
//! persistence (b == d) are discarded during extraction since they carry
//! no information, and an extracted pair with d < b means the filtration
//! order itself is broken, which fails fast.

use std::collections::{BTreeSet, HashMap};

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::{TdaError, TdaResult};

use super::rips::{validate_point_cloud, RipsConfig, RipsFiltration};
use super::pairwise_distances;

/// A persistence interval [birth, death) for one homology class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistenceInterval {
    pub birth: f64,
    pub death: f64,
    pub dimension: usize,
}

impl PersistenceInterval {
    pub fn new(birth: f64, death: f64, dimension: usize) -> Self {
        Self { birth, death, dimension }
    }

    /// Lifetime of the feature.
    pub fn persistence(&self) -> f64 {
        if self.death.is_infinite() {
            f64::INFINITY
        } else {
            self.death - self.birth
        }
    }

    /// Is this an essential feature (never dies within the filtration)?
    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }
}

/// Persistence diagram: all intervals of a point cloud, every dimension.
#[derive(Debug, Clone, Default)]
pub struct PersistenceDiagram {
    pub intervals: Vec<PersistenceInterval>,
}

impl PersistenceDiagram {
    pub fn new() -> Self {
        Self { intervals: Vec::new() }
    }

    /// All intervals of dimension d.
    pub fn dim(&self, d: usize) -> Vec<&PersistenceInterval> {
        self.intervals.iter().filter(|i| i.dimension == d).collect()
    }

    /// Finite intervals of dimension d.
    pub fn finite_intervals(&self, d: usize) -> Vec<&PersistenceInterval> {
        self.intervals
            .iter()
            .filter(|i| i.dimension == d && !i.is_essential())
            .collect()
    }

    /// Number of finite intervals in dimension d.
    pub fn count(&self, d: usize) -> usize {
        self.finite_intervals(d).len()
    }

    /// The finite degree-1 pairs consumed by the landscape transform and
    /// the diagram store, in diagram order.
    pub fn h1_pairs(&self) -> Vec<(f64, f64)> {
        self.finite_intervals(1)
            .into_iter()
            .map(|i| (i.birth, i.death))
            .collect()
    }
}

/// Sparse boundary-matrix column: the set of non-zero row indices.
/// Addition over Z/2 is symmetric difference.
#[derive(Debug, Clone)]
struct SparseColumn {
    rows: BTreeSet<usize>,
}

impl SparseColumn {
    fn new() -> Self {
        Self { rows: BTreeSet::new() }
    }

    fn is_zero(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lowest non-zero entry: the maximum row index.
    fn low(&self) -> Option<usize> {
        self.rows.iter().next_back().copied()
    }

    fn toggle(&mut self, row: usize) {
        if !self.rows.remove(&row) {
            self.rows.insert(row);
        }
    }

    fn add_assign(&mut self, other: &SparseColumn) {
        for &row in &other.rows {
            self.toggle(row);
        }
    }
}

/// Persistent homology of a point cloud: distance matrix, Rips
/// filtration, reduction, diagram.
///
/// Degrees 0 through `config.max_dim` are computed. NaN or infinite
/// coordinates fail before any computation; degenerate clouds (fewer
/// than two distinct points) produce empty degree-1 diagrams.
pub fn compute_persistence(
    points: ArrayView2<'_, f64>,
    config: &RipsConfig,
) -> TdaResult<PersistenceDiagram> {
    validate_point_cloud(points)?;
    if points.nrows() == 0 {
        return Ok(PersistenceDiagram::new());
    }

    let distances = pairwise_distances(points);
    let filtration = RipsFiltration::build(&distances, config)?;
    reduce(&filtration, config.max_dim)
}

/// Reduce the boundary matrix of a sorted filtration and extract the
/// persistence pairs for dimensions 0 through `max_dim`.
fn reduce(
    filtration: &RipsFiltration,
    max_dim: usize,
) -> TdaResult<PersistenceDiagram> {
    let simplices = &filtration.simplices;
    let m = simplices.len();

    // Vertex list -> position in filtration order, for boundary lookup.
    let mut simplex_index: HashMap<&[usize], usize> =
        HashMap::with_capacity(m);
    for (idx, s) in simplices.iter().enumerate() {
        simplex_index.insert(s.vertices.as_slice(), idx);
    }

    let mut columns: Vec<SparseColumn> = Vec::with_capacity(m);
    let mut pivot_of_low: HashMap<usize, usize> = HashMap::with_capacity(m);

    for simplex in simplices.iter() {
        let mut column = SparseColumn::new();

        // Boundary of [v0, ..., vk]: all facets with one vertex removed.
        if simplex.dimension() > 0 {
            for omit in 0..simplex.vertices.len() {
                let mut facet = simplex.vertices.clone();
                facet.remove(omit);
                if let Some(&facet_idx) =
                    simplex_index.get(facet.as_slice())
                {
                    column.toggle(facet_idx);
                }
            }
        }

        // Standard reduction: cancel against earlier columns sharing the
        // same lowest entry until the pivot is fresh or the column dies.
        while let Some(low) = column.low() {
            match pivot_of_low.get(&low) {
                Some(&earlier) => column.add_assign(&columns[earlier]),
                None => break,
            }
        }

        if let Some(low) = column.low() {
            pivot_of_low.insert(low, columns.len());
        }
        columns.push(column);
    }

    // Surviving pivots pair a creator (row) with its destroyer (column).
    let mut diagram = PersistenceDiagram::new();
    let mut paired = vec![false; m];

    for (col_idx, column) in columns.iter().enumerate() {
        if let Some(low) = column.low() {
            paired[low] = true;
            paired[col_idx] = true;

            let birth = simplices[low].birth;
            let death = simplices[col_idx].birth;
            let dimension = simplices[low].dimension();

            if death < birth {
                return Err(TdaError::InvertedInterval { birth, death });
            }
            if death > birth && dimension <= max_dim {
                diagram.intervals.push(PersistenceInterval::new(
                    birth, death, dimension,
                ));
            }
        }
    }

    // Unpaired creators with a zero boundary are essential classes.
    for (idx, simplex) in simplices.iter().enumerate() {
        if !paired[idx]
            && columns[idx].is_zero()
            && simplex.dimension() <= max_dim
        {
            diagram.intervals.push(PersistenceInterval::new(
                simplex.birth,
                f64::INFINITY,
                simplex.dimension(),
            ));
        }
    }

    Ok(diagram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn persistence_of(points: Array2<f64>) -> PersistenceDiagram {
        compute_persistence(points.view(), &RipsConfig::default()).unwrap()
    }

    #[test]
    fn test_two_points() {
        let pd = persistence_of(array![[0.0, 0.0], [1.0, 0.0]]);

        // Two components merge at distance 1, one survives forever.
        let finite_h0 = pd.finite_intervals(0);
        assert_eq!(finite_h0.len(), 1);
        assert!((finite_h0[0].birth - 0.0).abs() < 1e-12);
        assert!((finite_h0[0].death - 1.0).abs() < 1e-12);

        let essential: Vec<_> =
            pd.dim(0).into_iter().filter(|i| i.is_essential()).collect();
        assert_eq!(essential.len(), 1);
    }

    #[test]
    fn test_equilateral_triangle_has_no_persistent_cycle() {
        let pd = persistence_of(array![
            [0.0, 0.0],
            [1.0, 0.0],
            [0.5, 3.0_f64.sqrt() / 2.0]
        ]);

        // 3 components merge into 1.
        assert_eq!(pd.count(0), 2);
        // The loop closes and fills at the same scale.
        assert!(pd.finite_intervals(1).is_empty());
    }

    #[test]
    fn test_unit_square_cycle() {
        let pd = persistence_of(array![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0]
        ]);

        let h1 = pd.finite_intervals(1);
        assert_eq!(h1.len(), 1, "square should carry exactly one cycle");
        assert!((h1[0].birth - 1.0).abs() < 1e-12);
        assert!((h1[0].death - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!(
            (h1[0].persistence() - (2.0_f64.sqrt() - 1.0)).abs() < 1e-12
        );

        assert_eq!(pd.h1_pairs().len(), 1);
    }

    #[test]
    fn test_identical_points_degenerate() {
        let pd = persistence_of(array![
            [0.5, 0.5],
            [0.5, 0.5],
            [0.5, 0.5],
            [0.5, 0.5]
        ]);

        // All merges happen at scale 0 with zero persistence; degree 1 is
        // empty and exactly one essential component remains.
        assert!(pd.finite_intervals(0).is_empty());
        assert!(pd.h1_pairs().is_empty());
        let essential: Vec<_> =
            pd.dim(0).into_iter().filter(|i| i.is_essential()).collect();
        assert_eq!(essential.len(), 1);
    }

    #[test]
    fn test_rejects_non_finite_cloud() {
        let points = array![[0.0, 0.0], [f64::INFINITY, 0.0]];
        let err = compute_persistence(points.view(), &RipsConfig::default())
            .unwrap_err();
        assert!(matches!(err, TdaError::NonFiniteValue { .. }));
    }

    #[test]
    fn test_truncated_square_leaves_essential_cycle() {
        // Threshold below the diagonal: the loop never fills in.
        let config = RipsConfig {
            max_distance: Some(1.2),
            ..RipsConfig::default()
        };
        let points =
            array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let pd = compute_persistence(points.view(), &config).unwrap();

        assert!(pd.h1_pairs().is_empty());
        let essential_h1: Vec<_> =
            pd.dim(1).into_iter().filter(|i| i.is_essential()).collect();
        assert_eq!(essential_h1.len(), 1);
        assert!((essential_h1[0].birth - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_cloud() {
        let points = Array2::<f64>::zeros((0, 3));
        let pd = compute_persistence(points.view(), &RipsConfig::default())
            .unwrap();
        assert!(pd.intervals.is_empty());
    }

    #[test]
    fn test_deterministic_across_runs() {
        let points = array![
            [0.1, 0.9],
            [0.4, 0.2],
            [0.8, 0.7],
            [0.3, 0.5],
            [0.9, 0.1]
        ];
        let a = persistence_of(points.clone());
        let b = persistence_of(points);
        assert_eq!(a.intervals, b.intervals);
    }
}
