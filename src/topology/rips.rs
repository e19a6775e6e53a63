//! Vietoris-Rips Filtration Construction
//!
//! The Vietoris-Rips complex VR_eps(X) contains a k-simplex
//! [v0, ..., vk] iff every pairwise distance d(vi, vj) <= eps. Each
//! simplex is therefore born at the diameter of its vertex set: vertices
//! at 0, edges at their length, higher simplices at the longest edge they
//! contain.
//!
//! Enumeration is iterative, dimension by dimension. A (k+1)-simplex is
//! produced by extending a k-simplex with a vertex of higher index that
//! lies within the threshold of all current members, so each simplex is
//! generated exactly once in sorted-vertex form and no call-stack
//! recursion is involved. The filtration can be truncated at a maximum
//! distance, trading high-scale features for tractability, and capped at
//! a maximum simplex count for a deterministic cost bound.

use ndarray::{Array2, ArrayView2};

use crate::error::{TdaError, TdaResult};

/// Euclidean distance matrix of a T x d point cloud, double precision.
pub fn pairwise_distances(points: ArrayView2<'_, f64>) -> Array2<f64> {
    let n = points.nrows();
    let dim = points.ncols();

    let mut dm = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in i + 1..n {
            let mut dist_sq = 0.0;
            for d in 0..dim {
                let diff = points[[i, d]] - points[[j, d]];
                dist_sq += diff * diff;
            }
            let dist = dist_sq.sqrt();
            dm[[i, j]] = dist;
            dm[[j, i]] = dist;
        }
    }
    dm
}

/// Reject point clouds containing NaN or infinite coordinates before any
/// computation touches them.
pub(crate) fn validate_point_cloud(
    points: ArrayView2<'_, f64>,
) -> TdaResult<()> {
    for ((row, col), &v) in points.indexed_iter() {
        if !v.is_finite() {
            return Err(TdaError::NonFiniteValue { row, col, value: v });
        }
    }
    Ok(())
}

/// Engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct RipsConfig {
    /// Maximum homology degree to compute. Simplices are enumerated up to
    /// dimension `max_dim + 1`.
    pub max_dim: usize,
    /// Filtration truncation threshold. `None` means unbounded: the full
    /// complex on the point cloud is enumerated.
    pub max_distance: Option<f64>,
    /// Hard cap on the number of simplices in the filtration. Exceeding
    /// it is a per-window [`TdaError::BudgetExceeded`] failure.
    pub max_simplices: Option<usize>,
}

impl Default for RipsConfig {
    fn default() -> Self {
        Self { max_dim: 1, max_distance: None, max_simplices: None }
    }
}

/// A simplex with the filtration value at which it appears.
#[derive(Debug, Clone)]
pub(crate) struct FilteredSimplex {
    /// Vertex indices, strictly increasing.
    pub vertices: Vec<usize>,
    /// Diameter of the vertex set.
    pub birth: f64,
}

impl FilteredSimplex {
    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }
}

/// The fully enumerated, sorted filtration of a point cloud.
#[derive(Debug)]
pub struct RipsFiltration {
    pub(crate) simplices: Vec<FilteredSimplex>,
    n_points: usize,
}

impl RipsFiltration {
    /// Enumerate all simplices of the Rips filtration up to dimension
    /// `config.max_dim + 1`, sorted by (birth, dimension, vertex order).
    pub fn build(
        distances: &Array2<f64>,
        config: &RipsConfig,
    ) -> TdaResult<Self> {
        let n = distances.nrows();
        let threshold = config.max_distance.unwrap_or(f64::INFINITY);
        let budget = config.max_simplices.unwrap_or(usize::MAX);

        let mut simplices: Vec<FilteredSimplex> = Vec::new();

        // Vertices, all born at scale 0.
        for i in 0..n {
            simplices.push(FilteredSimplex { vertices: vec![i], birth: 0.0 });
        }
        Self::check_budget(&simplices, budget)?;

        // Edges, born at their length.
        let mut frontier = simplices.len();
        for i in 0..n {
            for j in i + 1..n {
                let d = distances[[i, j]];
                if d <= threshold {
                    simplices.push(FilteredSimplex {
                        vertices: vec![i, j],
                        birth: d,
                    });
                    Self::check_budget(&simplices, budget)?;
                }
            }
        }

        // Expand dimension by dimension: a simplex grows by any vertex of
        // higher index within the threshold of all current members. The
        // new birth is the max of the old diameter and the new edges.
        for _dim in 2..=config.max_dim + 1 {
            let range = frontier..simplices.len();
            frontier = simplices.len();
            if range.is_empty() {
                break;
            }

            for idx in range {
                let base_vertices = simplices[idx].vertices.clone();
                let base_birth = simplices[idx].birth;
                let last = match base_vertices.last() {
                    Some(&v) => v,
                    None => continue,
                };

                'candidates: for w in last + 1..n {
                    let mut birth = base_birth;
                    for &v in &base_vertices {
                        let d = distances[[v, w]];
                        if d > threshold {
                            continue 'candidates;
                        }
                        birth = birth.max(d);
                    }

                    let mut vertices = base_vertices.clone();
                    vertices.push(w);
                    simplices.push(FilteredSimplex { vertices, birth });
                    Self::check_budget(&simplices, budget)?;
                }
            }
        }

        // Filtration order: ties in birth broken deterministically so
        // equal-scale features come out in a reproducible order.
        simplices.sort_by(|a, b| {
            a.birth
                .partial_cmp(&b.birth)
                .unwrap()
                .then(a.dimension().cmp(&b.dimension()))
                .then(a.vertices.cmp(&b.vertices))
        });

        Ok(Self { simplices, n_points: n })
    }

    fn check_budget(
        simplices: &[FilteredSimplex],
        budget: usize,
    ) -> TdaResult<()> {
        if simplices.len() > budget {
            Err(TdaError::BudgetExceeded {
                count: simplices.len(),
                budget,
            })
        } else {
            Ok(())
        }
    }

    /// Number of simplices in the filtration.
    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    /// True for the filtration of an empty point cloud.
    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// Number of points underlying the filtration.
    pub fn n_points(&self) -> usize {
        self.n_points
    }
}
