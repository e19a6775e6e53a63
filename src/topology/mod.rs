//! Topology Module: Vietoris-Rips Filtrations and Persistent Homology
//!
//! For a point cloud X (one sliding window of the series, T points in
//! R^d) we construct the Vietoris-Rips filtration VR_eps(X) indexed by
//! the scale parameter eps and compute its persistent homology. The
//! resulting diagram records the birth and death filtration values of
//! every topological feature (connected components in degree 0, loops in
//! degree 1) as the scale grows.
//!
//! ## Pipeline role
//!
//! The engine is a stateless pure function of the point cloud: distance
//! matrix, filtration, boundary-matrix reduction, diagram. Degenerate
//! clouds (all points coincident) are valid inputs and produce empty
//! degree-1 diagrams. Cost is controlled by an optional distance
//! threshold that truncates the filtration and an optional simplex
//! budget that fails deterministically instead of running away.
//!
//! ## Reference
//!
//! Edelsbrunner, Letscher, Zomorodian (2002). "Topological Persistence
//! and Simplification". Discrete & Computational Geometry.

mod persistence;
mod rips;

pub use persistence::{
    compute_persistence, PersistenceDiagram, PersistenceInterval,
};
pub use rips::{pairwise_distances, RipsConfig, RipsFiltration};
