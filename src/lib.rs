//! Samrgeom is the geometry layer of a structured adaptive mesh refinement
//! (SAMR) framework. It describes a Cartesian index space of cells mapped
//! onto a rectangular physical domain, derives the geometry of refined and
//! coarsened levels, attaches spacing, physical bounds and boundary boxes to
//! individual patches, and persists all of this to restart files. It also
//! provides elementwise arithmetic and reductions on cell-centered and
//! side-centered patch data, restricted to a box of interest.

pub mod array_data;
pub mod boundary;
pub mod config;
pub mod error;
pub mod geometry;
pub mod index_space;
pub mod level;
pub mod math;
pub mod num_vec;
pub mod patch;
pub mod restart;
pub mod scalar;
pub mod side_data;
