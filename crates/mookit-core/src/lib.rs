//! # mookit-core
//!
//! Set operations and quality indicators for collections of objective
//! vectors produced by multi-objective optimisers: non-dominated
//! filtering, Pareto ranking, hypervolume (exact and approximate),
//! weighted hypervolume, empirical attainment functions, and the
//! distance- and epsilon-based indicator family.
//!
//! All engines are pure, synchronous functions of their inputs. Points
//! are rows of a row-major `&[f64]` matrix with an explicit objective
//! count; the supported number of objectives is 2 to [`MAX_DIMENSION`].
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod avl;
pub mod bitset;
pub mod diag;
pub mod eaf;
pub mod error;
pub mod geometry;
pub mod hv;
pub mod indicators;
pub mod ndfilter;
pub mod powi;
pub mod ranking;
pub mod setcmp;
pub mod sort;
pub mod whv;

pub use error::Error;
pub use geometry::{Agreement, Direction, MAX_DIMENSION};
