//! # mookit-io
//!
//! The data boundary of the workspace: whitespace-separated numeric
//! tables holding one or more approximation sets (blank-line separated),
//! the matching 15-significant-digit output format, and the per-objective
//! direction strings used on command lines.

#![deny(unsafe_code)]

pub mod minmax;
pub mod reader;
pub mod writer;

pub use minmax::{parse_bitvector, parse_minmax};
pub use reader::{DataSet, read_double_data, read_double_data_from};
pub use writer::{format_g15, write_scalar, write_sets, write_sets_filtered};
