//! Conformance testing harness for mookit.
//!
//! This crate provides:
//! - Fixture capture: record indicator values for input data as JSON
//!   reference files
//! - Fixture verify: recompute the indicators and compare against the
//!   captured values with ULP-aware tolerances
//! - Structured logging: JSONL records for test and verification
//!   workflows

#![forbid(unsafe_code)]

pub mod fixtures;
pub mod runner;
pub mod structured_log;

pub use fixtures::{FixtureCase, FixtureSet};
pub use runner::{CaseResult, VerificationResult, capture_case, verify_case};
pub use structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
