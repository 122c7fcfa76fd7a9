//! CLI entrypoint for the mookit conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use mookit_harness::fixtures::{FixtureCase, FixtureSet};
use mookit_harness::runner::{CaseResult, capture_case, verify_case};
use mookit_harness::structured_log::{LogEmitter, LogEntry, validate_log_line};
use mookit_io::reader::{DataSet, read_double_data};

/// Conformance tooling for mookit.
#[derive(Debug, Parser)]
#[command(name = "mookit-harness")]
#[command(about = "Conformance fixtures and verification for mookit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute indicator values for a data file and save them as a
    /// fixture.
    Capture {
        /// Input data file (multi-set numeric table).
        input: PathBuf,
        /// Output fixture JSON path.
        #[arg(long)]
        output: PathBuf,
        /// Fixture family name.
        #[arg(long, default_value = "indicators")]
        family: String,
        /// Reference point coordinates, e.g. "10 10".
        #[arg(long)]
        reference: String,
        /// Optional reference set file; defaults to the non-dominated
        /// union of the input sets.
        #[arg(long)]
        reference_set: Option<PathBuf>,
        /// Per-objective maximisation mask, e.g. "01".
        #[arg(long)]
        maximise: Option<String>,
    },
    /// Verify a fixture file against freshly computed values.
    Verify {
        /// Fixture JSON path.
        fixture: PathBuf,
        /// Structured JSONL log output (stdout when omitted).
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Summarise a structured JSONL log.
    Report {
        /// Structured JSONL log path.
        log: PathBuf,
    },
}

fn parse_point(s: &str) -> Result<Vec<f64>, String> {
    s.split_whitespace()
        .map(|t| t.parse::<f64>().map_err(|e| format!("`{t}`: {e}")))
        .collect()
}

fn run() -> Result<bool, String> {
    let cli = Cli::parse();
    match cli.command {
        Command::Capture {
            input,
            output,
            family,
            reference,
            reference_set,
            maximise,
        } => {
            let mut ds = DataSet::default();
            read_double_data(Some(&input), &mut ds).map_err(|e| e.to_string())?;
            let reference_point = parse_point(&reference)?;
            if reference_point.len() != ds.nobj {
                return Err(format!(
                    "reference point has {} coordinates, data has {}",
                    reference_point.len(),
                    ds.nobj
                ));
            }
            let maximise = match maximise {
                Some(m) => mookit_io::parse_bitvector(&m).map_err(|e| e.to_string())?,
                None => Vec::new(),
            };
            let reference_set = match reference_set {
                Some(path) => {
                    let mut rs = DataSet::default();
                    read_double_data(Some(&path), &mut rs).map_err(|e| e.to_string())?;
                    if rs.nobj != ds.nobj {
                        return Err(format!(
                            "reference set has {} objectives, data has {}",
                            rs.nobj, ds.nobj
                        ));
                    }
                    rs.data
                }
                None => {
                    let minmax = if maximise.is_empty() {
                        mookit_core::geometry::minimise_all(ds.nobj)
                    } else {
                        mookit_core::geometry::from_maximise_mask(&maximise)
                    };
                    mookit_core::ndfilter::get_nondominated_set(&ds.data, ds.nobj, &minmax)
                }
            };

            let mut case = FixtureCase {
                name: input.display().to_string(),
                nobj: ds.nobj,
                data: ds.data,
                cumsizes: ds.cumsizes,
                reference_point,
                reference_set,
                maximise,
                expected: Default::default(),
            };
            case.expected = capture_case(&case);
            let set = FixtureSet {
                family,
                cases: vec![case],
            };
            set.save(&output).map_err(|e| e.to_string())?;
            Ok(true)
        }
        Command::Verify { fixture, log } => {
            let set = FixtureSet::load(&fixture).map_err(|e| e.to_string())?;
            let mut emitter = match log {
                Some(path) => LogEmitter::to_file(&path).map_err(|e| e.to_string())?,
                None => LogEmitter::to_stdout(),
            };
            let mut all_pass = true;
            for case in &set.cases {
                let res = verify_case(case);
                let entry = match res.result {
                    CaseResult::Pass => LogEntry::pass(&set.family, &res.name),
                    CaseResult::Fail {
                        ref indicator,
                        expected,
                        actual,
                    } => {
                        all_pass = false;
                        LogEntry::fail(&set.family, &res.name, indicator, expected, actual)
                    }
                };
                emitter.emit(&entry).map_err(|e| e.to_string())?;
            }
            emitter.flush().map_err(|e| e.to_string())?;
            Ok(all_pass)
        }
        Command::Report { log } => {
            let text = std::fs::read_to_string(&log).map_err(|e| e.to_string())?;
            let mut pass = 0usize;
            let mut fail = 0usize;
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                let entry = validate_log_line(line).map_err(|e| e.to_string())?;
                match entry.outcome {
                    mookit_harness::structured_log::Outcome::Pass => pass += 1,
                    _ => {
                        fail += 1;
                        println!(
                            "FAIL {}/{}: {} expected {:?} got {:?}",
                            entry.family,
                            entry.case,
                            entry.indicator.as_deref().unwrap_or("?"),
                            entry.expected,
                            entry.actual
                        );
                    }
                }
            }
            println!("{pass} passed, {fail} failed");
            Ok(fail == 0)
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(msg) => {
            eprintln!("mookit-harness: error: {msg}");
            ExitCode::FAILURE
        }
    }
}
