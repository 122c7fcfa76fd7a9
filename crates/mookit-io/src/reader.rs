//! Reading multi-set numeric tables.
//!
//! Format: whitespace-separated numeric tokens, one point per line, the
//! same column count everywhere; blank lines (and comment lines starting
//! with `#`) separate sets; both `\n` and `\r\n` terminate lines. A row
//! that ends early, through EOF or a short line, is an error.
//!
//! Reading may be called repeatedly on the same [`DataSet`] to append
//! sets from several files; the column count is fixed by the first row
//! ever read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use mookit_core::error::{Error, Result};

/// The rows of every set read so far, with cumulative set sizes.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    /// Points, row-major.
    pub data: Vec<f64>,
    /// Cumulative row counts, one entry per set, strictly increasing.
    pub cumsizes: Vec<usize>,
    /// Number of objectives (columns).
    pub nobj: usize,
}

impl DataSet {
    pub fn nsets(&self) -> usize {
        self.cumsizes.len()
    }

    pub fn npoints(&self) -> usize {
        *self.cumsizes.last().unwrap_or(&0)
    }

    /// Rows of set `k`.
    pub fn set(&self, k: usize) -> &[f64] {
        let lo = if k == 0 { 0 } else { self.cumsizes[k - 1] };
        let hi = self.cumsizes[k];
        &self.data[lo * self.nobj..hi * self.nobj]
    }

    /// Collapse every set read so far into a single one.
    pub fn merge_sets(&mut self) {
        if let Some(&total) = self.cumsizes.last() {
            self.cumsizes = vec![total];
        }
    }
}

/// Append the sets contained in `path` (stdin when `None`).
pub fn read_double_data(path: Option<&Path>, into: &mut DataSet) -> Result<()> {
    match path {
        Some(p) => {
            let file = File::open(p)?;
            read_double_data_from(BufReader::new(file), &p.display().to_string(), into)
        }
        None => {
            let stdin = std::io::stdin();
            read_double_data_from(stdin.lock(), "<stdin>", into)
        }
    }
}

/// Append the sets read from `input`; `name` labels parse errors.
pub fn read_double_data_from<R: BufRead>(
    input: R,
    name: &str,
    into: &mut DataSet,
) -> Result<()> {
    let mut nrows_this_call = 0usize;
    let mut open_set = false;
    let mut set_rows = if into.cumsizes.is_empty() {
        0
    } else {
        // Appending: continue the cumulative counts.
        *into.cumsizes.last().unwrap()
    };

    let mut lineno = 0usize;
    for line in input.lines() {
        lineno += 1;
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let trimmed = line.trim_start();
        let is_separator = trimmed.is_empty() || trimmed.starts_with('#');
        if is_separator {
            if open_set {
                into.cumsizes.push(set_rows);
                open_set = false;
            }
            continue;
        }

        let mut column = 0usize;
        for token in trimmed.split_whitespace() {
            column += 1;
            let value: f64 = token.parse().map_err(|_| Error::Parse {
                file: name.to_string(),
                line: lineno,
                column,
                detail: format!("could not convert `{token}` to f64"),
            })?;
            into.data.push(value);
        }
        if into.nobj == 0 {
            into.nobj = column;
        } else if column != into.nobj {
            // Roll back the partial row before reporting.
            into.data.truncate(into.data.len() - column);
            let first_row_of_call = nrows_this_call == 0;
            return Err(Error::InputShape(if first_row_of_call {
                format!(
                    "{name}:{lineno}: input has dimension {column} while previous data has dimension {}",
                    into.nobj
                )
            } else {
                format!(
                    "{name}:{lineno}: line has {column} columns, expected {}",
                    into.nobj
                )
            }));
        }
        set_rows += 1;
        nrows_this_call += 1;
        open_set = true;
    }

    if open_set {
        into.cumsizes.push(set_rows);
    }
    if nrows_this_call == 0 {
        return Err(Error::InputShape(format!("{name}: input is empty")));
    }
    Ok(())
}
