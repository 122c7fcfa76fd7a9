//! Per-objective direction strings.
//!
//! One character per objective: `-` minimise, `+` maximise, `0` or `i`
//! ignore. A string shorter than the objective count cycles; a longer
//! one raises the objective count.

use mookit_core::error::{Error, Result};
use mookit_core::geometry::Direction;

/// Parse a direction string against an expected objective count.
/// Returns one direction per objective (at least `nobj`, more when the
/// string is longer).
pub fn parse_minmax(s: &str, nobj: usize) -> Result<Vec<Direction>> {
    let mut minmax = Vec::with_capacity(s.len().max(nobj));
    for (i, c) in s.chars().enumerate() {
        minmax.push(match c {
            '+' => Direction::Maximise,
            '-' => Direction::Minimise,
            '0' | 'i' => Direction::Ignore,
            other => {
                return Err(Error::InputDomain(format!(
                    "unexpected character `{other}` at position {i} in direction string `{s}`"
                )));
            }
        });
    }
    if minmax.is_empty() {
        return Err(Error::InputDomain("empty direction string".into()));
    }
    if minmax.iter().all(|&d| d == Direction::Ignore) {
        return Err(Error::InputDomain(format!(
            "all objectives ignored by direction string `{s}`"
        )));
    }
    // Cycle a short string over the remaining objectives.
    let len = minmax.len();
    for i in len..nobj {
        minmax.push(minmax[i % len]);
    }
    Ok(minmax)
}

/// Parse a 0/1 string into a boolean mask, e.g. a maximise mask.
pub fn parse_bitvector(s: &str) -> Result<Vec<bool>> {
    s.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(Error::InputDomain(format!(
                "unexpected character `{other}` in bit vector `{s}`"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn parses_each_kind() {
        assert_eq!(
            parse_minmax("-+0i", 4).unwrap(),
            vec![Minimise, Maximise, Ignore, Ignore]
        );
    }

    #[test]
    fn short_strings_cycle() {
        assert_eq!(
            parse_minmax("-+", 5).unwrap(),
            vec![Minimise, Maximise, Minimise, Maximise, Minimise]
        );
    }

    #[test]
    fn all_ignored_is_rejected() {
        assert!(parse_minmax("00", 2).is_err());
    }

    #[test]
    fn junk_is_rejected() {
        assert!(parse_minmax("-x", 2).is_err());
        assert!(parse_bitvector("012").is_err());
    }

    #[test]
    fn bitvector_roundtrip() {
        assert_eq!(parse_bitvector("0110").unwrap(), vec![false, true, true, false]);
    }
}
