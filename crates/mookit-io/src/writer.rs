//! Writing point sets and indicator values.
//!
//! Points print with 15 significant digits in the shortest of fixed or
//! scientific form, space-separated, one point per line, one blank line
//! between sets. Indicator scalars print one per line in the same
//! numeric format.

use std::io::Write;

use mookit_core::error::Result;

/// Format `x` with 15 significant digits the way `%.15g` does: decimal
/// inside the exponent range [-4, 15), scientific outside, trailing
/// zeros trimmed.
pub fn format_g15(x: f64) -> String {
    format_g(x, 15)
}

fn format_g(x: f64, prec: usize) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if !x.is_finite() {
        return format!("{x}");
    }
    // The scientific rendering settles the decimal exponent, rounding
    // included (9.9999…e2 becomes 1e3).
    let sci = format!("{:.*e}", prec - 1, x);
    let (mantissa, exp) = sci.split_once('e').expect("scientific format");
    let exp: i32 = exp.parse().expect("exponent");
    if exp < -4 || exp >= prec as i32 {
        format!("{}e{:+03}", trim_zeros(mantissa), exp)
    } else {
        let decimals = (prec as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{x:.decimals$}"))
    }
}

fn trim_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// Write every set, blank-line separated.
pub fn write_sets<W: Write>(
    out: &mut W,
    data: &[f64],
    nobj: usize,
    cumsizes: &[usize],
) -> Result<()> {
    write_sets_impl(out, data, nobj, cumsizes, None)
}

/// Write only the rows whose flag is set, keeping the set structure.
pub fn write_sets_filtered<W: Write>(
    out: &mut W,
    data: &[f64],
    nobj: usize,
    cumsizes: &[usize],
    keep: &[bool],
) -> Result<()> {
    write_sets_impl(out, data, nobj, cumsizes, Some(keep))
}

fn write_sets_impl<W: Write>(
    out: &mut W,
    data: &[f64],
    nobj: usize,
    cumsizes: &[usize],
    keep: Option<&[bool]>,
) -> Result<()> {
    let mut row = 0usize;
    for (k, &hi) in cumsizes.iter().enumerate() {
        if k > 0 {
            writeln!(out)?;
        }
        while row < hi {
            if keep.is_none_or(|flags| flags[row]) {
                let cells: Vec<String> = data[row * nobj..(row + 1) * nobj]
                    .iter()
                    .map(|&v| format_g15(v))
                    .collect();
                writeln!(out, "{}", cells.join(" "))?;
            }
            row += 1;
        }
    }
    Ok(())
}

/// Write one indicator value on its own line.
pub fn write_scalar<W: Write>(out: &mut W, value: f64) -> Result<()> {
    writeln!(out, "{}", format_g15(value))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn g_format_matches_printf() {
        assert_eq!(format_g15(0.0), "0");
        assert_eq!(format_g15(1.0), "1");
        assert_eq!(format_g15(-1.5), "-1.5");
        assert_eq!(format_g15(100.0), "100");
        assert_eq!(format_g15(0.1), "0.1");
        assert_eq!(format_g15(1e-5), "1e-05");
        assert_eq!(format_g15(1e16), "1e+16");
        assert_eq!(format_g15(123456789012345.0), "123456789012345");
        assert_eq!(format_g15(1.0 / 3.0), "0.333333333333333");
    }

    #[test]
    fn fifteen_digit_round_trip() {
        for &x in &[1.23456789012345e-7, 987654.321098765, -42.4242424242424] {
            let back: f64 = format_g15(x).parse().unwrap();
            assert!(((back - x) / x).abs() < 1e-14, "{x} vs {back}");
        }
    }

    #[test]
    fn sets_are_blank_separated() {
        let mut buf = Vec::new();
        write_sets(&mut buf, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, &[2, 3]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "1 2\n3 4\n\n5 6\n");
    }

    #[test]
    fn filtered_rows_are_skipped() {
        let mut buf = Vec::new();
        write_sets_filtered(
            &mut buf,
            &[1.0, 2.0, 3.0, 4.0],
            2,
            &[2],
            &[false, true],
        )
        .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "3 4\n");
    }

    #[test]
    fn scalars_one_per_line() {
        let mut buf = Vec::new();
        write_scalar(&mut buf, 11.0).unwrap();
        write_scalar(&mut buf, 0.5).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "11\n0.5\n");
    }
}
