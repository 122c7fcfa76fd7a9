//! Integer powers of `f64`.
//!
//! The distance kernels and the hypervolume approximators raise small
//! non-negative integers as exponents in tight loops; `f64::powf` is too
//! slow there and `f64::powi` takes an `i32`. Exponents up to 32 unroll
//! into explicit multiplication chains, larger ones fall back to
//! square-and-multiply.

/// `base^exp` for `exp <= 32` as a fixed multiplication chain.
#[inline]
pub fn pow_uint_max32(base: f64, exp: u32) -> f64 {
    debug_assert!(exp <= 32);
    match exp {
        0 => 1.0,
        1 => base,
        2 => base * base,
        3 => base * base * base,
        _ => {
            let half = pow_uint_max32(base, exp / 2);
            if exp % 2 == 0 {
                half * half
            } else {
                half * half * base
            }
        }
    }
}

/// `base^exp` for arbitrary unsigned exponents.
#[inline]
pub fn pow_uint(base: f64, exp: u32) -> f64 {
    if exp <= 32 {
        return pow_uint_max32(base, exp);
    }
    let mut result = if exp & 1 == 1 { base } else { 1.0 };
    let mut exp = exp >> 1;
    let mut base = base;
    while exp > 0 {
        base *= base;
        if exp & 1 == 1 {
            result *= base;
        }
        exp >>= 1;
    }
    result
}
