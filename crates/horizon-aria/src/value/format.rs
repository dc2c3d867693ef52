//! Shortest general-form number printing.
//!
//! Numbers print with six significant digits and no trailing zeros. Values
//! whose decimal exponent is below -4 or at least 6 switch to exponent form
//! with a signed two-digit exponent (`1e+06`, `2.5e-07`).

use std::fmt;

const SIGNIFICANT_DIGITS: i32 = 6;

pub(crate) fn write_general(out: &mut impl fmt::Write, value: f64) -> fmt::Result {
    if value.is_nan() {
        return out.write_str("nan");
    }
    if value.is_infinite() {
        return out.write_str(if value < 0.0 { "-inf" } else { "inf" });
    }
    if value == 0.0 {
        return out.write_str(if value.is_sign_negative() { "-0" } else { "0" });
    }

    // Round to the significant digits first; the exponent of the rounded
    // value decides the notation.
    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return out.write_str(&scientific);
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(out, "{}e{sign}{:02}", strip_zeros(mantissa), exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        let fixed = format!("{value:.decimals$}");
        out.write_str(strip_zeros(&fixed))
    }
}

fn strip_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
