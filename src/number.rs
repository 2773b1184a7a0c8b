//! # Numeric literals
//!
//! Grounded on mpc.c's `mpc_int`/`mpc_hex`/`mpc_oct`/`mpc_real`/`mpc_float`,
//! which apply `mpcf_int`/`mpcf_hex`/`mpcf_oct`/`mpcf_float` (thin
//! `strtol`/`strtod` wrappers) over a digit string built by `mpcf_strfold`.
//! Every digit here is converted to its place value as it is matched, and
//! `many1`'s fold accumulates the result directly, so there is no
//! intermediate `String` and no `str::parse`/`unwrap` anywhere in this
//! module.

use crate::combinator::{also, and, many1, or};
use crate::lib::std::vec::Vec;
use crate::parser::{apply, Parser};

fn digit_int() -> Parser<i64> {
    Parser::one_of("0123456789", |c| (c as u8 - b'0') as i64).expect("digit")
}

fn hex_value(c: char) -> i64 {
    match c {
        '0'..='9' => c as i64 - '0' as i64,
        'a'..='f' => c as i64 - 'a' as i64 + 10,
        'A'..='F' => c as i64 - 'A' as i64 + 10,
        _ => unreachable!("hex_digit only matches hex digits"),
    }
}

fn hex_digit_int() -> Parser<i64> {
    Parser::one_of("0123456789ABCDEFabcdef", hex_value).expect("hex digit")
}

fn oct_digit_int() -> Parser<i64> {
    Parser::one_of("01234567", |c| (c as u8 - b'0') as i64).expect("oct digit")
}

fn sign_int() -> Parser<i64> {
    Parser::one_of("+-", |c| if c == '-' { -1 } else { 1 }).maybe(|| 1)
}

/// A (possibly signed) decimal integer, e.g. `"-42"`.
pub fn int() -> Parser<i64> {
    let digits = many1(digit_int(), |acc, d| acc * 10 + d).expect("digits");
    also(sign_int(), digits, |s, d| s * d).expect("integer")
}

/// A (possibly signed) hexadecimal integer, e.g. `"+1F"`.
pub fn hex() -> Parser<i64> {
    let digits = many1(hex_digit_int(), |acc, d| acc * 16 + d).expect("hex digits");
    also(sign_int(), digits, |s, d| s * d).expect("hexadecimal")
}

/// A (possibly signed) octal integer, e.g. `"017"`.
pub fn oct() -> Parser<i64> {
    let digits = many1(oct_digit_int(), |acc, d| acc * 8 + d).expect("oct digits");
    also(sign_int(), digits, |s, d| s * d).expect("octadecimal")
}

/// An integer in any of the three bases above, tried in that order.
pub fn number() -> Parser<i64> {
    or(Vec::from([int(), hex(), oct()])).expect("number")
}

fn digit_f64() -> Parser<f64> {
    Parser::one_of("0123456789", |c| (c as u8 - b'0') as f64).expect("digit")
}

fn frac_digit_pair() -> Parser<(f64, f64)> {
    Parser::one_of("0123456789", |c| ((c as u8 - b'0') as f64, 10.0)).expect("digit")
}

fn frac_digits() -> Parser<(f64, f64)> {
    many1(frac_digit_pair(), |acc, next| (acc.0 * 10.0 + next.0, acc.1 * next.1)).expect("digits")
}

fn sign_f64() -> Parser<f64> {
    Parser::one_of("+-", |c| if c == '-' { -1.0 } else { 1.0 }).maybe(|| 1.0)
}

/// `[+-]?\d+(\.\d+)?([eE][+-]?\d+)?`, folded straight into an `f64`
/// instead of built up as text.
pub fn real() -> Parser<f64> {
    let whole = many1(digit_f64(), |acc, d| acc * 10.0 + d).expect("digits");

    let frac = also(Parser::single('.', |_| (0.0_f64, 1.0_f64)), frac_digits(), |_dot, frac| frac).maybe(|| (0.0, 1.0));
    let frac = apply(frac, |(value, divisor): (f64, f64)| value / divisor);

    let exp_digits = many1(digit_f64(), |acc, d| acc * 10.0 + d).expect("digits");
    let exp_value = also(sign_f64(), exp_digits, |s, d| s * d);
    let exp = also(Parser::one_of("eE", |_| 0.0_f64), exp_value, |_, e| e).maybe(|| 0.0);

    and(Vec::from([sign_f64(), whole, frac, exp]), |parts: Vec<f64>| {
        let (sign, whole, frac, exponent) = (parts[0], parts[1], parts[2], parts[3]);
        sign * (whole + frac) * 10f64.powf(exponent)
    })
    .expect("real")
}

/// Alias for [`real`]: mpc.c keeps `mpc_real`'s text form and applies
/// `mpcf_float` separately, but since [`real`] already produces an `f64`
/// directly there is nothing left for a separate `float` stage to do.
pub fn float() -> Parser<f64> {
    real()
}
