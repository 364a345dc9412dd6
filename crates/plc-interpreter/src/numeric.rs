//! Exact decimal division, exponentiation and plain decimal rendering.

use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use plc_syntax::error::{runtime_error, RuntimeResult};

use crate::config::NegativeExponent;

fn pow10(exponent: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exponent as usize)
}

/// `numerator / denominator` rounded to the nearest integer, ties to even.
fn round_half_even(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.is_zero() {
        return quotient;
    }
    let step = if numerator.is_negative() != denominator.is_negative() {
        -BigInt::one()
    } else {
        BigInt::one()
    };
    let twice = remainder.abs() * 2u32;
    match twice.cmp(&denominator.abs()) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + step,
        Ordering::Equal if (&quotient % 2u32).is_zero() => quotient,
        Ordering::Equal => quotient + step,
    }
}

/// `a / b` rounded half-even to `scale` fractional digits. `b` must be non-zero.
pub fn divide_at_scale(a: &BigDecimal, b: &BigDecimal, scale: i64) -> BigDecimal {
    let (ua, sa) = a.as_bigint_and_exponent();
    let (ub, sb) = b.as_bigint_and_exponent();
    let shift = scale - sa + sb;
    let quotient = if shift >= 0 {
        round_half_even(&(ua * pow10(shift.unsigned_abs())), &ub)
    } else {
        round_half_even(&ua, &(ub * pow10(shift.unsigned_abs())))
    };
    BigDecimal::new(quotient, scale)
}

/// Decimal division at the dividend's scale.
pub fn divide_decimal(a: &BigDecimal, b: &BigDecimal) -> RuntimeResult<BigDecimal> {
    if b.is_zero() {
        return runtime_error("division by zero");
    }
    Ok(divide_at_scale(a, b, a.as_bigint_and_exponent().1))
}

/// Truncating integer division.
pub fn divide_integer(a: &BigInt, b: &BigInt) -> RuntimeResult<BigInt> {
    if b.is_zero() {
        return runtime_error("division by zero");
    }
    Ok(a / b)
}

fn exponent_count(exponent: &BigInt) -> RuntimeResult<u64> {
    match exponent.magnitude().to_u64() {
        Some(n) => Ok(n),
        None => runtime_error(format!("exponent {} is too large", exponent)),
    }
}

pub fn integer_power(
    base: &BigInt,
    exponent: &BigInt,
    negative: NegativeExponent,
) -> RuntimeResult<BigInt> {
    if exponent.is_negative() && negative == NegativeExponent::Reject {
        return runtime_error(format!("negative exponent {} on an Integer", exponent));
    }
    let mut power = BigInt::one();
    for _ in 0..exponent_count(exponent)? {
        power *= base;
    }
    if exponent.is_negative() {
        return divide_integer(&BigInt::one(), &power);
    }
    Ok(power)
}

/// A negative exponent yields the reciprocal at the scale of the positive power.
pub fn decimal_power(base: &BigDecimal, exponent: &BigInt) -> RuntimeResult<BigDecimal> {
    let mut power = BigDecimal::one();
    for _ in 0..exponent_count(exponent)? {
        power = power * base;
    }
    if exponent.is_negative() {
        if power.is_zero() {
            return runtime_error("division by zero");
        }
        let scale = power.as_bigint_and_exponent().1;
        return Ok(divide_at_scale(&BigDecimal::one(), &power, scale));
    }
    Ok(power)
}

/// Plain notation keeping the scale: `1.50`, `-0.25`, `1200`.
pub fn plain_string(d: &BigDecimal) -> String {
    let (digits, scale) = d.as_bigint_and_exponent();
    if scale <= 0 {
        if digits.is_zero() {
            return "0".to_string();
        }
        return format!("{}{}", digits, "0".repeat(scale.unsigned_abs() as usize));
    }
    let scale = scale as usize;
    let magnitude = digits.magnitude().to_string();
    let padded = if magnitude.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - magnitude.len()), magnitude)
    } else {
        magnitude
    };
    let (whole, fraction) = padded.split_at(padded.len() - scale);
    let sign = if digits.is_negative() { "-" } else { "" };
    format!("{}{}.{}", sign, whole, fraction)
}
