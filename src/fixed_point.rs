use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Fixed-point factor for values crossing the ABI boundary (18 decimals).
pub const SCALE: i64 = 1_000_000_000_000_000_000;

#[derive(Debug, Error, PartialEq)]
pub enum FixedPointError {
    #[error("{0:?} is not a decimal number")]
    Parse(String),

    #[error("{0} does not fit the fixed-point range")]
    Overflow(String),

    #[error("cannot scale non-finite value {0}")]
    NonFinite(f64),
}

fn scale() -> Decimal {
    Decimal::from(SCALE)
}

/// Parses a base-10 number, plain (`-12.5`) or scientific (`1e18`).
pub fn parse_scaled(text: &str) -> Result<Decimal, FixedPointError> {
    let trimmed = text.trim();
    let parsed = if trimmed.contains(|c: char| c == 'e' || c == 'E') {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str(trimmed)
    };
    parsed.map_err(|_| FixedPointError::Parse(text.to_string()))
}

/// Divides by 10^18 in decimal arithmetic.
pub fn descale(value: Decimal) -> Result<Decimal, FixedPointError> {
    value
        .checked_div(scale())
        .ok_or_else(|| FixedPointError::Overflow(value.to_string()))
}

/// Nearest `f64` to the decimal value. Goes through the decimal string since
/// std's float parsing rounds correctly and `Decimal::to_f64` does not.
pub fn to_degrees(value: Decimal) -> Result<f64, FixedPointError> {
    let text = value.to_string();
    text.parse::<f64>().map_err(|_| FixedPointError::Parse(text))
}

/// Multiplies by 10^18 and truncates toward zero.
pub fn rescale_degrees(value: Decimal) -> Result<i128, FixedPointError> {
    let mut scaled = value
        .checked_mul(scale())
        .ok_or_else(|| FixedPointError::Overflow(value.to_string()))?
        .trunc();
    scaled.rescale(0);
    Ok(scaled.mantissa())
}

/// Multiplies the exact binary value of `meters` by 10^18 and truncates toward zero.
///
/// Works on the IEEE-754 decomposition `mantissa * 2^exponent` so no rounding
/// happens after the geodesic step.
pub fn rescale_meters(meters: f64) -> Result<i128, FixedPointError> {
    if !meters.is_finite() {
        return Err(FixedPointError::NonFinite(meters));
    }
    let bits = meters.to_bits();
    let negative = bits >> 63 == 1;
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };

    // mantissa < 2^53 and SCALE < 2^60, so this cannot overflow.
    let scaled = mantissa as u128 * SCALE as u128;
    let magnitude = if exponent >= 0 {
        let shift = exponent as u32;
        if shift >= scaled.leading_zeros() {
            return Err(FixedPointError::Overflow(meters.to_string()));
        }
        scaled << shift
    } else {
        scaled.checked_shr(exponent.unsigned_abs()).unwrap_or(0)
    };

    let magnitude = magnitude as i128;
    Ok(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_scientific() {
        assert_eq!(parse_scaled("100000000000000000").unwrap(), Decimal::from(100_000_000_000_000_000i64));
        assert_eq!(parse_scaled(" -42 ").unwrap(), Decimal::from(-42));
        assert_eq!(parse_scaled("1e17").unwrap(), Decimal::from(100_000_000_000_000_000i64));
        assert_eq!(parse_scaled("2.5").unwrap(), Decimal::new(25, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_scaled("abc"), Err(FixedPointError::Parse("abc".to_string())));
        assert!(parse_scaled("").is_err());
        assert!(parse_scaled("1.2.3").is_err());
    }

    #[test]
    fn descale_is_exact() {
        let lat = parse_scaled("-33868820000000000000").unwrap();
        assert_eq!(descale(lat).unwrap(), Decimal::from_str("-33.86882").unwrap());

        let tiny = descale(Decimal::ONE).unwrap();
        assert_eq!(tiny, Decimal::from_str("0.000000000000000001").unwrap());
    }

    #[test]
    fn to_degrees_rounds_to_nearest() {
        let lat = descale(parse_scaled("-79114766928728294535").unwrap()).unwrap();
        assert_eq!(to_degrees(lat).unwrap(), -79.1147669287283);

        let lat = descale(parse_scaled("33868820000000000001").unwrap()).unwrap();
        assert_eq!(to_degrees(lat).unwrap(), 33.86882);
        assert_eq!(to_degrees(Decimal::ZERO).unwrap(), 0.0);
    }

    #[test]
    fn descale_then_rescale_is_identity() {
        for text in ["0", "1", "-1", "100000000000000000", "-179999999999999999999", "90000000000000000000"] {
            let original = parse_scaled(text).unwrap();
            let back = rescale_degrees(descale(original).unwrap()).unwrap();
            assert_eq!(back, text.parse::<i128>().unwrap());
        }
    }

    #[test]
    fn rescale_degrees_truncates_toward_zero() {
        let value = Decimal::from_str("-0.0000000000000000015").unwrap();
        assert_eq!(rescale_degrees(value).unwrap(), -1);
    }

    #[test]
    fn rescale_meters_exact_values() {
        assert_eq!(rescale_meters(0.0).unwrap(), 0);
        assert_eq!(rescale_meters(1.0).unwrap(), 1_000_000_000_000_000_000);
        assert_eq!(rescale_meters(0.5).unwrap(), 500_000_000_000_000_000);
        assert_eq!(rescale_meters(-2.25).unwrap(), -2_250_000_000_000_000_000);
        assert_eq!(rescale_meters(20_000_000.0).unwrap(), 20_000_000_000_000_000_000_000_000);
    }

    #[test]
    fn rescale_meters_uses_binary_value() {
        // 0.1 is 0.1000000000000000055511151231257827... in binary.
        assert_eq!(rescale_meters(0.1).unwrap(), 100_000_000_000_000_005);
        assert_eq!(rescale_meters(-0.1).unwrap(), -100_000_000_000_000_005);
        assert_eq!(rescale_meters(f64::MIN_POSITIVE).unwrap(), 0);
    }

    #[test]
    fn rescale_meters_rejects_non_finite_and_huge() {
        assert!(matches!(rescale_meters(f64::NAN), Err(FixedPointError::NonFinite(_))));
        assert!(matches!(rescale_meters(f64::INFINITY), Err(FixedPointError::NonFinite(_))));
        assert!(matches!(rescale_meters(1e30), Err(FixedPointError::Overflow(_))));
    }
}
