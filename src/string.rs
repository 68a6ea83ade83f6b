//! This module contains the conversion of numbers to decimal strings, and the
//! parsing of the text that users type in.

extern crate alloc;

use super::bigint::BigInt;
use super::codec::FloatComponents;
use super::format::DOUBLE;
use super::utils::mask;
use alloc::string::String;
use core::fmt::Display;

/// Convert the finite non-zero `value` into a large integer, and the number of
/// decimal digits that follow the decimal point.
fn convert_to_integer(value: f64) -> (BigInt, usize) {
    let bits = value.to_bits();
    let biased_exp =
        (bits >> DOUBLE.mantissa_bits) & DOUBLE.max_biased_exponent();
    let mut mantissa = bits & mask(DOUBLE.mantissa_bits);

    // Find `exp` such that value == mantissa * 2^exp.
    let mut exp = if biased_exp == 0 {
        1 - DOUBLE.bias
    } else {
        mantissa |= 1 << DOUBLE.mantissa_bits;
        biased_exp as i64 - DOUBLE.bias
    };
    exp -= DOUBLE.mantissa_bits as i64;

    // Trailing zero bits only produce trailing decimal zeros.
    let tz = mantissa.trailing_zeros();
    mantissa >>= tz;
    exp += tz as i64;

    let mut integer = BigInt::from_u64(mantissa);
    if exp >= 0 {
        // The number is already an integer, just align it.
        integer.shift_left(exp as usize);
        return (integer, 0);
    }

    // The number is not yet an integer, we need to convert it using
    // the method:
    // mmmmm * 5^(e) * 10 ^(-e) == mmmmm * 10 ^ (-e);
    // where (5^e) * (10^-e) == (2^-e)
    // And the left hand side is how we represent our binary number
    // m * 2^-e, and the right-hand-side is how we represent
    // our decimal number: nnnnnnn * 10^-e.
    integer.inplace_mul_pow5((-exp) as u64);
    (integer, (-exp) as usize)
}

fn convert_normal_to_string(value: f64) -> String {
    let (integer, frac_digits) = convert_to_integer(value);
    let mut digits = integer.as_decimal();
    if frac_digits == 0 {
        return digits;
    }

    // Make room for a leading zero before the point.
    if digits.len() <= frac_digits {
        let pad = frac_digits + 1 - digits.len();
        let mut padded = "0".repeat(pad);
        padded.push_str(&digits);
        digits = padded;
    }
    digits.insert(digits.len() - frac_digits, '.');

    let trimmed = digits.trim_end_matches('0').trim_end_matches('.');
    String::from(trimmed)
}

/// Renders `value` as a decimal string without an exponent, showing every
/// digit of the stored binary number. Negative zero renders as "-0.0", and
/// the special values as "NaN", "Infinity" and "-Infinity".
pub fn format_decimal(value: f64) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return if value > 0.0 {
            String::from("Infinity")
        } else {
            String::from("-Infinity")
        };
    }
    if value == 0.0 {
        return if value.is_sign_negative() {
            String::from("-0.0")
        } else {
            String::from("0")
        };
    }

    let mut result = String::new();
    if value.is_sign_negative() {
        result.push('-');
    }
    result.push_str(&convert_normal_to_string(value));
    result
}

impl Display for FloatComponents {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} {} (0x{}) = {}",
            self.sign,
            self.exponent,
            self.mantissa,
            self.hex,
            format_decimal(self.value)
        )
    }
}

/// The reasons for rejecting the text in the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("the input provided was empty")]
    InputEmpty,
    #[error("the input is not a decimal number")]
    InvalidNumber,
}

/// Parses the text of the input field. Accepts decimal literals (with an
/// optional sign, fraction and exponent) and the case-insensitive tokens
/// "NaN", "Infinity" and "-Infinity". Text that only starts with a number,
/// such as "2.5e" or "12px", is rejected as a whole instead of being cut
/// down to its numeric prefix.
pub fn parse_input(text: &str) -> Result<f64, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::InputEmpty);
    }

    for (token, value) in [
        ("nan", f64::NAN),
        ("infinity", f64::INFINITY),
        ("+infinity", f64::INFINITY),
        ("-infinity", f64::NEG_INFINITY),
    ] {
        if text.eq_ignore_ascii_case(token) {
            return Ok(value);
        }
    }

    // The float parser in core also accepts "inf" and "nan" spellings, so
    // filter out everything that is not a plain decimal literal first.
    let is_literal_char = |c: char| {
        c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
    };
    if !text.chars().all(is_literal_char) {
        return Err(ParseError::InvalidNumber);
    }
    text.parse::<f64>().map_err(|_| ParseError::InvalidNumber)
}

#[cfg(test)]
use alloc::format;

#[test]
fn test_format_special_values() {
    assert_eq!(format_decimal(f64::NAN), "NaN");
    assert_eq!(format_decimal(-f64::NAN), "NaN");
    assert_eq!(format_decimal(f64::INFINITY), "Infinity");
    assert_eq!(format_decimal(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(format_decimal(-0.0), "-0.0");
    assert_eq!(format_decimal(0.0), "0");
}

#[test]
fn test_format_decimal() {
    assert_eq!(format_decimal(1.0), "1");
    assert_eq!(format_decimal(-2.5), "-2.5");
    assert_eq!(format_decimal(100.0), "100");
    assert_eq!(format_decimal(0.5), "0.5");
    assert_eq!(
        format_decimal(0.1),
        "0.1000000000000000055511151231257827021181583404541015625"
    );
    assert_eq!(format_decimal(65504.0), "65504");
    assert_eq!(format_decimal((1u64 << 51) as f64), "2251799813685248");
    assert_eq!(format_decimal(1e21), "1000000000000000000000");
    assert_eq!(format_decimal(0.000244140625), "0.000244140625");
    assert_eq!(format_decimal(-1234.375), "-1234.375");
}

#[test]
fn test_format_single_precision_tenth() {
    use crate::codec::components;
    use crate::Precision;
    let stored = components(0.1, Precision::Single).value;
    let text = format_decimal(stored);
    assert!(text.starts_with("0.100000001"), "{}", text);
    assert_eq!(text, "0.100000001490116119384765625");

    let stored = components(0.1, Precision::Half).value;
    assert_eq!(format_decimal(stored), "0.0999755859375");
}

#[test]
fn test_format_extremes() {
    // The smallest subnormal has 1074 digits after the point.
    let tiny = format_decimal(5e-324);
    assert!(tiny.starts_with("0.000"));
    assert!(tiny.ends_with("625"));
    assert_eq!(tiny.len(), 2 + 1074);
    let digits = tiny.trim_start_matches("0.").trim_start_matches('0');
    assert_eq!(digits.len(), 751);

    let max = format_decimal(f64::MAX);
    assert_eq!(max.len(), 309);
    assert!(max.starts_with("17976931348623157"));
    let min = format_decimal(f64::MIN);
    assert_eq!(min, format!("-{}", max));
}

#[test]
fn test_format_has_no_exponent() {
    use crate::utils::{self, Lfsr};
    let mut lfsr = Lfsr::new();
    let values = (0..500).map(|_| f64::from_bits(lfsr.get64()));
    for v in values.chain(utils::get_special_test_values()) {
        if !v.is_finite() {
            continue;
        }
        let text = format_decimal(v);
        assert!(!text.contains('e') && !text.contains('E'), "{}", text);
        // The expansion is exact, so parsing it back gives the same number.
        let parsed: f64 = text.parse().unwrap();
        assert_eq!(parsed.to_bits(), v.to_bits(), "{}", text);
    }
}

#[test]
fn test_display_components() {
    use crate::codec::components;
    use crate::Precision;
    let c = components(-1.5, Precision::Half);
    assert_eq!(format!("{}", c), "1 01111 1000000000 (0xBE00) = -1.5");
}

#[test]
fn test_parse_input() {
    assert_eq!(parse_input("0.1"), Ok(0.1));
    assert_eq!(parse_input("  42 "), Ok(42.0));
    assert_eq!(parse_input("-3.5e2"), Ok(-350.0));
    assert_eq!(parse_input("1E-3"), Ok(0.001));
    assert_eq!(parse_input(".5"), Ok(0.5));
    assert_eq!(parse_input("+7"), Ok(7.0));
    assert_eq!(parse_input("Infinity"), Ok(f64::INFINITY));
    assert_eq!(parse_input("-INFINITY"), Ok(f64::NEG_INFINITY));
    assert!(parse_input("nAn").unwrap().is_nan());
    assert!(parse_input("-0").unwrap().is_sign_negative());

    assert_eq!(parse_input(""), Err(ParseError::InputEmpty));
    assert_eq!(parse_input("   "), Err(ParseError::InputEmpty));
    assert_eq!(parse_input("inf"), Err(ParseError::InvalidNumber));
    assert_eq!(parse_input("-nan"), Err(ParseError::InvalidNumber));
    assert_eq!(parse_input("abc"), Err(ParseError::InvalidNumber));
    assert_eq!(parse_input("1.5abc"), Err(ParseError::InvalidNumber));
    assert_eq!(parse_input("-"), Err(ParseError::InvalidNumber));
    assert_eq!(parse_input("1e"), Err(ParseError::InvalidNumber));
    assert_eq!(parse_input("1.2.3"), Err(ParseError::InvalidNumber));
    // Numeric prefixes are not accepted.
    assert_eq!(parse_input("2.5e"), Err(ParseError::InvalidNumber));
    assert_eq!(parse_input("12px"), Err(ParseError::InvalidNumber));
    assert_eq!(parse_input("7 8"), Err(ParseError::InvalidNumber));
}
