//! Conversion between native numbers and the raw bit patterns of the supported
//! formats, and the decomposition of a pattern into its fields.

use super::error::Error;
use super::format::{Precision, PrecisionFormat, DOUBLE, SINGLE};
use super::half;
use super::utils::{exp2i, mask};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Declare the different categories of floating point numbers. The category
/// is derived from the exponent field, and then from the mantissa field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Zero,
    Subnormal,
    Normal,
    Infinity,
    NaN,
}

impl Category {
    pub fn as_string(&self) -> &str {
        match self {
            Category::Zero => "Zero",
            Category::Subnormal => "Subnormal",
            Category::Normal => "Normal",
            Category::Infinity => "Infinity",
            Category::NaN => "NaN",
        }
    }
}

/// The raw storage bits of one value under one format. The bits above the
/// width of the format are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitPattern {
    bits: u64,
    precision: Precision,
}

impl BitPattern {
    /// Wraps `bits` as a pattern of `precision`. Bits that don't fit in the
    /// format are discarded.
    pub fn new(bits: u64, precision: Precision) -> Self {
        BitPattern {
            bits: bits & precision.format().pattern_mask(),
            precision,
        }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn format(&self) -> &'static PrecisionFormat {
        self.precision.format()
    }

    /// Returns the sign bit. True means negative.
    pub fn sign(&self) -> bool {
        self.bits & self.format().sign_mask() != 0
    }

    /// Returns the stored (biased) exponent field.
    pub fn biased_exponent(&self) -> u64 {
        let sem = self.format();
        (self.bits >> sem.mantissa_bits) & mask(sem.exponent_bits)
    }

    /// Returns the stored mantissa field, without the implicit bit.
    pub fn mantissa(&self) -> u64 {
        self.bits & self.format().mantissa_mask()
    }

    /// Returns the pattern without the sign bit.
    pub fn magnitude(&self) -> u64 {
        self.bits & !self.format().sign_mask()
    }

    pub fn category(&self) -> Category {
        let max_exp = self.format().max_biased_exponent();
        match (self.biased_exponent(), self.mantissa()) {
            (0, 0) => Category::Zero,
            (0, _) => Category::Subnormal,
            (e, 0) if e == max_exp => Category::Infinity,
            (e, _) if e == max_exp => Category::NaN,
            _ => Category::Normal,
        }
    }

    /// Returns the bit at `index`, counting from the sign bit (index zero).
    pub fn bit(&self, index: usize) -> Option<bool> {
        let width = self.format().total_bits;
        if index >= width {
            return None;
        }
        Some((self.bits >> (width - 1 - index)) & 1 == 1)
    }

    /// Returns a copy of this pattern where the bit at `index` (zero is the
    /// sign bit) is inverted.
    pub fn with_bit_flipped(&self, index: usize) -> Result<Self, Error> {
        let width = self.format().total_bits;
        if index >= width {
            return Err(Error::InvalidBitIndex { index, width });
        }
        Ok(BitPattern::new(
            self.bits ^ (1u64 << (width - 1 - index)),
            self.precision,
        ))
    }

    /// Renders the pattern as a string of '0' and '1', most significant bit
    /// first, padded to the width of the format.
    pub fn to_binary_string(&self) -> String {
        format!("{:0width$b}", self.bits, width = self.format().total_bits)
    }

    /// Renders the pattern as upper-case hex digits, one per nibble.
    pub fn to_hex_string(&self) -> String {
        let width = self.format().total_bits / 4;
        format!("{:0width$X}", self.bits)
    }

    /// Returns the bytes of the pattern in big-endian order.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let len = self.format().total_bits / 8;
        self.bits.to_be_bytes()[8 - len..].to_vec()
    }

    /// Returns the number that this pattern stores.
    pub fn decode(&self) -> f64 {
        decode(*self)
    }
}

impl fmt::Display for BitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("0x{}", self.to_hex_string()))
    }
}

/// Returns the bit pattern that `precision` uses to store `value`. Values that
/// are not representable are rounded to the nearest value, ties to even.
pub fn encode(value: f64, precision: Precision) -> BitPattern {
    let bits = match precision {
        Precision::Half => half::encode16(value) as u64,
        Precision::Single => encode32(value) as u64,
        Precision::Double => value.to_bits(),
    };
    BitPattern::new(bits, precision)
}

/// Returns the number that `pattern` stores, widened (exactly) to f64.
pub fn decode(pattern: BitPattern) -> f64 {
    match pattern.precision() {
        Precision::Half => half::decode16(pattern.bits() as u16),
        Precision::Single => decode32(pattern.bits() as u32),
        Precision::Double => f64::from_bits(pattern.bits()),
    }
}

/// Convert `value` to the binary32 pattern. NaNs keep their sign and the top
/// of their payload; if nothing survives, the quiet bit is set so that the
/// pattern does not turn into an infinity.
pub(crate) fn encode32(value: f64) -> u32 {
    if !value.is_nan() {
        // Rust defines 'as' casts to round to the nearest, ties to even.
        return (value as f32).to_bits();
    }
    let bits = value.to_bits();
    let shift = DOUBLE.mantissa_bits - SINGLE.mantissa_bits;
    let sign = (bits >> 63) << 31;
    let mut payload = (bits >> shift) & SINGLE.mantissa_mask();
    if payload == 0 {
        payload = SINGLE.quiet_nan_pattern() & SINGLE.mantissa_mask();
    }
    (sign | SINGLE.exponent_mask() | payload) as u32
}

/// Widen the binary32 pattern `bits` to f64. NaN payloads are moved into the
/// top of the wider mantissa unchanged.
pub(crate) fn decode32(bits: u32) -> f64 {
    let value = f32::from_bits(bits);
    if !value.is_nan() {
        return value as f64;
    }
    let bits = bits as u64;
    let shift = DOUBLE.mantissa_bits - SINGLE.mantissa_bits;
    let sign = (bits >> 31) << 63;
    let payload = (bits & SINGLE.mantissa_mask()) << shift;
    f64::from_bits(sign | DOUBLE.exponent_mask() | payload)
}

/// A view of one pattern, split into the sign, exponent and mantissa fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatComponents {
    /// The sign bit, as "0" or "1".
    pub sign: String,
    /// The exponent field, most significant bit first.
    pub exponent: String,
    /// The mantissa field, most significant bit first.
    pub mantissa: String,
    /// The concatenation of the sign, exponent and mantissa fields.
    pub full_binary: String,
    /// The pattern in upper-case hex digits.
    pub hex: String,
    /// The number that the format actually stores.
    pub value: f64,
    /// The pattern that the fields were sliced from.
    pub pattern: BitPattern,
}

/// The numeric breakdown of a finite value:
/// (-1)^sign * significand * 2^effective_exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconstruction {
    pub sign: bool,
    /// The stored exponent field.
    pub raw_exponent: u64,
    pub bias: i64,
    /// The stored exponent minus the bias.
    pub unbiased_exponent: i64,
    /// The exponent that scales the significand. Subnormals use 1 - bias.
    pub effective_exponent: i64,
    /// 1.mmmm for normal numbers, and 0.mmmm for zeros and subnormals.
    pub significand: f64,
    pub is_subnormal: bool,
}

impl FloatComponents {
    pub fn from_pattern(pattern: BitPattern) -> Self {
        let sem = pattern.format();
        let full_binary = pattern.to_binary_string();
        let exp_end = 1 + sem.exponent_bits;
        FloatComponents {
            sign: String::from(&full_binary[..1]),
            exponent: String::from(&full_binary[1..exp_end]),
            mantissa: String::from(&full_binary[exp_end..]),
            hex: pattern.to_hex_string(),
            value: decode(pattern),
            full_binary,
            pattern,
        }
    }

    pub fn category(&self) -> Category {
        self.pattern.category()
    }

    /// Explain how the fields produce the stored value. Returns None for
    /// infinities and NaNs, which are not scaled numbers.
    pub fn reconstruction(&self) -> Option<Reconstruction> {
        let p = &self.pattern;
        let sem = p.format();
        let raw_exponent = p.biased_exponent();
        let unbiased_exponent = raw_exponent as i64 - sem.bias;
        let fraction = p.mantissa() as f64 * exp2i(-(sem.mantissa_bits as i32));

        match p.category() {
            Category::Infinity | Category::NaN => None,
            Category::Zero | Category::Subnormal => Some(Reconstruction {
                sign: p.sign(),
                raw_exponent,
                bias: sem.bias,
                unbiased_exponent,
                effective_exponent: 1 - sem.bias,
                significand: fraction,
                is_subnormal: true,
            }),
            Category::Normal => Some(Reconstruction {
                sign: p.sign(),
                raw_exponent,
                bias: sem.bias,
                unbiased_exponent,
                effective_exponent: unbiased_exponent,
                significand: 1.0 + fraction,
                is_subnormal: false,
            }),
        }
    }
}

/// Encode `value` with `precision` and split the pattern into its fields.
pub fn components(value: f64, precision: Precision) -> FloatComponents {
    FloatComponents::from_pattern(encode(value, precision))
}

#[cfg(test)]
fn same_bits(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}

#[test]
fn test_encode_known_patterns() {
    assert_eq!(encode(0.1, Precision::Single).bits(), 0x3dcc_cccd);
    assert_eq!(encode(1.0, Precision::Single).bits(), 0x3f80_0000);
    assert_eq!(encode(-2.0, Precision::Single).bits(), 0xc000_0000);
    assert_eq!(encode(1.0, Precision::Half).bits(), 0x3c00);
    assert_eq!(encode(0.1, Precision::Double).bits(), 0x3fb9_9999_9999_999a);
    assert_eq!(encode(-0.0, Precision::Double).bits(), 1 << 63);
    assert_eq!(encode(-0.0, Precision::Single).bits(), 0x8000_0000);
    assert_eq!(encode(-0.0, Precision::Half).bits(), 0x8000);
    assert_eq!(encode(f64::INFINITY, Precision::Single).bits(), 0x7f80_0000);
    assert_eq!(encode(f64::NEG_INFINITY, Precision::Half).bits(), 0xfc00);
    assert_eq!(encode(f64::NAN, Precision::Single).bits(), 0x7fc0_0000);
    assert_eq!(encode(f64::NAN, Precision::Half).bits(), 0x7e00);
}

#[test]
fn test_decode_tenth() {
    let p = encode(0.1, Precision::Single);
    let v = decode(p);
    assert_eq!(v, 0.10000000149011612);
    assert_ne!(v, 0.1);
    // Flipping the sign bit negates the stored value.
    let neg = decode(p.with_bit_flipped(0).unwrap());
    assert_eq!(neg, -0.10000000149011612);
}

#[test]
fn test_negative_zero() {
    for p in Precision::ALL {
        let pattern = BitPattern::new(p.format().sign_mask(), p);
        let v = decode(pattern);
        assert_eq!(v, 0.0);
        assert!(v.is_sign_negative());
        assert!(!same_bits(v, 0.0));
        assert_eq!(pattern.category(), Category::Zero);
    }
}

#[test]
fn test_round_trip_special_values() {
    use super::utils;
    for p in Precision::ALL {
        for v in utils::get_special_test_values() {
            let first = encode(v, p);
            let stored = decode(first);
            let second = encode(stored, p);
            assert_eq!(first, second, "{} {}", v, p);
            assert_eq!(v.is_nan(), stored.is_nan());
            assert!(stored.is_nan() || same_bits(decode(second), stored));
            if !v.is_nan() {
                assert_eq!(v.is_sign_negative(), stored.is_sign_negative());
            }
        }
    }
}

#[test]
fn test_single_matches_hardware() {
    use super::utils::Lfsr;
    let mut lfsr = Lfsr::new();
    for _ in 0..5000 {
        let v = f64::from_bits(lfsr.get64());
        if v.is_nan() {
            continue;
        }
        let bits = encode(v, Precision::Single).bits() as u32;
        assert_eq!(bits, (v as f32).to_bits());
        assert!(same_bits(decode32(bits), f32::from_bits(bits) as f64));
    }
}

#[test]
fn test_nan_payload_never_becomes_infinity() {
    // A double NaN that only has payload in the low bits.
    let low_nan = f64::from_bits(0x7ff0_0000_0000_0001);
    assert!(low_nan.is_nan());
    let p = encode(low_nan, Precision::Single);
    assert_eq!(p.category(), Category::NaN);
    assert_eq!(p.bits(), 0x7fc0_0000);

    let neg_nan = f64::from_bits(0xfff8_0000_2000_0000);
    let p = encode(neg_nan, Precision::Single);
    assert_eq!(p.bits(), 0xffc0_0001);
    assert!(same_bits(decode(p), neg_nan));

    // Signaling NaNs stay signaling through the single path.
    let snan = BitPattern::new(0x7f80_0001, Precision::Single);
    let v = decode(snan);
    assert!(v.is_nan());
    assert_eq!(encode(v, Precision::Single), snan);
}

#[test]
fn test_categories() {
    let cat = |v: f64, p: Precision| encode(v, p).category();
    assert_eq!(cat(0.0, Precision::Half), Category::Zero);
    assert_eq!(cat(1e-6, Precision::Half), Category::Subnormal);
    assert_eq!(cat(1e-6, Precision::Single), Category::Normal);
    assert_eq!(cat(1e-40, Precision::Single), Category::Subnormal);
    assert_eq!(cat(1e-50, Precision::Single), Category::Zero);
    assert_eq!(cat(5e-324, Precision::Double), Category::Subnormal);
    assert_eq!(cat(1e5, Precision::Half), Category::Infinity);
    assert_eq!(cat(1e39, Precision::Single), Category::Infinity);
    assert_eq!(cat(f64::NAN, Precision::Double), Category::NaN);
}

#[test]
fn test_pattern_accessors() {
    let p = encode(-1.5, Precision::Half);
    assert_eq!(p.bits(), 0xbe00);
    assert!(p.sign());
    assert_eq!(p.biased_exponent(), 15);
    assert_eq!(p.mantissa(), 0x200);
    assert_eq!(p.magnitude(), 0x3e00);
    assert_eq!(p.bit(0), Some(true));
    assert_eq!(p.bit(1), Some(false));
    assert_eq!(p.bit(2), Some(true));
    assert_eq!(p.bit(16), None);
    assert_eq!(p.to_binary_string(), "1011111000000000");
    assert_eq!(p.to_hex_string(), "BE00");
    assert_eq!(p.to_be_bytes(), [0xbe, 0x00]);
    assert_eq!(format!("{}", p), "0xBE00");
    assert_eq!(format!("{:>8}", p), "  0xBE00");

    // Bits above the width are dropped.
    assert_eq!(BitPattern::new(0x1_0001, Precision::Half).bits(), 1);
}

#[test]
fn test_components_layout() {
    let c = components(0.1, Precision::Single);
    assert_eq!(c.sign, "0");
    assert_eq!(c.exponent, "01111011");
    assert_eq!(c.mantissa, "10011001100110011001101");
    assert_eq!(c.full_binary, "00111101110011001100110011001101");
    assert_eq!(c.hex, "3DCCCCCD");
    assert_eq!(c.value, 0.10000000149011612);

    for p in Precision::ALL {
        let c = components(-3.75, p);
        assert_eq!(c.full_binary.len(), p.total_bits());
        assert_eq!(c.hex.len(), p.total_bits() / 4);
        assert_eq!(
            c.full_binary,
            format!("{}{}{}", c.sign, c.exponent, c.mantissa)
        );
        assert_eq!(c.exponent.len(), p.format().exponent_bits);
        assert_eq!(c.value, -3.75);
    }
}

#[test]
fn test_reconstruction() {
    let c = components(6.0, Precision::Single);
    let r = c.reconstruction().unwrap();
    assert!(!r.sign);
    assert_eq!(r.raw_exponent, 129);
    assert_eq!(r.unbiased_exponent, 2);
    assert_eq!(r.effective_exponent, 2);
    assert_eq!(r.significand, 1.5);
    assert!(!r.is_subnormal);

    let c = components(exp2i(-24), Precision::Half);
    let r = c.reconstruction().unwrap();
    assert!(r.is_subnormal);
    assert_eq!(r.raw_exponent, 0);
    assert_eq!(r.unbiased_exponent, -15);
    assert_eq!(r.effective_exponent, -14);
    assert_eq!(r.significand, 1.0 / 1024.0);

    assert!(components(f64::NAN, Precision::Half)
        .reconstruction()
        .is_none());
    assert!(components(f64::INFINITY, Precision::Double)
        .reconstruction()
        .is_none());

    // The breakdown multiplies back to the stored value.
    for p in Precision::ALL {
        for v in [0.1, -7.25, 1e-5, 3e-8, 1e-310, 65504.0] {
            let c = components(v, p);
            let r = c.reconstruction().unwrap();
            let sign = if r.sign { -1.0 } else { 1.0 };
            let scaled =
                sign * r.significand * exp2i(r.effective_exponent as i32);
            assert_eq!(scaled, c.value, "{} {}", v, p);
        }
    }
}
