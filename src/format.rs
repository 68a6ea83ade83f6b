//! The registry of the supported IEEE-754 binary interchange formats.

use crate::error::Error;
use alloc::string::ToString;

/// Selects one of the three binary interchange formats that the engine
/// supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Half,
    Single,
    Double,
}

/// Describes the bit layout of a binary interchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionFormat {
    /// The width of the whole pattern, in bits.
    pub total_bits: usize,
    /// The number of bits that define the range of the exponent.
    pub exponent_bits: usize,
    /// The number of stored significand bits (without the implicit bit).
    pub mantissa_bits: usize,
    /// The value that is added to the true exponent before it is stored.
    pub bias: i64,
}

/// The role that a single bit plays in the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitField {
    Sign,
    Exponent,
    Mantissa,
}

impl PrecisionFormat {
    pub const fn new(exponent_bits: usize, mantissa_bits: usize) -> Self {
        PrecisionFormat {
            total_bits: 1 + exponent_bits + mantissa_bits,
            exponent_bits,
            mantissa_bits,
            bias: (1i64 << (exponent_bits - 1)) - 1,
        }
    }

    /// Returns a mask that covers the whole pattern.
    pub fn pattern_mask(&self) -> u64 {
        if self.total_bits == u64::BITS as usize {
            return u64::MAX;
        }
        (1u64 << self.total_bits) - 1
    }

    /// Returns the mask of the sign bit (the most significant bit).
    pub fn sign_mask(&self) -> u64 {
        1u64 << (self.total_bits - 1)
    }

    /// Returns the mask of the exponent field, in place.
    pub fn exponent_mask(&self) -> u64 {
        self.max_biased_exponent() << self.mantissa_bits
    }

    /// Returns the mask of the mantissa field.
    pub fn mantissa_mask(&self) -> u64 {
        (1u64 << self.mantissa_bits) - 1
    }

    /// Returns the all-ones exponent value that marks Inf and NaN.
    pub fn max_biased_exponent(&self) -> u64 {
        (1u64 << self.exponent_bits) - 1
    }

    /// The pattern of the largest finite positive number.
    pub fn max_finite_pattern(&self) -> u64 {
        self.exponent_mask() - 1
    }

    /// The pattern of the smallest positive subnormal number.
    pub fn min_subnormal_pattern(&self) -> u64 {
        1
    }

    /// The pattern of positive infinity.
    pub fn infinity_pattern(&self) -> u64 {
        self.exponent_mask()
    }

    /// The canonical quiet NaN: all-ones exponent, top mantissa bit set.
    pub fn quiet_nan_pattern(&self) -> u64 {
        self.exponent_mask() | (1u64 << (self.mantissa_bits - 1))
    }

    /// Returns the role of the bit at `index`, where index zero is the sign
    /// bit. Returns None if the index is outside of the pattern.
    pub fn field_of(&self, index: usize) -> Option<BitField> {
        if index >= self.total_bits {
            return None;
        }
        if index == 0 {
            return Some(BitField::Sign);
        }
        if index <= self.exponent_bits {
            return Some(BitField::Exponent);
        }
        Some(BitField::Mantissa)
    }
}

// IEEE 754-2019
// Table 3.5 - Binary interchange format parameters.

/// binary16: 5 exponent bits, and 10 mantissa bits.
pub const HALF: PrecisionFormat = PrecisionFormat::new(5, 10);
/// binary32: 8 exponent bits, and 23 mantissa bits.
pub const SINGLE: PrecisionFormat = PrecisionFormat::new(8, 23);
/// binary64: 11 exponent bits, and 52 mantissa bits.
pub const DOUBLE: PrecisionFormat = PrecisionFormat::new(11, 52);

impl Precision {
    /// All of the supported precisions, from narrow to wide.
    pub const ALL: [Precision; 3] =
        [Precision::Half, Precision::Single, Precision::Double];

    /// Returns the layout of this precision.
    pub const fn format(self) -> &'static PrecisionFormat {
        match self {
            Precision::Half => &HALF,
            Precision::Single => &SINGLE,
            Precision::Double => &DOUBLE,
        }
    }

    /// Returns the width of the pattern in bits.
    pub const fn total_bits(self) -> usize {
        self.format().total_bits
    }

    /// Returns the precision that stores numbers in `bits` bits.
    pub fn from_width(bits: usize) -> Result<Self, Error> {
        match bits {
            16 => Ok(Precision::Half),
            32 => Ok(Precision::Single),
            64 => Ok(Precision::Double),
            _ => Err(Error::UnsupportedPrecision(bits.to_string())),
        }
    }

    /// Parses a precision name, ignoring case.
    pub fn from_string(name: &str) -> Result<Self, Error> {
        let name = name.trim();
        for (p, names) in [
            (Precision::Half, ["half", "fp16", "binary16"]),
            (Precision::Single, ["single", "fp32", "binary32"]),
            (Precision::Double, ["double", "fp64", "binary64"]),
        ] {
            if names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                return Ok(p);
            }
        }
        Err(Error::UnsupportedPrecision(name.to_string()))
    }

    pub fn as_string(&self) -> &str {
        match self {
            Precision::Half => "Half",
            Precision::Single => "Single",
            Precision::Double => "Double",
        }
    }
}

impl core::fmt::Display for Precision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sem = self.format();
        write!(
            f,
            "{} (exponent:{} mantissa:{} bias:{})",
            self.as_string(),
            sem.exponent_bits,
            sem.mantissa_bits,
            sem.bias
        )
    }
}

#[test]
fn test_format_invariants() {
    for p in Precision::ALL {
        let sem = p.format();
        assert_eq!(sem.total_bits, 1 + sem.exponent_bits + sem.mantissa_bits);
        assert_eq!(sem.bias, (1 << (sem.exponent_bits - 1)) - 1);
        // The three fields tile the pattern without overlapping.
        assert_eq!(sem.sign_mask() & sem.exponent_mask(), 0);
        assert_eq!(sem.exponent_mask() & sem.mantissa_mask(), 0);
        assert_eq!(
            sem.sign_mask() | sem.exponent_mask() | sem.mantissa_mask(),
            sem.pattern_mask()
        );
    }
    assert_eq!((HALF.total_bits, HALF.bias), (16, 15));
    assert_eq!((SINGLE.total_bits, SINGLE.bias), (32, 127));
    assert_eq!((DOUBLE.total_bits, DOUBLE.bias), (64, 1023));
}

#[test]
fn test_special_patterns() {
    assert_eq!(HALF.max_finite_pattern(), 0x7bff);
    assert_eq!(HALF.quiet_nan_pattern(), 0x7e00);
    assert_eq!(HALF.infinity_pattern(), 0x7c00);
    assert_eq!(SINGLE.max_finite_pattern(), 0x7f7f_ffff);
    assert_eq!(SINGLE.quiet_nan_pattern(), 0x7fc0_0000);
    assert_eq!(DOUBLE.max_finite_pattern(), f64::MAX.to_bits());
    assert_eq!(DOUBLE.quiet_nan_pattern(), 0x7ff8_0000_0000_0000);
    assert_eq!(DOUBLE.sign_mask(), 1 << 63);
}

#[test]
fn test_field_of() {
    assert_eq!(SINGLE.field_of(0), Some(BitField::Sign));
    assert_eq!(SINGLE.field_of(1), Some(BitField::Exponent));
    assert_eq!(SINGLE.field_of(8), Some(BitField::Exponent));
    assert_eq!(SINGLE.field_of(9), Some(BitField::Mantissa));
    assert_eq!(SINGLE.field_of(31), Some(BitField::Mantissa));
    assert_eq!(SINGLE.field_of(32), None);
    assert_eq!(HALF.field_of(5), Some(BitField::Exponent));
    assert_eq!(HALF.field_of(6), Some(BitField::Mantissa));
}

#[test]
fn test_precision_tags() {
    assert_eq!(Precision::from_width(16), Ok(Precision::Half));
    assert_eq!(Precision::from_width(64), Ok(Precision::Double));
    assert!(Precision::from_width(8).is_err());
    assert!(Precision::from_width(128).is_err());
    assert_eq!(Precision::from_string("SINGLE"), Ok(Precision::Single));
    assert_eq!(Precision::from_string(" fp16 "), Ok(Precision::Half));
    assert_eq!(
        Precision::from_string("bf16"),
        Err(Error::UnsupportedPrecision("bf16".to_string()))
    );
}
