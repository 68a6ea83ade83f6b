//! Software implementation of the binary16 format. The conversion is built on
//! top of the binary32 path: the value is first rounded to binary32, and the
//! binary32 bits are then re-biased and rounded to 16 bits.

use super::codec::encode32;
use super::format::{HALF, SINGLE};
use super::utils::{self, exp2i, round_to_nearest_even};

/// The largest finite binary16 magnitude.
pub const MAX_FINITE: f64 = 65504.0;

/// Converts `value` to a binary16 pattern, rounding to the nearest value with
/// ties to even.
pub fn encode16(value: f64) -> u16 {
    let x = encode32(value) as u64;
    let sign = ((x >> 16) & HALF.sign_mask()) as u16;
    let exp = (x >> SINGLE.mantissa_bits) & SINGLE.max_biased_exponent();
    let man = x & SINGLE.mantissa_mask();

    // Inf and NaN. NaNs get the quiet pattern so they never turn into Inf.
    if exp == SINGLE.max_biased_exponent() {
        if man != 0 {
            return sign | HALF.quiet_nan_pattern() as u16;
        }
        return sign | HALF.infinity_pattern() as u16;
    }

    // Zeros and binary32 subnormals are far below the smallest binary16
    // subnormal (2^-24).
    if exp == 0 {
        return sign;
    }

    // Re-bias the exponent from 127 to 15.
    let exp16 = exp as i64 - SINGLE.bias + HALF.bias;
    if exp16 >= HALF.max_biased_exponent() as i64 {
        log::trace!("{} overflows binary16", value);
        return sign | HALF.infinity_pattern() as u16;
    }

    // Insert the implicit bit, and drop the mantissa bits that don't fit.
    // Numbers in the subnormal range lose one more bit for every step below
    // the minimal exponent.
    let sig = man | (1 << SINGLE.mantissa_bits);
    let mut shift = SINGLE.mantissa_bits - HALF.mantissa_bits;
    if exp16 <= 0 {
        shift += (1 - exp16) as usize;
    }
    let (mut m, loss) = utils::shift_right_with_loss(sig, shift);
    if round_to_nearest_even(m, loss) {
        m += 1;
    }

    if exp16 <= 0 {
        if m == 0 {
            log::trace!("{} underflows binary16", value);
        }
        // If rounding carried into the implicit bit then the pattern is the
        // smallest normal number, which is what the bits already spell.
        return sign | m as u16;
    }

    let mut e = exp16 as u64;
    // Rounding overflowed the mantissa (1.111.. -> 10.000..).
    if m >> (HALF.mantissa_bits + 1) != 0 {
        m >>= 1;
        e += 1;
        if e >= HALF.max_biased_exponent() {
            log::trace!("{} rounds up to the binary16 infinity", value);
            return sign | HALF.infinity_pattern() as u16;
        }
    }
    sign | ((e << HALF.mantissa_bits) | (m & HALF.mantissa_mask())) as u16
}

/// Converts the binary16 pattern `bits` to the (exact) f64 value.
pub fn decode16(bits: u16) -> f64 {
    let bits = bits as u64;
    let negative = bits & HALF.sign_mask() != 0;
    let exp = (bits >> HALF.mantissa_bits) & HALF.max_biased_exponent();
    let man = bits & HALF.mantissa_mask();
    let frac = man as f64 * exp2i(-(HALF.mantissa_bits as i32));

    let magnitude = if exp == 0 {
        // Zero or subnormal, without the implicit bit.
        exp2i(1 - HALF.bias as i32) * frac
    } else if exp == HALF.max_biased_exponent() {
        if man != 0 {
            return if negative { -f64::NAN } else { f64::NAN };
        }
        f64::INFINITY
    } else {
        exp2i(exp as i32 - HALF.bias as i32) * (1.0 + frac)
    };

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

#[test]
fn test_decode_constants() {
    assert_eq!(decode16(0x7bff), MAX_FINITE);
    assert_eq!(decode16(0xfbff), -MAX_FINITE);
    assert_eq!(decode16(0x0001), exp2i(-24));
    assert_eq!(decode16(0x0001), 5.960464477539063e-8);
    assert_eq!(decode16(0x0400), 6.103515625e-5);
    assert_eq!(decode16(0x3c00), 1.0);
    assert_eq!(decode16(0x3555), 0.333251953125);
    assert_eq!(decode16(0x7c00), f64::INFINITY);
    assert_eq!(decode16(0xfc00), f64::NEG_INFINITY);
    assert!(decode16(0x7e00).is_nan());
    assert!(decode16(0x7c01).is_nan());
    assert!(decode16(0xfe00).is_sign_negative());
    assert!(decode16(0x8000).is_sign_negative());
    assert_eq!(decode16(0x8000), 0.0);
}

#[test]
fn test_encode_boundaries() {
    assert_eq!(encode16(65504.), 0x7bff);
    assert_eq!(encode16(-65504.), 0xfbff);
    // 65519.99 rounds down, 65520 is the tie that rounds to Inf.
    assert_eq!(encode16(65519.), 0x7bff);
    assert_eq!(encode16(65520.), 0x7c00);
    assert_eq!(encode16(100000.), 0x7c00);
    assert_eq!(encode16(-100000.), 0xfc00);
    assert_eq!(encode16(1e300), 0x7c00);

    // Subnormals.
    assert_eq!(encode16(exp2i(-24)), 0x0001);
    assert_eq!(encode16(exp2i(-14)), 0x0400);
    assert_eq!(encode16(exp2i(-14) - exp2i(-24)), 0x03ff);
    // Exactly half of the smallest subnormal is a tie, rounding to zero.
    assert_eq!(encode16(exp2i(-25)), 0x0000);
    assert_eq!(encode16(-exp2i(-25)), 0x8000);
    assert_eq!(encode16(exp2i(-25) * 1.5), 0x0001);
    assert_eq!(encode16(1e-10), 0x0000);
    assert_eq!(encode16(-1e-10), 0x8000);
    assert_eq!(encode16(1e-40), 0x0000);

    // Rounding the largest subnormal up produces the smallest normal.
    assert_eq!(encode16(exp2i(-14) - exp2i(-26)), 0x0400);

    assert_eq!(encode16(0.0), 0x0000);
    assert_eq!(encode16(-0.0), 0x8000);
    assert_eq!(encode16(f64::INFINITY), 0x7c00);
    assert_eq!(encode16(f64::NEG_INFINITY), 0xfc00);
    assert_eq!(encode16(f64::NAN), 0x7e00);
    assert_eq!(encode16(-f64::NAN), 0xfe00);
}

#[test]
fn test_encode_rounding() {
    // 1 + 2^-11 is the tie between 1.0 and 1 + 2^-10: rounds to even (1.0).
    assert_eq!(encode16(1.0 + exp2i(-11)), 0x3c00);
    // 1 + 3 * 2^-11 is the tie between odd and even: rounds up.
    assert_eq!(encode16(1.0 + 3.0 * exp2i(-11)), 0x3c02);
    // Slightly above the tie rounds up.
    assert_eq!(encode16(1.0 + exp2i(-11) + exp2i(-20)), 0x3c01);
    // Carry out of the mantissa bumps the exponent.
    assert_eq!(encode16(2.0 - exp2i(-12)), 0x4000);
    assert_eq!(encode16(0.1), 0x2e66);
    assert_eq!(encode16(0.3), 0x34cd);
}

#[test]
fn test_all_patterns_round_trip() {
    for bits in 0..=u16::MAX {
        let v = decode16(bits);
        let back = encode16(v);
        if v.is_nan() {
            assert_eq!(back, (bits & 0x8000) | 0x7e00);
        } else {
            assert_eq!(back, bits, "{:#06x}", bits);
        }
    }
}
