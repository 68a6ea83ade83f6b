//! Flipping single bits of a stored value.

use super::codec::{decode, encode, BitPattern};
use super::error::Error;
use super::format::Precision;

/// Flip the bit at `index` (zero is the sign bit) in the pattern that stores
/// `value` with `precision`, and return the new stored number.
///
/// The value is encoded first, so flipping a bit always acts on what the
/// format holds and not on the f64 that was passed in. Flipping the same bit
/// twice gives back the stored value. NaNs come back as a NaN with the same
/// sign, and a binary16 NaN produced by the first flip is canonicalized, so
/// the second flip can't restore the original payload.
pub fn toggle_bit(
    value: f64,
    precision: Precision,
    index: usize,
) -> Result<f64, Error> {
    let pattern = encode(value, precision);
    let flipped = toggle_pattern_bit(pattern, index)?;
    Ok(decode(flipped))
}

/// Flip the bit at `index` of `pattern`.
pub fn toggle_pattern_bit(
    pattern: BitPattern,
    index: usize,
) -> Result<BitPattern, Error> {
    pattern.with_bit_flipped(index).map_err(|err| {
        log::debug!("rejected bit toggle of {}: {}", pattern, err);
        err
    })
}

#[cfg(test)]
fn stored(value: f64, precision: Precision) -> f64 {
    decode(encode(value, precision))
}

#[test]
fn test_toggle_sign() {
    let v = toggle_bit(0.1, Precision::Single, 0).unwrap();
    assert_eq!(v, -0.10000000149011612);
    let v = toggle_bit(0.0, Precision::Double, 0).unwrap();
    assert_eq!(v.to_bits(), 1 << 63);
    assert_eq!(toggle_bit(-0.0, Precision::Half, 0).unwrap().to_bits(), 0);
    assert_eq!(toggle_bit(2.0, Precision::Half, 0).unwrap(), -2.0);
}

#[test]
fn test_toggle_fields() {
    // The lowest mantissa bit of 1.0 gives the next number up.
    let v = toggle_bit(1.0, Precision::Half, 15).unwrap();
    assert_eq!(v, 1.0 + 1.0 / 1024.0);
    let v = toggle_bit(1.0, Precision::Double, 63).unwrap();
    assert_eq!(v, 1.0 + f64::EPSILON);

    // Bit 9 is the highest mantissa bit of single.
    let v = toggle_bit(1.5, Precision::Single, 9).unwrap();
    assert_eq!(v, 1.0);
    let v = toggle_bit(1.0, Precision::Single, 9).unwrap();
    assert_eq!(v, 1.5);

    // Setting the low mantissa bit of an infinity produces a NaN.
    let v = toggle_bit(f64::INFINITY, Precision::Half, 15).unwrap();
    assert!(v.is_nan());
    let v = toggle_bit(f64::INFINITY, Precision::Single, 31).unwrap();
    assert!(v.is_nan());
    // Setting the lowest bit of zero gives the smallest subnormal.
    assert_eq!(toggle_bit(0.0, Precision::Double, 63).unwrap(), 5e-324);
}

#[test]
fn test_toggle_out_of_range() {
    for p in Precision::ALL {
        let width = p.total_bits();
        let err = toggle_bit(1.0, p, width).unwrap_err();
        assert_eq!(err, Error::InvalidBitIndex { index: width, width });
        assert!(toggle_bit(1.0, p, width - 1).is_ok());
        assert!(toggle_bit(1.0, p, 1000).is_err());
    }
}

#[test]
fn test_toggle_is_involution() {
    use super::utils::{self, Lfsr};
    let mut lfsr = Lfsr::new();
    let mut values: alloc::vec::Vec<f64> =
        utils::get_special_test_values().to_vec();
    for _ in 0..200 {
        values.push(f64::from_bits(lfsr.get64()));
    }

    for p in Precision::ALL {
        for &v in &values {
            let before = stored(v, p);
            for i in 0..p.total_bits() {
                let once = toggle_bit(v, p, i).unwrap();
                let twice = toggle_bit(once, p, i).unwrap();
                // Binary16 NaNs are canonical, so their payload is lost.
                if p == Precision::Half && once.is_nan() && !before.is_nan() {
                    continue;
                }
                if before.is_nan() {
                    assert!(twice.is_nan());
                    assert_eq!(
                        twice.is_sign_negative(),
                        before.is_sign_negative()
                    );
                } else {
                    assert_eq!(
                        twice.to_bits(),
                        before.to_bits(),
                        "{} {} {}",
                        v,
                        p,
                        i
                    );
                }
            }
        }
    }
}
