//! Walking to the neighboring representable values of a format.

use super::codec::{decode, encode, BitPattern, Category};
use super::format::{Precision, PrecisionFormat};
use core::fmt;

/// The direction of a step on the real line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward +Infinity.
    Next,
    /// Toward -Infinity.
    Prev,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Next => write!(f, "next"),
            Direction::Prev => write!(f, "prev"),
        }
    }
}

/// Returns the pattern that follows the pattern made of `negative` and
/// `magnitude` (the pattern without the sign bit) in `direction`.
/// The patterns are ordered as sign-magnitude numbers, which is the order of
/// the values that they encode. The infinities are fixed points in their own
/// direction, and NaN patterns are returned unchanged.
pub fn step_sign_magnitude(
    sem: &PrecisionFormat,
    negative: bool,
    magnitude: u64,
    direction: Direction,
) -> u64 {
    let sign = sem.sign_mask();
    let inf = sem.infinity_pattern();
    let sign_bit = if negative { sign } else { 0 };
    if magnitude > inf {
        return sign_bit | magnitude;
    }

    // Both zeros step to the smallest subnormal on either side, except that
    // -0 steps up to +0.
    if magnitude == 0 {
        return match direction {
            Direction::Next if negative => 0,
            Direction::Next => 1,
            Direction::Prev => sign | 1,
        };
    }

    match (negative, direction) {
        (false, Direction::Next) => (magnitude + 1).min(inf),
        (false, Direction::Prev) => magnitude - 1,
        (true, Direction::Next) => sign | (magnitude - 1),
        (true, Direction::Prev) => sign | (magnitude + 1).min(inf),
    }
}

/// Returns the pattern next to `pattern` in `direction`. NaN patterns are
/// returned unchanged.
pub fn step_pattern(pattern: BitPattern, direction: Direction) -> BitPattern {
    if pattern.category() == Category::NaN {
        return pattern;
    }
    let bits = step_sign_magnitude(
        pattern.format(),
        pattern.sign(),
        pattern.magnitude(),
        direction,
    );
    BitPattern::new(bits, pattern.precision())
}

/// Returns the representable neighbor of `value` in `precision`, one unit in
/// the last place away in `direction`.
///
/// The value is encoded before it is classified, so numbers that overflow the
/// format step like infinities and numbers that underflow step like zeros.
/// A NaN is returned unchanged.
pub fn step(value: f64, precision: Precision, direction: Direction) -> f64 {
    if value.is_nan() {
        return value;
    }
    let pattern = encode(value, precision);
    let next = step_pattern(pattern, direction);
    log::trace!("step {} {}: {} -> {}", direction, precision, pattern, next);
    decode(next)
}

#[test]
fn test_step_positive() {
    use crate::utils::exp2i;
    assert_eq!(
        step(1.0, Precision::Double, Direction::Next),
        1.0 + f64::EPSILON
    );
    assert_eq!(
        step(1.0, Precision::Double, Direction::Prev),
        1.0 - f64::EPSILON / 2.0
    );
    assert_eq!(
        step(1.0, Precision::Single, Direction::Next),
        1.0 + f32::EPSILON as f64
    );
    let half = |v, d| step(v, Precision::Half, d);
    assert_eq!(half(1.0, Direction::Next), 1.0 + exp2i(-10));
    assert_eq!(half(1.0, Direction::Prev), 1.0 - exp2i(-11));
    assert_eq!(half(65504.0, Direction::Next), f64::INFINITY);
    assert_eq!(half(65504.0, Direction::Prev), 65472.0);
}

#[test]
fn test_step_negative() {
    assert_eq!(
        step(-1.0, Precision::Double, Direction::Next),
        -1.0 + f64::EPSILON / 2.0
    );
    assert_eq!(
        step(-1.0, Precision::Double, Direction::Prev),
        -1.0 - f64::EPSILON
    );
    assert_eq!(
        step(-65504.0, Precision::Half, Direction::Prev),
        f64::NEG_INFINITY
    );
    assert_eq!(
        step(-f64::MIN_POSITIVE, Precision::Double, Direction::Next),
        -(f64::MIN_POSITIVE - 5e-324)
    );
}

#[test]
fn test_step_infinities() {
    for p in Precision::ALL {
        let max = BitPattern::new(p.format().max_finite_pattern(), p);
        let max = max.decode();
        assert_eq!(step(f64::INFINITY, p, Direction::Next), f64::INFINITY);
        assert_eq!(step(f64::INFINITY, p, Direction::Prev), max);
        assert_eq!(
            step(f64::NEG_INFINITY, p, Direction::Prev),
            f64::NEG_INFINITY
        );
        assert_eq!(step(f64::NEG_INFINITY, p, Direction::Next), -max);
    }
    assert_eq!(
        step(f64::INFINITY, Precision::Double, Direction::Prev),
        f64::MAX
    );
    assert_eq!(
        step(f64::NEG_INFINITY, Precision::Half, Direction::Next),
        -65504.0
    );

    // 1e5 does not fit in binary16, so it is already +Infinity.
    assert_eq!(step(1e5, Precision::Half, Direction::Prev), 65504.0);
    assert_eq!(step(1e5, Precision::Half, Direction::Next), f64::INFINITY);
}

#[test]
fn test_step_nan() {
    for p in Precision::ALL {
        for d in [Direction::Next, Direction::Prev] {
            assert!(step(f64::NAN, p, d).is_nan());
            let odd_nan = f64::from_bits(0xfff0_0000_0000_0123);
            assert_eq!(step(odd_nan, p, d).to_bits(), odd_nan.to_bits());
        }
    }
    let nan = BitPattern::new(0x7c01, Precision::Half);
    assert_eq!(step_pattern(nan, Direction::Next), nan);
}

#[test]
fn test_step_zero() {
    for p in Precision::ALL {
        let tiny = BitPattern::new(p.format().min_subnormal_pattern(), p);
        let tiny = tiny.decode();
        assert!(tiny > 0.0);

        assert_eq!(step(0.0, p, Direction::Next), tiny);
        assert_eq!(step(0.0, p, Direction::Prev), -tiny);
        assert_eq!(step(-0.0, p, Direction::Prev), -tiny);
        let up = step(-0.0, p, Direction::Next);
        assert_eq!(up.to_bits(), 0);

        // Back to the zeros from the smallest subnormals.
        let down = step(tiny, p, Direction::Prev);
        assert_eq!(down.to_bits(), 0);
        let up = step(-tiny, p, Direction::Next);
        assert!(up == 0.0 && up.is_sign_negative());
    }
    assert_eq!(step(0.0, Precision::Double, Direction::Next), 5e-324);

    // Values that underflow binary16 step like zeros.
    assert_eq!(
        step(1e-10, Precision::Half, Direction::Next),
        decode(BitPattern::new(1, Precision::Half))
    );
}

#[test]
fn test_step_is_monotonic() {
    use crate::utils::{self, Lfsr};
    let mut lfsr = Lfsr::new();
    let randoms = (0..2000).map(|_| f64::from_bits(lfsr.get64()));
    for v in randoms.chain(utils::get_special_test_values()) {
        for p in Precision::ALL {
            let x = decode(encode(v, p));
            if !x.is_finite() || x == 0.0 {
                continue;
            }
            let up = step(x, p, Direction::Next);
            let down = step(x, p, Direction::Prev);
            assert!(down < x && x < up, "{} {}", x, p);
            // Stepping back undoes the step.
            assert_eq!(step(up, p, Direction::Prev).to_bits(), x.to_bits());
            assert_eq!(step(down, p, Direction::Next).to_bits(), x.to_bits());
        }
    }
}

#[test]
fn test_sign_magnitude_order() {
    use crate::format::HALF;
    let next = |neg, mag| step_sign_magnitude(&HALF, neg, mag, Direction::Next);
    let prev = |neg, mag| step_sign_magnitude(&HALF, neg, mag, Direction::Prev);
    assert_eq!(next(false, 0x3c00), 0x3c01);
    assert_eq!(next(true, 0x3c00), 0xbbff);
    assert_eq!(prev(true, 0x3c00), 0xbc01);
    assert_eq!(next(false, 0x7c00), 0x7c00);
    assert_eq!(prev(true, 0x7c00), 0xfc00);
    assert_eq!(next(true, 0x7c00), 0xfbff);
    assert_eq!(prev(false, 0), 0x8001);
    assert_eq!(next(true, 0), 0);
}

#[test]
fn test_sign_magnitude_keeps_nan() {
    use crate::format::{DOUBLE, HALF, SINGLE};
    for sem in [HALF, SINGLE, DOUBLE] {
        let nans = [sem.quiet_nan_pattern(), sem.infinity_pattern() | 1];
        for (neg, nan) in [false, true].into_iter().zip(nans) {
            for d in [Direction::Next, Direction::Prev] {
                let bits = step_sign_magnitude(&sem, neg, nan, d);
                let sign = if neg { sem.sign_mask() } else { 0 };
                assert_eq!(bits, sign | nan);
            }
        }
    }
}
