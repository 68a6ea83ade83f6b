//! This file contains simple helper functions and test helpers.

/// Returns a mask full of 1s, of `b` bits.
pub fn mask(b: usize) -> u64 {
    if b >= u64::BITS as usize {
        return u64::MAX;
    }
    (1 << b) - 1
}

#[test]
fn test_masking() {
    assert_eq!(mask(0), 0x0);
    assert_eq!(mask(1), 0x1);
    assert_eq!(mask(8), 255);
    assert_eq!(mask(64), u64::MAX);
}

/// Reports the kind of values that are lost when we shift right bits. This is
/// used as the guard and sticky bits when rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LossFraction {
    ExactlyZero,  //0000000
    LessThanHalf, //0xxxxxx
    ExactlyHalf,  //1000000
    MoreThanHalf, //1xxxxxx
}

impl LossFraction {
    pub fn is_exactly_half(&self) -> bool {
        matches!(self, Self::ExactlyHalf)
    }
    pub fn is_mt_half(&self) -> bool {
        matches!(self, Self::MoreThanHalf)
    }
}

/// Shift `val` right by `bits`, and report the loss.
pub(crate) fn shift_right_with_loss(
    val: u64,
    bits: usize,
) -> (u64, LossFraction) {
    if bits == 0 || val == 0 {
        return (val, LossFraction::ExactlyZero);
    }
    if bits > u64::BITS as usize {
        return (0, LossFraction::LessThanHalf);
    }
    let lost = val & mask(bits);
    let half = 1u64 << (bits - 1);
    let loss = if lost == 0 {
        LossFraction::ExactlyZero
    } else if lost < half {
        LossFraction::LessThanHalf
    } else if lost == half {
        LossFraction::ExactlyHalf
    } else {
        LossFraction::MoreThanHalf
    };
    let kept = if bits == u64::BITS as usize { 0 } else { val >> bits };
    (kept, loss)
}

/// Returns true if the truncated value `kept` needs to be incremented to round
/// to the nearest value, with ties going to the even neighbor.
pub(crate) fn round_to_nearest_even(kept: u64, loss: LossFraction) -> bool {
    if loss.is_mt_half() {
        return true;
    }
    loss.is_exactly_half() && (kept & 1) == 1
}

#[test]
fn shift_right_fraction() {
    let res = shift_right_with_loss(0b10000000, 3);
    assert_eq!(res, (0b10000, LossFraction::ExactlyZero));

    let res = shift_right_with_loss(0b10000111, 3);
    assert!(res.1.is_mt_half());

    let res = shift_right_with_loss(0b10000100, 3);
    assert!(res.1.is_exactly_half());

    let res = shift_right_with_loss(0b10000001, 3);
    assert_eq!(res.1, LossFraction::LessThanHalf);

    let res = shift_right_with_loss(1 << 63, 64);
    assert_eq!(res, (0, LossFraction::ExactlyHalf));

    let res = shift_right_with_loss(0b1, 70);
    assert_eq!(res, (0, LossFraction::LessThanHalf));
}

#[test]
fn test_round_to_nearest_even() {
    // Ties go to the even neighbor.
    assert!(!round_to_nearest_even(0b10, LossFraction::ExactlyHalf));
    assert!(round_to_nearest_even(0b11, LossFraction::ExactlyHalf));
    assert!(round_to_nearest_even(0b10, LossFraction::MoreThanHalf));
    assert!(!round_to_nearest_even(0b11, LossFraction::LessThanHalf));
    assert!(!round_to_nearest_even(0b11, LossFraction::ExactlyZero));
}

/// Returns 2^k as an f64. `k` must be in the normal exponent range.
pub(crate) fn exp2i(k: i32) -> f64 {
    debug_assert!((-1022..=1023).contains(&k));
    let e = (k + 1023) as u64;
    f64::from_bits(e << 52)
}

#[test]
fn test_exp2i() {
    assert_eq!(exp2i(0), 1.0);
    assert_eq!(exp2i(10), 1024.0);
    assert_eq!(exp2i(-1), 0.5);
    assert_eq!(exp2i(-14), 6.103515625e-5);
    assert_eq!(exp2i(-1022), f64::MIN_POSITIVE);
}

#[cfg(test)]
/// Returns list of interesting values that various tests use to catch edge
/// cases.
pub fn get_special_test_values() -> [f64; 24] {
    [
        -f64::NAN,
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::EPSILON,
        -f64::EPSILON,
        0.000000000000000000000000000000000000001,
        f64::MIN,
        f64::MAX,
        f64::MIN_POSITIVE,
        5e-324,
        core::f64::consts::PI,
        core::f64::consts::LN_2,
        core::f64::consts::E,
        0.0,
        -0.0,
        10.,
        -10.,
        -0.00001,
        0.1,
        355. / 113.,
        65504.,
        -65520.,
        100000.,
    ]
}

// Linear-feedback shift register. We use this as a random number generator for
// tests.
#[cfg(test)]
pub struct Lfsr {
    state: u32,
}

#[cfg(test)]
impl Lfsr {
    /// Generate a new LFSR number generator.
    pub fn new() -> Lfsr {
        Lfsr { state: 0x13371337 }
    }

    pub fn next(&mut self) {
        let a = (self.state >> 24) & 1;
        let b = (self.state >> 23) & 1;
        let c = (self.state >> 22) & 1;
        let d = (self.state >> 17) & 1;
        let n = a ^ b ^ c ^ d ^ 1;
        self.state <<= 1;
        self.state |= n;
    }

    pub fn get(&mut self) -> u32 {
        let mut res: u32 = 0;
        for _ in 0..32 {
            self.next();
            res <<= 1;
            res ^= self.state & 0x1;
        }
        res
    }

    pub fn get64(&mut self) -> u64 {
        ((self.get() as u64) << 32) | self.get() as u64
    }
}

#[test]
fn test_lfsr_balance() {
    let mut lfsr = Lfsr::new();

    // Count the number of items, and the number of 1s.
    let mut items = 0;
    let mut ones = 0;

    for _ in 0..10000 {
        let mut u = lfsr.get();
        for _ in 0..32 {
            items += 1;
            ones += u & 1;
            u >>= 1;
        }
    }
    // Make sure that we have around 50% 1s and 50% zeros.
    assert!((ones as f64) < (0.55 * items as f64));
    assert!((ones as f64) > (0.45 * items as f64));
}
