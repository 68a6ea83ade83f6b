//! This module contains a small arbitrary-size unsigned integer that the
//! decimal formatter uses to expand binary fractions exactly.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// The largest power of 5 that fits in a single word.
const FIVE_POW_27: u64 = 7450580596923828125;

/// The largest power of 10 that fits in a single word.
const TEN_POW_19: u64 = 10000000000000000000;

/// This is an arbitrary-size unsigned big number, backed by `Vec<u64>` with
/// the least significant word first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigInt {
    parts: Vec<u64>,
}

impl BigInt {
    /// Create a number and set the lowest 64 bits to `val`.
    pub fn from_u64(val: u64) -> Self {
        let vec = Vec::from([val]);
        BigInt { parts: vec }
    }

    fn len(&self) -> usize {
        self.parts.len()
    }

    /// Return true if the number is equal to zero.
    pub fn is_zero(&self) -> bool {
        self.parts.iter().all(|elem| *elem == 0)
    }

    /// Remove the leading zero words from the bigint.
    fn shrink(&mut self) {
        while self.len() > 1 && self.parts[self.len() - 1] == 0 {
            self.parts.pop();
        }
    }

    /// Shift the bits in the numbers `bits` to the left.
    pub fn shift_left(&mut self, bits: usize) {
        let words_to_shift = bits / u64::BITS as usize;
        let bits_in_word = bits % u64::BITS as usize;

        if bits_in_word != 0 {
            let mut carry = 0;
            for part in self.parts.iter_mut() {
                let next = *part >> (u64::BITS as usize - bits_in_word);
                *part = (*part << bits_in_word) | carry;
                carry = next;
            }
            if carry != 0 {
                self.parts.push(carry);
            }
        }

        // Move whole words.
        if words_to_shift > 0 && !self.is_zero() {
            let mut low = Vec::with_capacity(words_to_shift + self.len());
            low.resize(words_to_shift, 0);
            low.extend_from_slice(&self.parts);
            self.parts = low;
        }
    }

    /// Multiply self by the single word `rhs`.
    pub fn inplace_mul_u64(&mut self, rhs: u64) {
        let mut carry: u64 = 0;
        for part in self.parts.iter_mut() {
            let wide = (*part as u128) * (rhs as u128) + carry as u128;
            *part = wide as u64;
            carry = (wide >> 64) as u64;
        }
        if carry != 0 {
            self.parts.push(carry);
        }
        self.shrink();
    }

    /// Multiply self by 5^exp.
    pub fn inplace_mul_pow5(&mut self, exp: u64) {
        let mut exp = exp;
        while exp >= 27 {
            self.inplace_mul_u64(FIVE_POW_27);
            exp -= 27;
        }
        if exp > 0 {
            self.inplace_mul_u64(5u64.pow(exp as u32));
        }
    }

    /// Divide self by the non-zero word `divisor`, and return the reminder.
    pub fn inplace_div_u64(&mut self, divisor: u64) -> u64 {
        assert_ne!(divisor, 0, "division by zero");
        let mut rem: u128 = 0;
        for part in self.parts.iter_mut().rev() {
            let cur = (rem << 64) | *part as u128;
            *part = (cur / divisor as u128) as u64;
            rem = cur % divisor as u128;
        }
        self.shrink();
        rem as u64
    }

    /// Prints the bigint as a decimal number.
    pub fn as_decimal(&self) -> String {
        if self.is_zero() {
            return String::from("0");
        }

        // Pull 19 digits at a time, lowest chunk first.
        let mut chunks = Vec::new();
        let mut val = self.clone();
        while !val.is_zero() {
            chunks.push(val.inplace_div_u64(TEN_POW_19));
        }

        let mut sb = String::new();
        for (i, chunk) in chunks.iter().rev().enumerate() {
            if i == 0 {
                sb.push_str(&alloc::format!("{}", chunk));
            } else {
                sb.push_str(&alloc::format!("{:019}", chunk));
            }
        }
        sb
    }
}

#[test]
fn test_mul_pow5() {
    let lookup = [1, 5, 25, 125, 625, 3125, 15625, 78125];
    for (i, val) in lookup.iter().enumerate() {
        let mut one = BigInt::from_u64(1);
        one.inplace_mul_pow5(i as u64);
        assert_eq!(one, BigInt::from_u64(*val));
    }

    let mut x = BigInt::from_u64(1);
    x.inplace_mul_pow5(27);
    assert_eq!(x, BigInt::from_u64(FIVE_POW_27));

    // 5^30 does not fit in a word.
    let mut x = BigInt::from_u64(1);
    x.inplace_mul_pow5(30);
    assert_eq!(x.as_decimal(), "931322574615478515625");
}

#[test]
fn test_shl() {
    let mut x = BigInt::from_u64(0xff00_0000_0000_0001);
    x.shift_left(4);
    assert_eq!(x.parts, [0xf000_0000_0000_0010, 0xf]);

    let mut x = BigInt::from_u64(3);
    x.shift_left(128);
    assert_eq!(x.parts, [0, 0, 3]);

    let mut x = BigInt::from_u64(1);
    x.shift_left(70);
    assert_eq!(x.parts, [0, 64]);
    assert_eq!(x.as_decimal(), "1180591620717411303424");

    let mut x = BigInt::from_u64(0);
    x.shift_left(100);
    assert!(x.is_zero());
}

#[test]
fn test_div_small() {
    let mut x = BigInt::from_u64(1);
    x.shift_left(64);
    let rem = x.inplace_div_u64(10);
    assert_eq!(rem, 6);
    assert_eq!(x, BigInt::from_u64(1844674407370955161));
}

#[test]
fn test_bigint_to_decimal() {
    let mut num = BigInt::from_u64(1);
    for i in 1..41 {
        num.inplace_mul_u64(i);
    }

    assert_eq!(
        num.as_decimal(),
        "815915283247897734345611269596115894272000000000"
    );

    assert_eq!(BigInt::from_u64(0).as_decimal(), "0");
    let x = BigInt::from_u64(u64::MAX);
    assert_eq!(x.as_decimal(), "18446744073709551615");
    // A chunk with inner zeros keeps its padding.
    let mut x = BigInt::from_u64(TEN_POW_19);
    x.inplace_mul_u64(10);
    assert_eq!(x.as_decimal(), "100000000000000000000");
}
