//! A stateful inspection session: the number that the user works on, the
//! format that is used to store it and the text of the input field.

extern crate alloc;

use super::codec::{components, decode, encode, FloatComponents, Reconstruction};
use super::error::Error;
use super::format::Precision;
use super::mutate;
use super::step::{self, Direction};
use super::string::{format_decimal, parse_input};
use alloc::format;
use alloc::string::String;

/// The number of characters of the decimal expansion that are copied into
/// the input field after a bit is toggled.
const TOGGLE_TEXT_LEN: usize = 20;

/// Well known values that the session can jump to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    NaN,
    Infinity,
    Tenth,
    One,
    NegativeZero,
    /// The largest finite f64.
    Max,
    /// The smallest positive f64 subnormal.
    Min,
    Pi,
}

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::NaN,
        Preset::Infinity,
        Preset::Tenth,
        Preset::One,
        Preset::NegativeZero,
        Preset::Max,
        Preset::Min,
        Preset::Pi,
    ];

    pub fn value(&self) -> f64 {
        match self {
            Preset::NaN => f64::NAN,
            Preset::Infinity => f64::INFINITY,
            Preset::Tenth => 0.1,
            Preset::One => 1.0,
            Preset::NegativeZero => -0.0,
            Preset::Max => f64::MAX,
            Preset::Min => 5e-324,
            Preset::Pi => core::f64::consts::PI,
        }
    }
}

/// Renders `value` the short way, with the same spelling of the special
/// values that the input field accepts.
fn short_text(value: f64) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value == f64::INFINITY {
        String::from("Infinity")
    } else if value == f64::NEG_INFINITY {
        String::from("-Infinity")
    } else {
        format!("{}", value)
    }
}

/// Holds the state of one session. The held value is always an f64; the
/// precision only decides how it is stored when it is inspected, toggled or
/// stepped.
#[derive(Debug, Clone)]
pub struct Inspector {
    value: f64,
    precision: Precision,
    input: String,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    /// Start a session on 0.1, stored in single precision.
    pub fn new() -> Self {
        Inspector {
            value: 0.1,
            precision: Precision::Single,
            input: String::from("0.1"),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// The text of the input field.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Switch the storage format. The held value is not changed.
    pub fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
    }

    /// Replace the text of the input field. The value follows the text when
    /// the text parses, and stays unchanged otherwise.
    pub fn set_input(&mut self, text: &str) {
        self.input = String::from(text);
        match parse_input(text) {
            Ok(value) => self.value = value,
            Err(err) => log::debug!(
                "keeping {} for input {:?}: {}",
                self.value,
                text,
                err
            ),
        }
    }

    /// Called when the user is done editing. Special values get their
    /// canonical spelling.
    pub fn commit_input(&mut self) {
        if !self.value.is_finite() {
            self.input = short_text(self.value);
        }
    }

    /// Flip one bit of the stored pattern.
    pub fn toggle_bit(&mut self, index: usize) -> Result<(), Error> {
        let value = mutate::toggle_bit(self.value, self.precision, index)?;
        self.value = value;
        self.input = format_decimal(value)
            .chars()
            .take(TOGGLE_TEXT_LEN)
            .collect();
        Ok(())
    }

    /// Move to the neighboring representable value.
    pub fn step(&mut self, direction: Direction) {
        self.value = step::step(self.value, self.precision, direction);
        self.input = short_text(self.value);
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        self.value = preset.value();
        self.input = short_text(self.value);
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
        self.input = String::from("0");
    }

    /// The fields of the pattern that stores the held value.
    pub fn components(&self) -> FloatComponents {
        components(self.value, self.precision)
    }

    pub fn reconstruction(&self) -> Option<Reconstruction> {
        self.components().reconstruction()
    }

    /// The value that the format actually stores.
    pub fn stored_value(&self) -> f64 {
        decode(encode(self.value, self.precision))
    }

    /// Returns true if storing the held value changed it. NaNs are never
    /// reported as lost.
    pub fn is_precision_lost(&self) -> bool {
        let stored = self.stored_value();
        let both_nan = self.value.is_nan() && stored.is_nan();
        !both_nan && stored.to_bits() != self.value.to_bits()
    }

    /// The held value, for comparison with the stored one when the format is
    /// narrower than f64. Returns None for double precision and for the
    /// special values.
    pub fn raw_reference(&self) -> Option<String> {
        if self.precision == Precision::Double || !self.value.is_finite() {
            return None;
        }
        Some(format!("{}", self.value))
    }
}

#[test]
fn test_initial_state() {
    let s = Inspector::default();
    assert_eq!(s.value(), 0.1);
    assert_eq!(s.precision(), Precision::Single);
    assert_eq!(s.input(), "0.1");
    assert_eq!(s.components().hex, "3DCCCCCD");
    assert_eq!(s.stored_value(), 0.10000000149011612);
    assert!(s.is_precision_lost());
    assert_eq!(s.raw_reference().as_deref(), Some("0.1"));
}

#[test]
fn test_input_parsing() {
    let mut s = Inspector::new();
    s.set_input("2.5");
    assert_eq!(s.value(), 2.5);
    assert_eq!(s.input(), "2.5");

    // Half-typed text keeps the old value.
    s.set_input("2.5e");
    assert_eq!(s.value(), 2.5);
    assert_eq!(s.input(), "2.5e");
    s.set_input("");
    assert_eq!(s.value(), 2.5);

    s.set_input("infinity");
    assert_eq!(s.value(), f64::INFINITY);
    assert_eq!(s.input(), "infinity");
    s.commit_input();
    assert_eq!(s.input(), "Infinity");

    s.set_input("nan");
    s.commit_input();
    assert!(s.value().is_nan());
    assert_eq!(s.input(), "NaN");

    // Finite values keep the typed text.
    s.set_input(" 1.50 ");
    s.commit_input();
    assert_eq!(s.input(), " 1.50 ");
}

#[test]
fn test_toggle_updates_text() {
    let mut s = Inspector::new();
    s.toggle_bit(0).unwrap();
    assert_eq!(s.value(), -0.10000000149011612);
    assert_eq!(s.input(), "-0.10000000149011611");
    assert_eq!(s.input().len(), TOGGLE_TEXT_LEN);

    let err = s.toggle_bit(32).unwrap_err();
    assert_eq!(err, Error::InvalidBitIndex { index: 32, width: 32 });
    assert_eq!(s.value(), -0.10000000149011612);

    s.set_precision(Precision::Half);
    s.set_input("1");
    s.toggle_bit(15).unwrap();
    assert_eq!(s.input(), "1.0009765625");
}

#[test]
fn test_step_updates_text() {
    let mut s = Inspector::new();
    s.set_precision(Precision::Half);
    s.set_input("65504");
    s.step(Direction::Next);
    assert_eq!(s.value(), f64::INFINITY);
    assert_eq!(s.input(), "Infinity");
    s.step(Direction::Prev);
    assert_eq!(s.input(), "65504");

    s.reset();
    assert_eq!(s.input(), "0");
    s.step(Direction::Next);
    assert_eq!(s.value(), 5.960464477539063e-8);
    assert!(s.input().starts_with("0.0000000596046447753906"));
    assert_eq!(parse_input(s.input()), Ok(s.value()));
}

#[test]
fn test_presets() {
    let mut s = Inspector::new();
    for preset in Preset::ALL {
        s.apply_preset(preset);
        let v = preset.value();
        assert!(s.value().to_bits() == v.to_bits() || v.is_nan());
        // The text of every preset parses back to the preset.
        let parsed = parse_input(s.input()).unwrap();
        assert!(
            parsed.to_bits() == v.to_bits() || (v.is_nan() && parsed.is_nan())
        );
    }

    s.apply_preset(Preset::Max);
    s.set_precision(Precision::Single);
    assert_eq!(s.stored_value(), f64::INFINITY);
    assert!(s.is_precision_lost());
    s.set_precision(Precision::Double);
    assert!(!s.is_precision_lost());
    assert_eq!(s.raw_reference(), None);

    s.apply_preset(Preset::NaN);
    assert!(!s.is_precision_lost());
    assert!(s.reconstruction().is_none());
}

#[test]
fn test_precision_switch_keeps_value() {
    let mut s = Inspector::new();
    s.set_input("0.1");
    s.set_precision(Precision::Half);
    assert_eq!(s.value(), 0.1);
    assert_eq!(s.components().full_binary, "0010111001100110");
    s.set_precision(Precision::Double);
    assert_eq!(s.value(), 0.1);
    assert_eq!(s.stored_value(), 0.1);
    let r = s.reconstruction().unwrap();
    assert_eq!(r.effective_exponent, -4);
}
