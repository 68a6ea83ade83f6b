//! Bitfloat is a library for inspecting how IEEE-754 binary16, binary32 and
//! binary64 numbers are stored. It converts numbers to their exact bit
//! patterns and back, splits the patterns into the sign, exponent and
//! mantissa fields, flips single bits, walks to the neighboring representable
//! values and prints the exact decimal value of what is stored.
//!
//! The binary16 format is implemented in software, on top of the binary32
//! conversion, so it does not depend on hardware support.
//!
//! ```
//!  use bitfloat::{components, format_decimal, Precision};
//!
//!  let c = components(0.1, Precision::Single);
//!  assert_eq!(c.hex, "3DCCCCCD");
//!  assert_eq!(c.exponent, "01111011");
//!  assert!(format_decimal(c.value).starts_with("0.100000001"));
//! ```
//!
//! Stepping and bit toggling act on the stored pattern:
//!
//! ```
//!  use bitfloat::{step, toggle_bit, Direction, Precision};
//!
//!  let up = step(1.0, Precision::Half, Direction::Next);
//!  assert_eq!(up, 1.0009765625);
//!  assert_eq!(toggle_bit(up, Precision::Half, 15).unwrap(), 1.0);
//!  assert_eq!(step(1e5, Precision::Half, Direction::Prev), 65504.0);
//! ```
//!
//! The crate is `no_std` (with `alloc`). The `python` feature builds the
//! python bindings.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod bigint;
mod codec;
mod error;
mod format;
mod half;
mod inspector;
mod mutate;
mod step;
mod string;
mod utils;

#[cfg(feature = "python")]
mod py;

pub use self::codec::{
    components, decode, encode, BitPattern, Category, FloatComponents,
    Reconstruction,
};
pub use self::error::Error;
pub use self::format::{
    BitField, Precision, PrecisionFormat, DOUBLE, HALF, SINGLE,
};
pub use self::half::{decode16, encode16, MAX_FINITE as HALF_MAX};
pub use self::inspector::{Inspector, Preset};
pub use self::mutate::{toggle_bit, toggle_pattern_bit};
pub use self::step::{step, step_pattern, step_sign_magnitude, Direction};
pub use self::string::{format_decimal, parse_input, ParseError};
