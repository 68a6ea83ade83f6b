use alloc::string::String;

/// The errors that the engine reports. Special floating-point values (NaN,
/// infinities, signed zeros, subnormals) are ordinary values and never show
/// up here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A bit index outside of `[0, width)` was passed to the bit mutator.
    #[error("bit index {index} is out of range for a {width}-bit pattern")]
    InvalidBitIndex { index: usize, width: usize },
    /// An untyped precision tag did not name a supported format.
    #[error("unsupported precision: {0}")]
    UnsupportedPrecision(String),
}
