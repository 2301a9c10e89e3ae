//! Errors for invalid format and simulation parameters.
//!
//! Arithmetic itself never fails: values out of range saturate, and NaR is an ordinary value
//! that propagates. Only *configurations* can be rejected, and they are rejected up front, when a
//! [`Format`] or a [`TruncationConfig`](crate::TruncationConfig) is built.

use crate::Format;

/// A set of parameters that does not describe a valid posit format or fault simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
  /// Posits must have between 2 and 64 bits.
  #[error("posit width must be between 2 and 64 bits, got {nbits}")]
  WidthOutOfRange { nbits: u32 },

  /// Too many exponent bits: either more than `nbits`, or so many that the dynamic range
  /// (`2^((nbits - 2) * 2^es)`) exceeds the normal range of an `f64`.
  #[error("{es} exponent bits are too many for a {nbits}-bit posit")]
  ExponentOutOfRange { nbits: u32, es: u32 },

  /// The truncated width is larger than the full width.
  #[error("cannot truncate a {nbits}-bit posit to {trunc_amount} bits")]
  TruncationTooWide { nbits: u32, trunc_amount: u32 },

  /// The inspected fraction bit cannot exist in any posit of this format.
  #[error("fraction bit {frac_size} cannot exist in a {nbits}-bit posit with {es} exponent bits")]
  FractionBitOutOfRange { nbits: u32, es: u32, frac_size: u32 },

  /// The reference width, which fixes the width of scale codes, is narrower than the posits
  /// whose scale it describes.
  #[error("reference width {reference_nbits} is narrower than the {nbits}-bit posits it describes")]
  ReferenceTooNarrow { nbits: u32, reference_nbits: u32 },

  /// Two posits of different formats were combined.
  #[error("cannot combine a posit of format {lhs} with one of format {rhs}")]
  FormatMismatch { lhs: Format, rhs: Format },
}
