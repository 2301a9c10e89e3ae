//! This module and its submodules contain a bit-accurate software implementation of posit
//! encoding, decoding, and addition, for any width `nbits` from 2 to 64 and any number of exponent
//! bits `es` that keeps the dynamic range within that of an IEEE `f64`. Unlike a type-level posit
//! library, the format is chosen at *runtime*, by a [`Format`] value, since the fault model in
//! [`crate::fault`] needs to switch between widths on the fly.
//!
//! Posit bit patterns are plain `u64`s, with the posit in the lowest `nbits` bits (anything above
//! that is ignored, i.e. masked off, by every operation).
//!
//! Some notation used in the comments:
//!
//!   - **Leftmost bits/msb**: most-significant bits.
//!   - **Rightmost bits/lsb**: least-significant bits.
//!   - **Bit 0, bit 1, .. bit N-1**: numbered least significant to most significant, starts at 0.
//!   - **Run**: the run of identical bits right after the sign bit (after taking the two's
//!     complement of negative posits), which encodes the regime.

/// The shape of a posit format: `nbits` bits in total, of which up to `es` are exponent bits.
///
/// A `Format` is always valid; build one with [`Format::new`].
///
/// ```
/// # use posit_fault::Format;
/// let p32 = Format::new(32, 2)?;
/// assert_eq!(p32.encode(1.0), 0x4000_0000);
/// assert_eq!(p32.decode(0x4800_0000), 2.0);
/// # Ok::<(), posit_fault::ConfigurationError>(())
/// ```
#[derive(Clone, Copy, Debug)]
#[derive(Eq, PartialEq, Hash)]
pub struct Format {
  nbits: u32,
  es: u32,
}

/// A posit bit pattern together with the [`Format`] it is to be interpreted in.
///
/// Equality is equality of bit patterns *and* formats, so `0 == -0` trivially (there is only one
/// zero) and `NaR == NaR`.
#[derive(Clone, Copy)]
#[derive(Eq, PartialEq, Hash)]
pub struct Posit {
  bits: u64,
  format: Format,
}

/// In the course of decoding, encoding, and performing arithmetic, a *regular* posit (i.e. not 0
/// or NaR) is represented as a sign, a scale, and a fraction.
///
/// The value is `(-1)^sign × frac / 2^FRAC_WIDTH × 2^exp`.
#[derive(Clone, Copy)]
#[derive(Eq, PartialEq)]
pub(crate) struct Decoded {
  /// Whether the number is negative.
  pub sign: bool,
  /// The scale of the number: `(regime << es) + exponent`. Not clamped to the format's range;
  /// the encoder saturates.
  pub exp: i32,
  /// The fraction, including the hidden bit, as an unsigned fixed-point number with the point
  /// [`Decoded::FRAC_WIDTH`] bits from the right. That is, a normalised `frac` is in
  /// `[1 << FRAC_WIDTH, 2 << FRAC_WIDTH)`.
  ///
  /// Having the hidden bit at bit 125 leaves one bit of headroom for the carry of an addition,
  /// and at least 64 bits below the lowest fraction bit of any posit, which is plenty of room for
  /// the round and sticky bits.
  pub frac: u128,
}

impl Decoded {
  /// The [`Decoded::frac`] field has the binary point [`Decoded::FRAC_WIDTH`] bits from the
  /// right.
  pub(crate) const FRAC_WIDTH: u32 = u128::BITS - 3;

  /// Checks whether `self` is "normalised", i.e. whether the hidden bit of `frac` is set and
  /// nothing above it is.
  pub(crate) fn is_normalised(self) -> bool {
    self.frac >> Self::FRAC_WIDTH == 1
  }
}

/// Basics
mod basics;

/// Constants (zero, min, min_positive, etc)
mod consts;

/// Decoding regular posits into sign, scale and fraction
mod decode;

/// Encoding a sign, scale and fraction into a posit, with rounding
mod encode;

/// Conversions between posits and `f64`
mod convert;

/// Addition
mod add;

/// The scale code of a posit
pub(crate) mod scale;

/// Debug and Display
mod fmt;


/// Exact rational oracle for testing
#[cfg(test)]
pub(crate) mod rational;

pub use scale::Scale;
