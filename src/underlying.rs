//! This module contains the bit-level operations needed by the posit codec, the adder, and the
//! scale extractor. A posit of any width up to 64 bits lives in the low bits of a `u64`; the
//! adder's working registers are `u128`. Both implement the [`Bits`] trait.
//!
//! All functions that take a `width` operate on the lowest `width` bits of the value, i.e. they
//! treat it as an unsigned (or two's complement) integer of exactly that many bits.

use core::fmt;

/// Unsigned machine words that can hold a posit bit pattern or a working register.
pub trait Bits: Copy + Eq + fmt::Debug {
  const BITS: u32;

  /// A value with the lowest `width` bits set. `width` may be anything in `0 ..= Self::BITS`.
  ///
  /// ```ignore
  /// assert_eq!(u64::mask(4), 0b1111)
  /// ```
  fn mask(width: u32) -> Self;

  /// Set all bits more significant than `n` to 0.
  ///
  /// ```ignore
  /// assert_eq!(0xabcd_u64.mask_lsb(4), 0x000d_u64)
  /// ```
  fn mask_lsb(self, n: u32) -> Self;

  /// Get bit `n` (counted from the lsb) as a bool.
  fn bit(self, n: u32) -> bool;

  /// Get the lsb of `self` as a bool.
  fn get_lsb(self) -> bool;

  /// Shift left, yielding 0 (rather than panicking or wrapping) if `n >= Self::BITS`.
  fn lshl(self, n: u32) -> Self;

  /// Shift right, yielding 0 (rather than panicking or wrapping) if `n >= Self::BITS`.
  fn lshr(self, n: u32) -> Self;

  /// Number of leading 0 bits of `self` viewed as a `width`-bit number. This is `width` if
  /// `self` is 0.
  fn leading_zeros_in(self, width: u32) -> u32;

  /// Two's complement negation of `self` viewed as a `width`-bit number.
  fn neg_in(self, width: u32) -> Self;

  /// Whether `self`, viewed as a `width`-bit two's complement number, is negative (i.e. whether
  /// bit `width - 1` is set).
  fn is_negative_in(self, width: u32) -> bool;

  /// Two's complement absolute value of `self` viewed as a `width`-bit number. Note that, as for
  /// machine ints, the most negative number is its own absolute value.
  fn abs_in(self, width: u32) -> Self;
}

macro_rules! impl_bits {
  ($uint:ty) => {
    impl Bits for $uint {
      const BITS: u32 = <$uint>::BITS;

      #[inline]
      fn mask(width: u32) -> Self {
        debug_assert!(width <= Self::BITS);
        if width >= Self::BITS { <$uint>::MAX } else { (1 << width) - 1 }
      }

      #[inline]
      fn mask_lsb(self, n: u32) -> Self {
        self & Self::mask(n)
      }

      #[inline]
      fn bit(self, n: u32) -> bool {
        self.lshr(n) & 1 == 1
      }

      #[inline]
      fn get_lsb(self) -> bool {
        self & 1 == 1
      }

      #[inline]
      fn lshl(self, n: u32) -> Self {
        self.checked_shl(n).unwrap_or(0)
      }

      #[inline]
      fn lshr(self, n: u32) -> Self {
        self.checked_shr(n).unwrap_or(0)
      }

      #[inline]
      fn leading_zeros_in(self, width: u32) -> u32 {
        debug_assert!(self.mask_lsb(width) == self, "{self:#b} does not fit in {width} bits");
        self.leading_zeros() - (Self::BITS - width)
      }

      #[inline]
      fn neg_in(self, width: u32) -> Self {
        self.wrapping_neg().mask_lsb(width)
      }

      #[inline]
      fn is_negative_in(self, width: u32) -> bool {
        self.bit(width - 1)
      }

      #[inline]
      fn abs_in(self, width: u32) -> Self {
        if self.is_negative_in(width) { self.neg_in(width) } else { self.mask_lsb(width) }
      }
    }
  }
}

impl_bits!{u64}
impl_bits!{u128}

/// Number of bits needed to write `n` in binary, i.e. `ceil(log2(n + 1))`.
///
/// In particular `bit_length(n - 1)` is `ceil(log2(n))`, the number of bits needed to index `n`
/// things.
#[inline]
pub const fn bit_length(n: u32) -> u32 {
  u32::BITS - n.leading_zeros()
}

/// Displays the lowest `width` bits of a word in binary, zero-padded to exactly `width` digits
/// (or more, if the word does not fit).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedBin {
  pub bits: u64,
  pub width: u32,
}

impl fmt::Display for FixedBin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:0w$b}", self.bits, w = self.width as usize)
  }
}

/// Displays a `width`-bit word in upper-case hexadecimal, prefixed with `0x` and zero-padded to
/// `ceil(width / 4)` digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedHex {
  pub bits: u64,
  pub width: u32,
}

impl fmt::Display for FixedHex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{:0w$X}", self.bits, w = self.width.div_ceil(4) as usize)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mask() {
    assert_eq!(u64::mask(0), 0);
    assert_eq!(u64::mask(4), 0b1111);
    assert_eq!(u64::mask(63), u64::MAX >> 1);
    assert_eq!(u64::mask(64), u64::MAX);
    assert_eq!(u128::mask(125), u128::MAX >> 3);
    assert_eq!(u128::mask(128), u128::MAX);
  }

  #[test]
  fn mask_lsb() {
    assert_eq!(0xabcd_u64.mask_lsb(4), 0xd);
    assert_eq!(0xabcd_u64.mask_lsb(12), 0xbcd);
    assert_eq!(0xabcd_u64.mask_lsb(64), 0xabcd);
    assert_eq!(0xabcd_u128.mask_lsb(0), 0);
  }

  #[test]
  fn bit() {
    assert!(0b0100_u64.bit(2));
    assert!(!0b0100_u64.bit(1));
    assert!(!0b0100_u64.bit(64));
    assert!((1_u128 << 127).bit(127));
    assert!(0b0101_u64.get_lsb());
    assert!(!0b0100_u64.get_lsb());
  }

  #[test]
  fn shifts_saturate_to_zero() {
    assert_eq!(1_u64.lshl(63), 1 << 63);
    assert_eq!(1_u64.lshl(64), 0);
    assert_eq!(u64::MAX.lshr(64), 0);
    assert_eq!(u64::MAX.lshr(63), 1);
    assert_eq!(u128::MAX.lshr(200), 0);
  }

  #[test]
  fn leading_zeros_in() {
    assert_eq!(0b0001_0110_u64.leading_zeros_in(8), 3);
    assert_eq!(0b1001_0110_u64.leading_zeros_in(8), 0);
    assert_eq!(0_u64.leading_zeros_in(8), 8);
    assert_eq!(0_u64.leading_zeros_in(64), 64);
    assert_eq!(1_u64.leading_zeros_in(64), 63);
  }

  #[test]
  fn neg_abs() {
    assert_eq!(0b0000_0001_u64.neg_in(8), 0b1111_1111);
    assert_eq!(0b1111_1111_u64.neg_in(8), 0b0000_0001);
    assert_eq!(0b0101_u64.neg_in(4), 0b1011);
    assert_eq!(0_u64.neg_in(4), 0);
    assert_eq!(0b1000_u64.neg_in(4), 0b1000);

    assert_eq!(0b1011_u64.abs_in(4), 0b0101);
    assert_eq!(0b0101_u64.abs_in(4), 0b0101);
    assert_eq!(0b1000_u64.abs_in(4), 0b1000);
    assert_eq!((1_u64 << 63).abs_in(64), 1 << 63);
    assert_eq!(u64::MAX.abs_in(64), 1);

    assert!(0b1000_u64.is_negative_in(4));
    assert!(!0b1000_u64.is_negative_in(5));
  }

  #[test]
  fn bit_length() {
    assert_eq!(super::bit_length(0), 0);
    assert_eq!(super::bit_length(1), 1);
    assert_eq!(super::bit_length(7), 3);
    assert_eq!(super::bit_length(8), 4);
    assert_eq!(super::bit_length(15), 4);
    assert_eq!(super::bit_length(31), 5);
    assert_eq!(super::bit_length(63), 6);
  }

  #[test]
  fn fixed_width_display() {
    assert_eq!(format!("{}", FixedBin { bits: 0b101, width: 7 }), "0000101");
    assert_eq!(format!("{}", FixedBin { bits: 0b101, width: 2 }), "101");
    assert_eq!(format!("{}", FixedHex { bits: 0x4800, width: 16 }), "0x4800");
    assert_eq!(format!("{}", FixedHex { bits: 0x48, width: 32 }), "0x00000048");
    assert_eq!(format!("{}", FixedHex { bits: 0x1f, width: 6 }), "0x1F");
  }
}
