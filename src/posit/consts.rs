use super::*;
use crate::underlying::Bits;

/// `2^exp` as an `f64`, for `exp` in the normal range.
pub(crate) fn power_of_2(exp: i32) -> f64 {
  debug_assert!((f64::MIN_EXP - 1 ..= f64::MAX_EXP - 1).contains(&exp));
  f64::from_bits(((exp + 1023) as u64) << 52)
}

impl Format {
  /// Zero (`0`), the additive identity element.
  //
  // Represented by the bit pattern `0b0000...0`.
  #[inline]
  pub const fn zero(self) -> u64 {
    0
  }

  /// Not-a-real (`NaR`).
  //
  // Represented by the bit pattern `0b1000...0`.
  #[inline]
  pub const fn nar(self) -> u64 {
    1 << (self.nbits - 1)
  }

  /// Largest representable value (`MAXPOS`), equal to `-min`.
  //
  // Represented by the bit pattern `0b0111...1`.
  #[inline]
  pub const fn max(self) -> u64 {
    self.nar() - 1
  }

  /// Smallest representable value, equal to `-max`.
  ///
  /// Not to be confused with the smallest absolute value, i.e. [`Self::min_positive`]!
  //
  // Represented by the bit pattern `0b100...01`.
  #[inline]
  pub const fn min(self) -> u64 {
    self.nar() + 1
  }

  /// Smallest *positive* value (`MINPOS`), equal to `-max_negative`.
  //
  // Represented by the bit pattern `0b000...01`.
  #[inline]
  pub const fn min_positive(self) -> u64 {
    1
  }

  /// Largest *negative* value, equal to `-min_positive`.
  //
  // Represented by the bit pattern `0b1111...1`.
  #[inline]
  pub fn max_negative(self) -> u64 {
    self.mask()
  }

  /// One (`1`), the multiplicative identity element.
  //
  // Represented by the bit pattern `0b0100...0`.
  #[inline]
  pub const fn one(self) -> u64 {
    1 << (self.nbits - 2)
  }

  /// Negative one (`-1`).
  //
  // Represented by the bit pattern `0b1100...0`.
  #[inline]
  pub fn minus_one(self) -> u64 {
    self.one().neg_in(self.nbits)
  }

  /// The maximum exponent; [`Self::max`] = 2 <sup>[`Self::max_exp`]</sup>.
  #[inline]
  pub const fn max_exp(self) -> i32 {
    ((self.nbits - 2) << self.es) as i32
  }

  /// The minimum exponent; [`Self::min_positive`] = 2 <sup>[`Self::min_exp`]</sup>.
  #[inline]
  pub const fn min_exp(self) -> i32 {
    -self.max_exp()
  }

  /// The value of [`Self::max`], i.e. `useed ^ (nbits - 2)`.
  pub fn max_value(self) -> f64 {
    power_of_2(self.max_exp())
  }

  /// The value of [`Self::min_positive`], i.e. `useed ^ -(nbits - 2)`.
  pub fn min_positive_value(self) -> f64 {
    power_of_2(self.min_exp())
  }
}
