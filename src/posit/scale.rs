use super::*;
use crate::underlying::{Bits, FixedBin, bit_length};

use core::fmt;

/// The *scale code* of a posit: a hardware-style `(regime << es) | exponent` field, as produced by
/// the leading-zero-count datapath of a posit adder. See [`Format::scale`].
///
/// A scale code is an unsigned `width`-bit number, where `width` depends only on a *reference
/// width* and `es`, so that codes computed at different posit widths can be compared with each
/// other.
#[derive(Clone, Copy, Debug)]
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Scale {
  code: u32,
  width: u32,
}

impl Scale {
  /// The width of scale codes: `ceil(log2(reference_nbits)) + es`.
  pub const fn width_for(reference_nbits: u32, es: u32) -> u32 {
    bit_length(reference_nbits.saturating_sub(1)) + es
  }

  /// The code, as an unsigned number.
  #[inline]
  pub const fn code(self) -> u32 {
    self.code
  }

  /// The nominal width of the code in bits.
  #[inline]
  pub const fn width(self) -> u32 {
    self.width
  }

  /// The absolute difference between two codes.
  pub const fn abs_diff(self, other: Self) -> u32 {
    self.code.abs_diff(other.code)
  }

  /// The code as a zero-padded bit string of `width` digits.
  pub fn to_bin(self) -> FixedBin {
    FixedBin { bits: u64::from(self.code), width: self.width }
  }
}

impl fmt::Display for Scale {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.to_bin(), f)
  }
}

impl fmt::Binary for Scale {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.to_bin(), f)
  }
}

impl Format {
  /// Extract the scale code of the posit `bits` (interpreted at this format's width), rendered at
  /// the width fixed by `reference_nbits` (see [`Scale::width_for`]).
  ///
  /// This mirrors what an adder's regime decoder does in hardware, without taking the two's
  /// complement of negative numbers first:
  ///
  /// 1. Look at the first regime bit `rc` (bit `nbits - 2`). If it is 1, invert the word, so that
  ///    the regime is always a run of 0s.
  /// 2. Drop the sign bit, and append `rc` at the right end (so that a word whose run reaches the
  ///    end still has a terminating 1). Count the leading zeros `k` of that.
  /// 3. The regime code is `k - 1` if `rc` was 1, else `k`. Note that this is the *length* of the
  ///    run (minus one, for runs of 1s), **not** the signed regime: magnitudes above and below 1
  ///    with the same run length get the same regime code.
  /// 4. The exponent is the ES bits right after the run and its terminating bit.
  ///
  /// The code of 0 is 0.
  ///
  /// `reference_nbits` is not checked against `nbits`. If it is narrower, long regimes can give a
  /// code wider than [`Scale::width`], which is then displayed with as many digits as it needs.
  ///
  /// ```
  /// # use posit_fault::Format;
  /// let p32 = Format::new(32, 2)?;
  /// assert_eq!(p32.scale(p32.encode(2.), 32).to_string(), "0000001");
  /// assert_eq!(p32.scale(p32.encode(16.), 32).to_string(), "0000100");
  /// # Ok::<(), posit_fault::ConfigurationError>(())
  /// ```
  pub fn scale(self, bits: u64, reference_nbits: u32) -> Scale {
    let n = self.nbits;
    let width = Scale::width_for(reference_nbits, self.es);
    let bits = bits & self.mask();
    if bits == self.zero() {
      return Scale { code: 0, width }
    }

    // Step 1: polarise, so that the regime is a run of 0s.
    //
    // Example (nbits = 8):
    //   bits      = 0b0_1110_101
    //   rc        = 1
    //   polarised = 0b1_0001_010
    let rc = bits.bit(n - 2);
    let polarised = if rc { !bits & self.mask() } else { bits };

    // Step 2: drop the sign, append `rc`, count.
    //
    //   aux       = 0b0001_0101
    //   run       = 3
    //   regime    = 2
    let aux = (polarised.mask_lsb(n - 1) << 1) | u64::from(rc);
    let run = aux.leading_zeros_in(n);
    let regime = if rc { run - 1 } else { run };

    // Step 4: take the bits after the sign and first regime bit, shift them left by the run
    // length (plus the two dropped bits), which gets rid of the run and its terminating bit, and
    // read off the top ES bits. Missing exponent bits are 0s.
    //
    //   low       = 0b0000_0000_110_101
    //   shifted   = 0b0101_0000  (masked to 8 bits)
    //   exponent  = 0b01
    let low = u128::from(bits.mask_lsb(n.saturating_sub(2))) << 2;
    let shifted = (low << run).mask_lsb(n);
    let exponent = shifted.lshr(n - self.es).mask_lsb(self.es) as u32;

    Scale { code: (regime << self.es) | exponent, width }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn format(nbits: u32, es: u32) -> Format {
    Format::new(nbits, es).unwrap()
  }

  #[test]
  fn width() {
    assert_eq!(Scale::width_for(32, 2), 7);
    assert_eq!(Scale::width_for(16, 2), 6);
    assert_eq!(Scale::width_for(33, 2), 8);
    assert_eq!(Scale::width_for(8, 0), 3);
    assert_eq!(Scale::width_for(2, 1), 2);
  }

  #[test]
  fn zero() {
    let p32 = format(32, 2);
    assert_eq!(p32.scale(0, 32), Scale { code: 0, width: 7 });
    assert_eq!(p32.scale(0, 32).to_string(), "0000000");
  }

  #[test]
  fn p32_manual() {
    let p32 = format(32, 2);
    for (value, code) in [
      (1., 0b000_00),
      (2., 0b000_01),
      (4., 0b000_10),
      (8., 0b000_11),
      (16., 0b001_00),
      (3. * 16., 0b001_01),
      (256., 0b010_00),
      (0.5, 0b001_11),     // Run of one 0: same regime code as 16
      (0.25, 0b001_10),
      (1. / 16., 0b001_00),
      (1. / 256., 0b010_00),
    ] {
      assert_eq!(p32.scale(p32.encode(value), 32).code(), code, "{value}")
    }
  }

  #[test]
  fn narrow_at_reference_width() {
    // The same value, at 16 and 32 bits, gets the same code at the same width.
    let p16 = format(16, 2);
    let p32 = format(32, 2);
    for value in [1., 2., 3., 7.5, 100., 1e6, 0.1] {
      assert_eq!(p16.scale(p16.encode(value), 32), p32.scale(p32.encode(value), 32), "{value}");
    }
    assert_eq!(p16.scale(0x4800, 32).to_string(), "0000001");
  }

  #[test]
  fn long_regime() {
    let p32 = format(32, 2);
    // MAX: a run of 31 1s, no terminating bit
    assert_eq!(p32.scale(p32.max(), 32).code(), 30 << 2);
    // MIN_POSITIVE: a run of 30 0s
    assert_eq!(p32.scale(p32.min_positive(), 32).code(), 30 << 2);
    let p8 = format(8, 2);
    // 0 | 111110 | 1: a single exponent bit, the other one is missing
    assert_eq!(p8.scale(0b0_111110_1, 8).code(), 0b100_10);
  }

  #[test]
  fn reference_narrower_than_format() {
    let p32 = format(32, 2);
    let scale = p32.scale(p32.max(), 16);
    assert_eq!(scale.width(), 6);
    assert_eq!(scale.code(), 30 << 2);
    assert_eq!(scale.to_string(), "1111000");
    // Short regimes still fit
    assert_eq!(p32.scale(p32.encode(2.), 16).to_string(), "000001");
  }

  #[test]
  fn es_0() {
    let p8 = format(8, 0);
    assert_eq!(p8.scale(p8.encode(1.), 8).code(), 0);
    assert_eq!(p8.scale(p8.encode(2.), 8).code(), 1);
    assert_eq!(p8.scale(p8.encode(4.), 8).code(), 2);
    assert_eq!(p8.scale(p8.encode(0.5), 8).code(), 1);
  }

  #[test]
  fn tiny_widths() {
    let p2 = format(2, 0);
    assert_eq!(p2.scale(0b01, 2).code(), 0);
    let p3 = format(3, 1);
    assert_eq!(p3.scale(0b011, 3).code(), 0b1_0);
    assert_eq!(p3.scale(0b001, 3).code(), 0b1_0);
  }

  #[test]
  fn code_fits_width() {
    for (nbits, es) in [(8, 2), (10, 1), (12, 3)] {
      let format = format(nbits, es);
      for bits in format.cases_exhaustive().filter(|&bits| !bits.is_negative_in(nbits)) {
        let scale = format.scale(bits, nbits);
        assert!(scale.code() < 1 << scale.width(), "{bits:#b}: {scale:?}");
        assert_eq!(scale.to_string().len(), scale.width() as usize);
      }
    }
  }
}
