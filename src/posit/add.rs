use super::*;
use crate::underlying::Bits;

impl Format {
  /// Add the magnitudes or subtract them, depending on the signs, returning the unrounded result
  /// and the sticky bit (whether any nonzero bits were lost).
  ///
  /// `x` and `y` cannot be symmetrical (`x == -y`), since the result would be 0, which has no
  /// [`Decoded`] representation.
  pub(crate) fn add_kernel(x: Decoded, y: Decoded) -> (Decoded, bool) {
    /*dbg!(x, y);*/

    // First, put the operand of larger magnitude first; the result has its sign, and the other one
    // has to be shifted right to align the binary points.
    let (x, y) = if (x.exp, x.frac) >= (y.exp, y.frac) { (x, y) } else { (y, x) };
    let shift = (x.exp - y.exp) as u32;

    // Align. Bits of `y` shifted out below the end of the register can't be added, but they must
    // not be forgotten either: they go to `lost`. Note that the lowest 64 bits of a `frac` decoded
    // from a posit are always 0, so nothing at all is lost unless `shift > 64`, and then `y` is
    // so much smaller than `x` that it only matters for rounding, via the sticky bit.
    let yfrac = y.frac.lshr(shift);
    let lost = y.frac.mask_lsb(shift.min(u128::BITS)) != 0;
    let exp = x.exp;

    if x.sign == y.sign {
      // Adding two values of the same sign: an overflow by 1 place *may* occur. For example
      //
      //     1.25 = 0b01_0100
      //   + 1.0  = 0b01_0000
      //   = 2.25 = 0b10_0100
      //
      // If this happens, we must detect this, shift the `frac` right by 1 (i.e. divide by 2), and
      // add 1 to exponent to compensate
      //
      //   = 1.125 × 2¹ = 0b01_0010, add +1 to `exp`
      //
      // There is always room for that carry in the register: `frac` is below 2 << FRAC_WIDTH.
      let frac = x.frac + yfrac;
      let overflow = frac >> (Decoded::FRAC_WIDTH + 1) != 0;
      let sticky = lost | (overflow & frac.get_lsb());
      let frac = frac >> u32::from(overflow);
      (Decoded { sign: x.sign, exp: exp + i32::from(overflow), frac }, sticky)
    } else {
      // Adding values of opposite signs: subtract the smaller magnitude from the larger. An
      // underflow by n places *may* occur. For example
      //
      //     1.25 = 0b01_0100
      //   - 1.0  = 0b01_0000
      //   = 0.25 = 0b00_0100
      //
      // If this happens, we must detect this, shift the `frac` left by `n` (i.e. multiply by 2^n),
      // and subtract `n` to the exponent to compensate.
      //
      //   = 1.00 × 2¯² = 0b01_0000, add -2 to `exp`
      //
      // If bits of `y` were `lost`, the true difference is a little *less* than `x.frac - yfrac`.
      // Subtracting one more unit in the last place, and setting the sticky bit, represents
      // exactly that: "a bit more than `x.frac - yfrac - 1`". Since `lost` implies `shift > 64`,
      // the underflow is at most 1 place, so this unit stays way below the rounding position.
      let frac = x.frac - yfrac - u128::from(lost);
      debug_assert!(frac != 0, "Precondition violated: {x:?} and {y:?} are symmetrical");
      let underflow = frac.leading_zeros() - (u128::BITS - 1 - Decoded::FRAC_WIDTH);
      let frac = frac << underflow;
      (Decoded { sign: x.sign, exp: exp - underflow as i32, frac }, lost)
    }
  }

  /// Add two posits of this format, rounding the result to nearest (ties to even bit pattern).
  ///
  /// - If either operand is NaR, the result is NaR.
  /// - Otherwise, if either operand is 0, the result is the other operand.
  /// - Otherwise the result is correctly rounded, and saturates at [`Self::max`] /
  ///   [`Self::min_positive`] (and their negatives) rather than overflowing to NaR or underflowing
  ///   to 0. In particular, `x + -x == 0` exactly.
  ///
  /// Addition is commutative. Bits above the lowest `nbits` of the operands are ignored.
  ///
  /// ```
  /// # use posit_fault::Format;
  /// let p16 = Format::new(16, 2)?;
  /// let sum = p16.add(p16.encode(3.), p16.encode(4.));
  /// assert_eq!(p16.decode(sum), 7.);
  /// assert_eq!(p16.add(p16.max(), p16.max()), p16.max());
  /// # Ok::<(), posit_fault::ConfigurationError>(())
  /// ```
  pub fn add(self, a: u64, b: u64) -> u64 {
    let a = a & self.mask();
    let b = b & self.mask();
    if a == self.nar() || b == self.nar() {
      self.nar()
    } else if a == self.zero() {
      b
    } else if b == self.zero() {
      a
    } else if a.wrapping_add(b) & self.mask() == self.zero() {
      self.zero()
    } else {
      let (result, sticky) = Self::add_kernel(
        self.decode_regular(a),
        self.decode_regular(b),
      );
      self.encode_round(result, sticky)
    }
  }
}
