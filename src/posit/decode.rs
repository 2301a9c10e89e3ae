use super::*;
use crate::underlying::Bits;

#[derive(Debug)]
#[derive(PartialEq, Eq)]
pub(crate) enum TryDecoded {
  Zero,
  NaR,
  Regular(Decoded),
}

impl Format {
  /// Decode a posit. The core logic lives in [Self::decode_regular].
  pub(crate) fn try_decode(self, bits: u64) -> TryDecoded {
    let bits = bits & self.mask();
    if bits == self.zero() {
      TryDecoded::Zero
    } else if bits == self.nar() {
      TryDecoded::NaR
    } else {
      TryDecoded::Regular(self.decode_regular(bits))
    }
  }

  /// Decode a posit **which is not 0 or NaR** into its sign, scale, and fraction.
  pub(crate) fn decode_regular(self, bits: u64) -> Decoded {
    debug_assert!(
      !self.is_special(bits) && bits & self.mask() == bits,
      "Precondition violated: {bits:#b} is 0, NaR, or not a {}-bit pattern", self.nbits,
    );

    // The fields are interpreted from the two's complement absolute value of the bits, so start
    // by taking it (and remembering the sign).
    let sign = bits.is_negative_in(self.nbits);
    let abs = bits.abs_in(self.nbits);

    // Left-align the posit in the word and shift out the sign bit. Now the msb is the first bit of
    // the regime. We are looking for the length of the run of bits equal to it: if it's 0, this
    // is a run of 0s terminated by a 1 (which is always present, since the posit is not 0); if
    // it's 1, this is a run of 1s terminated by a 0 or by the end of the posit. In the latter case
    // the vacated bits on the right are 0s anyway, which terminate the run at the right place.
    //
    // Example (nbits = 8):
    //   abs     = 0b0_1110_101
    //   x       = 0b1110_1010_0000..
    //   run     = 3
    //   regime  = 2
    //
    // Example (nbits = 8):
    //   abs     = 0b0_0001_011
    //   x       = 0b0001_0110_0000..
    //   run     = 3
    //   regime  = -3
    let x = (abs << (u64::BITS - self.nbits)) << 1;
    let regime_sign = x.bit(u64::BITS - 1);
    let run = if regime_sign { (!x).leading_zeros() } else { x.leading_zeros() };
    debug_assert!(run <= self.nbits - 1);

    // The regime is
    //   -n  if it's a run of n 0s, or
    //   n-1 if it's a run of n 1s.
    let regime = if regime_sign { run as i32 - 1 } else { -(run as i32) };

    // Shift out the run and its terminating bit. After this, the leftmost ES bits are the
    // exponent. If there are fewer than ES bits left after the regime, the exponent is partially
    // or totally missing, and the missing bits are 0s, which is exactly what the shifts fill in.
    let y = x.lshl(run + 1);
    let exponent = y.lshr(u64::BITS - self.es) as i32;

    // What's left are the fraction bits, left-aligned. Put them right below the hidden bit.
    let fraction = y.lshl(self.es);
    let frac = (1 << Decoded::FRAC_WIDTH) | (u128::from(fraction) << (Decoded::FRAC_WIDTH - u64::BITS));

    Decoded { sign, exp: (regime << self.es) + exponent, frac }
  }
}
