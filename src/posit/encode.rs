use super::*;
use crate::underlying::Bits;

impl Format {
  /// Encode a posit, rounding if necessary. The rounding rule is always the same: "round to
  /// nearest, round ties to even bit pattern, never round to 0 (i.e. never over- or under-flow)".
  ///
  /// `sticky` is the sticky bit: it is `false` **if and only if** all of the bits lost before
  /// calling this function (i.e. those below the lsb of `decoded.frac`) were 0. In other words,
  /// accumulate any lost bits to `sticky`, then pass it to `encode_round` to get a correctly
  /// rounded posit.
  ///
  /// `decoded` has to be normalised ([`Decoded::is_normalised`]), but its `exp` may be anything:
  /// scales out of range saturate to the largest or smallest magnitude.
  pub(crate) fn encode_round(self, decoded: Decoded, sticky: bool) -> u64 {
    debug_assert!(
      decoded.is_normalised(),
      "Precondition violated: {decoded:?} does not have exactly the hidden bit in place",
    );
    let Decoded { sign, exp, frac } = decoded;

    // Start by splitting the scale into the regime (bits higher than the lowest ES) and the
    // exponent (lowest ES bits). Note `>>` on a signed int is an arithmetic shift, so this is
    // floor division, and the exponent is always nonnegative.
    let regime = exp >> self.es;
    let exponent = u64::from((exp - (regime << self.es)) as u32);

    // The regime is encoded as
    //
    //   A run of -n  0s followed by a 1, if n is negative
    //   A run of n+1 1s followed by a 0, if n is positive
    //
    // so the length of the run is `-n` or `n+1`, respectively.
    let run = (if regime >= 0 { regime + 1 } else { -regime }) as u32;

    // A corner case, before we proceed: posit rounding rules state that any number > MAX is
    // rounded to MAX and any number < MIN_POSITIVE is rounded to MIN_POSITIVE (and conversely for
    // negative numbers). We **never** round to 0 or to NaR.
    //
    // It suffices to clamp the regime *length*: the longest run that still leaves room for its
    // terminating bit is `nbits - 2`. Any longer run means the number is larger than
    // `useed ^ (nbits - 2)`, or smaller than `useed ^ -(nbits - 2)`, so we return early with MAX
    // or MIN_POSITIVE. The rest of the code can assume `run <= nbits - 2`.
    if run > self.nbits - 2 {
      let saturated = if regime >= 0 { self.max() } else { self.min_positive() };
      return if sign { saturated.neg_in(self.nbits) } else { saturated }
    }

    // The regime bits, not yet in place. A run of 1s followed by a 0 or a run of 0s followed by a
    // 1 (the 0s are implicit, they are the leading 0s of the word).
    //
    // Example:
    //   regime      = 2
    //   run         = 3
    //   regime_bits = 0b1110
    //
    // Example:
    //   regime      = -3
    //   run         = 3
    //   regime_bits = 0b0001
    let regime_bits = if regime >= 0 { u64::mask(run) << 1 } else { 1 };

    // After the sign bit and the `run + 1` regime bits, there are `nbits - 2 - run` bits left for
    // the exponent and the fraction. Place the regime bits right before those.
    let available = self.nbits - 2 - run;
    let mut bits = regime_bits << available;

    // Now comes a tricky part: the rounding. The rounding rules translate to a very simple rule in
    // terms of bit patterns: just "represent as an infinite-precision bit string, then round to
    // nearest, if tied round to even bit pattern".
    //
    // Some examples: let's say we have a bit string that we want to round at the |
    //
    //   0b010101|011011 -> round to nearest = down    -> 0b010101
    //   0b010101|111011 -> round to nearest = up      -> 0b010110
    //   0b010101|100000 -> tied, round to even = up   -> 0b010110
    //   0b010100|100000 -> tied, round to even = down -> 0b010100
    //
    // Let's call the lsb of the bits we want to keep (the bit just before the |) `odd`, the first
    // bit afterwards `round`, and whether any of the remaining bits is 1 `sticky`. In terms of
    // these, we have
    //
    //   odd | round | sticky | result
    //   ..x | 0     |  x     | round down (+0)
    //   ..0 | 1     | false  | round down to even (+0)
    //   ..1 | 1     | false  | round up to even (+1)
    //   ..x | 1     | true   | round up (+1)
    //
    // i.e. round up iff `round & (odd | sticky)`.
    //
    // Where exactly the | falls depends on how many bits are `available`: if there is room for all
    // ES exponent bits, the cut is somewhere in the fraction; if not, the cut is somewhere in the
    // exponent, and the entire fraction only contributes to `sticky`.
    let fraction = frac.mask_lsb(Decoded::FRAC_WIDTH);
    let round;
    let sticky =
      if available >= self.es {
        // Example (nbits = 16, es = 2, regime = 0):
        //   available   = 13
        //   frac_len    = 11
        //   bits        = 0b0_10_ee_fffffffffff|rsss…
        let frac_len = available - self.es;
        let cut = Decoded::FRAC_WIDTH - frac_len;
        bits |= exponent << frac_len;
        bits |= (fraction >> cut) as u64;
        round = fraction.bit(cut - 1);
        sticky || fraction.mask_lsb(cut - 1) != 0
      } else {
        // Example (nbits = 16, es = 2, regime = 13):
        //   available   = 1
        //   cut         = 1
        //   bits        = 0b0_11111111111111_0_e|r ffff…
        let cut = self.es - available;
        bits |= exponent >> cut;
        round = exponent.bit(cut - 1);
        sticky || exponent.mask_lsb(cut - 1) != 0 || fraction != 0
      };

    let odd = bits.get_lsb();
    let round_up = round & (odd | sticky);
    // Rounding up can carry all the way into the regime bits, which is fine: that is exactly the
    // next posit. It can never carry into the sign bit, because the largest unrounded pattern
    // (`0b0_11…10`, with run = nbits - 2) rounds up to MAX at most.
    let bits = (bits + u64::from(round_up)) & self.mask();

    // Finally, negative numbers are the two's complement of their absolute value.
    if sign { bits.neg_in(self.nbits) } else { bits }
  }
}
