use super::*;
use crate::underlying::Bits;

use malachite::rational::Rational;
use malachite::base::num::arithmetic::traits::{PowerOf2, Pow, Abs, Reciprocal};

/// The error type returned when a posit cannot be converted to a [Rational] because it is NaR.
#[derive(Debug)]
#[derive(PartialEq, Eq)]
pub struct IsNaR;

impl Format {
  /// Convert a posit **which is not 0 or NaR** into a [Rational] value. Panics if `bits` is 0 or
  /// NaR.
  ///
  /// This is a **super-explicit** and **super-obvious** rendition of the algorithm for decoding a
  /// posit, since this is what we will check our optimised implementations against! It walks the
  /// bit string from left to right, one bit at a time.
  fn into_rational_regular(self, bits: u64) -> Rational {
    let n = self.nbits;
    let bit = |x: u64, i: u32| (x >> (n - 1 - i)) & 1 == 1;  // i-th bit from the left

    // If the number if NaR or 0, panic.
    if bits == 0 || bits == self.nar() { panic!("Should not pass {bits:b} to into_rational_regular") }

    // First extract the sign; the rest of the algorithm takes place with the two's complement
    // absolute value of the posit.
    let sign = bit(bits, 0);
    let x = if sign { bits.neg_in(n) } else { bits };

    // Bit 1 is the sign of the regime. Count how many bits, from there on, are the same, stopping
    // at the end of the posit.
    let regime_sign = bit(x, 1);
    let mut i = 1;
    while i < n && bit(x, i) == regime_sign {
      i += 1
    }
    let regime_len = (i - 1) as i64;
    // The regime is
    //   -n  if it's a run of n 0s, or
    //   n-1 if it's a run of n 1s.
    let regime = if regime_sign { regime_len - 1 } else { -regime_len };
    // Skip the terminating bit, if any.
    i += 1;

    // The next ES bits are the exponent; missing bits (past the end of the posit) are 0.
    let mut exponent = 0i64;
    for _ in 0 .. self.es {
      exponent = 2 * exponent + i64::from(i < n && bit(x, i));
      i += 1
    }

    // The rest are the fraction bits, with a hidden 1 in front: 1.ffff
    let mut fraction = Rational::from(1);
    let mut weight = Rational::from(1);
    while i < n {
      weight /= Rational::from(2);
      if bit(x, i) { fraction += &weight }
      i += 1
    }

    // Assemble the final number
    let useed = Rational::power_of_2(1i64 << self.es);
    let sign = if sign { Rational::from(-1) } else { Rational::from(1) };
    sign * useed.pow(regime) * Rational::power_of_2(exponent) * fraction
  }

  /// Convert a posit into a [Rational] value, or fail if it is NaR.
  pub fn to_rational(self, bits: u64) -> Result<Rational, IsNaR> {
    let bits = bits & self.mask();
    if bits == self.zero() {
      Ok(Rational::from(0))
    } else if bits == self.nar() {
      Err(IsNaR)
    } else {
      Ok(self.into_rational_regular(bits))
    }
  }
}

impl From<Decoded> for Rational {
  fn from(value: Decoded) -> Self {
    let frac = Rational::from(value.frac) / Rational::power_of_2(i64::from(Decoded::FRAC_WIDTH));
    let exp = Rational::power_of_2(i64::from(value.exp));
    let sign = if value.sign { Rational::from(-1) } else { Rational::from(1) };
    sign * frac * exp
  }
}

/// Check whether the rational number `exact` should be rounded to `posit`.
///
///   - Over- or under-flow (beyond MAX or MIN_POSITIVE in magnitude): round to MAX or MIN_POSITIVE
///     respectively (with the sign of `exact`).
///   - Geometric case (on the edges of the dynamic range, where exponent bits are cut): round to
///     nearest posit in terms of absolute **ratio**, ties to even.
///   - Normal case (remaining domain): round to nearest posit in terms of absolute **difference**,
///     ties to even.
pub fn is_correct_rounded(format: Format, exact: Rational, posit: u64) -> bool {
  // Only the exact number 0 is rounded to posit 0.
  if posit == format.zero() { return exact == Rational::from(0) }
  // No number is rounded to posit NaR.
  if posit == format.nar() { return false }

  let value = |bits: u64| format.to_rational(bits).unwrap();

  // Overflow case: if exact is > MAX, < MIN, > 0 and < MIN_POSITIVE, or < 0 and > MAX_NEGATIVE
  if exact > Rational::from(0) {
    if exact >= value(format.max()) {
      return posit == format.max()
    }
    else if exact <= value(format.min_positive()) {
      return posit == format.min_positive()
    }
  } else if exact < Rational::from(0) {
    if exact <= value(format.min()) {
      return posit == format.min()
    }
    else if exact >= value(format.max_negative()) {
      return posit == format.max_negative()
    }
  } else {
    unreachable!()
  }

  // Remaining cases: round to nearest (arithmetic nearest, or geometric nearest *only if* exponent
  // bits are cut). `distance` uses arithmetic or geometric distance accordingly.
  let distance = {
    // If `1 + regime_len + 1 + es > nbits`, i.e. on the edges of the posit's dynamic range, some
    // exponent bits are chopped and hence we are in a region of geometric rounding.
    //
    // So if `regime_len ≤ nbits - 2 - es`, we are in the arithmetic rounding region, otherwise
    // we're on the geometric rounding region. This `regime_len` corresponds to an exponent of
    // `(nbits - 2 - es) << es`.
    let cutoff_exp = (i64::from(format.nbits()) - 2 - i64::from(format.es())) << format.es();
    let geometric_cutoff = Rational::power_of_2(cutoff_exp);
    let arithmetic_range = (&geometric_cutoff).reciprocal() ..= geometric_cutoff;
    let is_arithmetic_rounding = arithmetic_range.contains(&(&exact).abs());

    move |x: &Rational, y: &Rational| {
      if is_arithmetic_rounding {
        x - y
      } else {
        if x.abs() >= y.abs() {x / y} else {y / x}
      }
    }
  };

  // `posit` represents exactly the number `curr`, while the immediately previous and next posits
  // represent exactly the numbers `prev` and `next`, respectively.
  let prev = format.prior(posit).map(value);
  let curr = value(posit);
  let next = format.next(posit).map(value);
  let posit_is_even = posit & 1 == 0;

  if exact == curr {
    // `exact` is exactly represented by `posit`
    true
  } else if let Some(prev) = prev.filter(|prev| *prev < exact && exact < curr) {
    // `exact` lies in interval `]prior, posit[`: needs to be closer to `posit` than to `prior`,
    // or same distance if `posit` is even.
    let distance_curr = distance(&curr, &exact);
    let distance_prev = distance(&exact, &prev);
    distance_curr < distance_prev || distance_curr == distance_prev && posit_is_even
  } else if let Some(next) = next.filter(|next| curr < exact && exact < *next) {
    // `exact` lies in interval `]posit, next[`: needs to be closer to `posit` than to `next`, or
    // same distance if `posit` is even.
    let distance_curr = distance(&exact, &curr);
    let distance_next = distance(&next, &exact);
    distance_curr < distance_next || distance_curr == distance_next && posit_is_even
  } else {
    // Not in interval
    false
  }
}

/// Check whether `float` is the `f64` nearest to `exact` (which must be well within the normal
/// range of `f64`), ties to even.
pub fn is_nearest_f64(exact: &Rational, float: f64) -> bool {
  let Ok(curr) = Rational::try_from(float) else { return false };
  if *exact == curr { return true }

  // The floats on either side of `float`: one bit pattern up and one down.
  let bits = float.to_bits();
  let neighbour = |bits: u64| Rational::try_from(f64::from_bits(bits)).ok();
  let (Some(down), Some(up)) = (neighbour(bits - 1), neighbour(bits + 1)) else { return false };
  let (below, above) = if float > 0. { (down, up) } else { (up, down) };

  // `exact` must lie between the midpoints to the neighbours, or on one of them if `float` is even.
  let two = Rational::from(2);
  let low = (&below + &curr) / &two;
  let high = (&curr + &above) / &two;
  if bits & 1 == 0 {
    low <= *exact && *exact <= high
  } else {
    low < *exact && *exact < high
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Manually test all bit patterns for a 6-bit positive with 2-bit exponent (cf. Posit
  /// Arithmetic, John L. Gustafson, Chapter 2).
  #[test]
  fn exhaustive_posit_6_2() {
    let format = Format::new(6, 2).unwrap();

    assert_eq!(format.to_rational(0b000000), Ok(Rational::from(0)));
    assert_eq!(format.to_rational(0b100000), Err(IsNaR));

    for (bits, (num, den)) in [
      (0b000001, (1, 65536)),
      (0b000010, (1, 4096)),
      (0b000011, (1, 1024)),
      (0b000100, (1, 256)),
      (0b000101, (1, 128)),
      (0b000110, (1, 64)),
      (0b000111, (1, 32)),
      (0b001000, (2, 32)),
      (0b001001, (3, 32)),
      (0b001010, (4, 32)),
      (0b001011, (6, 32)),
      (0b001100, (8, 32)),
      (0b001101, (12, 32)),
      (0b001110, (16, 32)),
      (0b001111, (24, 32)),
      (0b010000, (1, 1)),
      (0b010001, (3, 2)),
      (0b010010, (2, 1)),
      (0b010011, (3, 1)),
      (0b010100, (4, 1)),
      (0b010101, (6, 1)),
      (0b010110, (8, 1)),
      (0b010111, (12, 1)),
      (0b011000, (16, 1)),
      (0b011001, (32, 1)),
      (0b011010, (64, 1)),
      (0b011011, (128, 1)),
      (0b011100, (256, 1)),
      (0b011101, (1024, 1)),
      (0b011110, (4096, 1)),
      (0b011111, (65536, 1)),
    ] {
      let expected = Rational::from_unsigneds(num as u64, den as u64);
      assert_eq!(format.to_rational(bits), Ok(expected.clone()), "{bits:#08b}");
      assert_eq!(format.to_rational((1 << 6) - bits), Ok(-expected), "-{bits:#08b}");
    }
  }

  #[test]
  fn decoded_agrees() {
    // The optimised decoder and the explicit one agree
    for (nbits, es) in [(6, 2), (8, 0), (9, 3), (12, 1)] {
      let format = Format::new(nbits, es).unwrap();
      for bits in format.cases_exhaustive() {
        assert_eq!(Ok(Rational::from(format.decode_regular(bits))), format.to_rational(bits), "{bits:#b}");
      }
    }
  }

  #[test]
  fn correct_rounded_manual() {
    let format = Format::new(6, 2).unwrap();
    let r = |num: u64, den: u64| Rational::from_unsigneds(num, den);
    assert!(is_correct_rounded(format, r(5, 2), 0b010010));    // 2.5 → 2
    assert!(!is_correct_rounded(format, r(5, 2), 0b010011));
    assert!(is_correct_rounded(format, r(7, 2), 0b010100));    // 3.5 → 4
    assert!(is_correct_rounded(format, r(1, 1 << 14), 0b000010));  // geometric tie → even
    assert!(is_correct_rounded(format, r(1 << 20, 1), 0b011111));  // saturate
    assert!(is_correct_rounded(format, r(1, 1 << 20), 0b000001));  // never 0
    assert!(!is_correct_rounded(format, r(1, 1 << 20), 0b000000));
  }

  #[test]
  fn nearest_f64() {
    let one = Rational::from(1);
    let tiny = Rational::power_of_2(-60i64);
    assert!(is_nearest_f64(&(&one + &tiny), 1.));
    assert!(!is_nearest_f64(&(&one + &tiny), 1. + f64::EPSILON));
    assert!(is_nearest_f64(&(&one + Rational::power_of_2(-53i64)), 1.));
    assert!(is_nearest_f64(&Rational::from(3), 3.));
  }
}
