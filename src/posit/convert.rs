use super::*;
use crate::underlying::Bits;

const MANTISSA_DIGITS_EXPLICIT: u32 = f64::MANTISSA_DIGITS - 1;
const EXP_BIAS: i32 = f64::MAX_EXP - 1;

/// Extract the sign, mantissa, and exponent fields of a *normal* [`f64`], and represent them as a
/// [`Decoded`]. No bits are lost: the 52 explicit mantissa bits fit comfortably in `frac`.
fn decode_normal_f64(num: f64) -> Decoded {
  debug_assert!(num.is_normal());
  let bits = num.to_bits();
  let sign = num.is_sign_negative();
  let mantissa = bits.mask_lsb(MANTISSA_DIGITS_EXPLICIT);
  let exponent = (bits >> MANTISSA_DIGITS_EXPLICIT).mask_lsb(11) as i32 - EXP_BIAS;

  // The mantissa field does not contain the hidden bit, so add it.
  let frac = ((1 << MANTISSA_DIGITS_EXPLICIT) | u128::from(mantissa)) << (Decoded::FRAC_WIDTH - MANTISSA_DIGITS_EXPLICIT);
  Decoded { sign, exp: exponent, frac }
}

impl Format {
  /// Convert an `f64` into a posit of this format, rounding to nearest (ties to even bit
  /// pattern):
  ///
  /// - `±0` converts to 0.
  /// - Any NaN or infinity converts to NaR.
  /// - `±1` convert to `0b0100…0` and `0b1100…0`.
  /// - Magnitudes `≥ MAXPOS` saturate to [`Self::max`] (or [`Self::min`] if negative).
  /// - Nonzero magnitudes `≤ MINPOS` saturate to [`Self::min_positive`] (or
  ///   [`Self::max_negative`] if negative). In particular no finite nonzero number converts to 0.
  /// - Otherwise, the value is rounded (if necessary).
  ///
  /// ```
  /// # use posit_fault::Format;
  /// let p32 = Format::new(32, 2)?;
  /// assert_eq!(p32.encode(0.), 0);
  /// assert_eq!(p32.encode(f64::NAN), 0x8000_0000);
  /// assert_eq!(p32.encode(1e300), 0x7fff_ffff);
  /// assert_eq!(p32.encode(-1e-300), 0xffff_ffff);
  /// # Ok::<(), posit_fault::ConfigurationError>(())
  /// ```
  pub fn encode(self, value: f64) -> u64 {
    use core::num::FpCategory;
    match value.classify() {
      FpCategory::Nan | FpCategory::Infinite => self.nar(),
      FpCategory::Zero => self.zero(),
      FpCategory::Normal | FpCategory::Subnormal => {
        let negative = value.is_sign_negative();
        let magnitude = value.abs();
        let special =
          if magnitude == 1. {
            Some(self.one())
          } else if magnitude >= self.max_value() {
            Some(self.max())
          } else if magnitude <= self.min_positive_value() {
            // Subnormals always end up here, since MINPOS is itself a normal `f64`.
            Some(self.min_positive())
          } else {
            None
          };
        match special {
          Some(bits) => if negative { bits.neg_in(self.nbits) } else { bits },
          None => self.encode_round(decode_normal_f64(value), false),
        }
      }
    }
  }

  /// Convert a posit of this format into an `f64`.
  ///
  /// - 0 converts to `0.0`.
  /// - NaR converts to NaN.
  /// - Otherwise the result is exact, unless the posit has more than 52 fraction bits (possible
  ///   only for `nbits > 55`), in which case it is rounded to nearest, ties to even.
  ///
  /// ```
  /// # use posit_fault::Format;
  /// let p32 = Format::new(32, 2)?;
  /// assert_eq!(p32.decode(0x4000_0000), 1.);
  /// assert_eq!(p32.decode(0x4800_0000), 2.);
  /// assert_eq!(p32.decode(0xc000_0000), -1.);
  /// assert!(p32.decode(0x8000_0000).is_nan());
  /// # Ok::<(), posit_fault::ConfigurationError>(())
  /// ```
  pub fn decode(self, bits: u64) -> f64 {
    match self.try_decode(bits) {
      decode::TryDecoded::Zero => 0.,
      decode::TryDecoded::NaR => f64::NAN,
      decode::TryDecoded::Regular(decoded) => Self::compose_f64(decoded),
    }
  }

  /// Assemble the bits of an `f64` from a [`Decoded`] whose scale is within the normal range.
  fn compose_f64(decoded: Decoded) -> f64 {
    let Decoded { sign, exp, frac } = decoded;
    // `frac` has FRAC_WIDTH bits below the point, the `f64` mantissa only 52. The rest are lost,
    // so round them (to nearest, ties to even).
    const SHIFT: u32 = Decoded::FRAC_WIDTH - MANTISSA_DIGITS_EXPLICIT;
    let mantissa = (frac >> SHIFT) as u64;
    let round = frac.bit(SHIFT - 1);
    let sticky = frac.mask_lsb(SHIFT - 1) != 0;
    let mantissa = mantissa + u64::from(round & (mantissa.get_lsb() | sticky));

    // Rounding up may have carried into the next power of two.
    let carry = mantissa >> f64::MANTISSA_DIGITS;
    let mantissa = mantissa >> carry;
    let exp = exp + carry as i32;
    debug_assert!(exp < f64::MAX_EXP && exp >= f64::MIN_EXP - 1);

    let bits =
      u64::from(sign) << 63
      | ((exp + EXP_BIAS) as u64) << MANTISSA_DIGITS_EXPLICIT
      | mantissa.mask_lsb(MANTISSA_DIGITS_EXPLICIT);
    f64::from_bits(bits)
  }
}
