use super::*;
use crate::ConfigurationError;
use crate::underlying::Bits;

impl Format {
  /// The largest scale (`(nbits - 2) << es`) any format may have. Keeping `MAXPOS` and `MINPOS`
  /// inside the range of *normal* `f64`s means that decoding to `f64` never overflows or loses
  /// precision to subnormals, and that encoding never sees a subnormal larger than `MINPOS`.
  pub const MAX_SCALE: u32 = (f64::MAX_EXP - 2) as u32;

  /// Build a posit format with `nbits` bits in total and `es` exponent bits.
  ///
  /// Fails if `nbits` is not in `2 ..= 64`, if `es > nbits`, or if the dynamic range
  /// `2^((nbits - 2) << es)` would exceed [`Self::MAX_SCALE`].
  pub fn new(nbits: u32, es: u32) -> Result<Self, ConfigurationError> {
    if !(2 ..= 64).contains(&nbits) {
      return Err(ConfigurationError::WidthOutOfRange { nbits })
    }
    // Check `es` before shifting by it: for nbits ≥ 3 any es ≥ 16 is already way above MAX_SCALE,
    // and for nbits = 2 it is above nbits.
    if es > nbits || es >= 16 || ((nbits - 2) << es) > Self::MAX_SCALE {
      return Err(ConfigurationError::ExponentOutOfRange { nbits, es })
    }
    log::trace!("new posit format: nbits = {nbits}, es = {es}");
    Ok(Self { nbits, es })
  }

  /// The size of this posit format in bits.
  #[inline]
  pub const fn nbits(self) -> u32 {
    self.nbits
  }

  /// The number of exponent bits.
  #[inline]
  pub const fn es(self) -> u32 {
    self.es
  }

  /// A mask of the lowest [`Self::nbits`] bits.
  #[inline]
  pub(crate) fn mask(self) -> u64 {
    u64::mask(self.nbits)
  }

  /// Checks whether `bits` is an exception ([0](Self::zero) or [NaR](Self::nar)), that is, the
  /// same as `bits == self.zero() || bits == self.nar()`.
  #[inline]
  pub(crate) fn is_special(self, bits: u64) -> bool {
    bits.mask_lsb(self.nbits - 1) == 0
  }

  /// Wrap a raw bit pattern as a [`Posit`] of this format. Bits higher (more significant) than
  /// the lowest [`Self::nbits`] bits, if any, are ignored.
  #[inline]
  pub fn posit(self, bits: u64) -> Posit {
    Posit { bits: bits & self.mask(), format: self }
  }
}

impl Posit {
  /// Round an `f64` to the nearest posit of `format`. See [`Format::encode`].
  pub fn round_from(value: f64, format: Format) -> Self {
    format.posit(format.encode(value))
  }

  /// Return the underlying bit representation of `self`, in the lowest `nbits` bits.
  #[inline]
  pub const fn to_bits(self) -> u64 {
    self.bits
  }

  /// The format `self` is interpreted in.
  #[inline]
  pub const fn format(self) -> Format {
    self.format
  }

  /// The value of `self` as an `f64`; NaR becomes NaN. See [`Format::decode`].
  pub fn to_f64(self) -> f64 {
    self.format.decode(self.bits)
  }

  pub fn is_zero(self) -> bool {
    self.bits == self.format.zero()
  }

  pub fn is_nar(self) -> bool {
    self.bits == self.format.nar()
  }

  /// Whether `self` is strictly negative. NaR is neither negative nor positive.
  pub fn is_negative(self) -> bool {
    self.bits.is_negative_in(self.format.nbits) && !self.is_nar()
  }

  /// The absolute value of `self`, i.e. the two's complement negation if `self` is negative.
  /// `abs(NaR) == NaR`.
  pub fn abs(self) -> Self {
    self.format.posit(self.bits.abs_in(self.format.nbits))
  }

  /// Add two posits, which must be of the same format. See [`Format::add`].
  pub fn checked_add(self, rhs: Self) -> Result<Self, ConfigurationError> {
    if self.format != rhs.format {
      return Err(ConfigurationError::FormatMismatch { lhs: self.format, rhs: rhs.format })
    }
    Ok(self.format.posit(self.format.add(self.bits, rhs.bits)))
  }

  /// The scale code of `self`, rendered with the width implied by `reference_nbits`. See
  /// [`Format::scale`]; as there, a `reference_nbits` narrower than the format is not rejected
  /// and can give a code wider than [`Scale::width`].
  pub fn scale(self, reference_nbits: u32) -> Scale {
    self.format.scale(self.bits, reference_nbits)
  }
}
