//! The truncation fault model.
//!
//! Given two `nbits`-wide posits, approximate hardware may choose to add only their top
//! `trunc_amount` bits, in a narrower posit format with the same `es`. Since a posit truncated to
//! its top bits is still a valid posit of the narrower format, with the same regime and (as long
//! as they fit) the same exponent, the sum usually lands in the same magnitude class. The question
//! is whether the hardware can tell *ahead of time*, from bit positions alone, when that is safe.
//!
//! The predicate modelled here ([`can_truncate`]) is: truncate only if, in both operands, the
//! `frac_size`-th fraction bit exists and sits within the first [`TruncationConfig::window`] bits
//! of the word. [`TruncationConfig::simulate`] then measures how far the *scale code* (see
//! [`Format::scale`]) of the sum actually used drifts from the scale code of the true full-width
//! sum. A drift of more than 1 is a *fault*.
//!
//! Only same-sign additions are modelled: operands are replaced by their absolute value first.
//!
//! ```
//! # use posit_fault::{TruncationConfig, fault::Mode};
//! let config = TruncationConfig::new(32, 2, 16, 3, 32)?;
//! let p32 = config.format();
//!
//! // 1 + 1: the 3rd fraction bit is at index 7, truncating is fine.
//! let outcome = config.simulate(p32.encode(1.), p32.encode(1.));
//! assert_eq!(outcome.mode, Mode::Truncated);
//! assert!(!outcome.is_fault());
//!
//! // 2^40 + 1: the long regime of 2^40 pushes its fraction past the window.
//! let outcome = config.simulate(p32.encode(2f64.powi(40)), p32.encode(1.));
//! assert_eq!(outcome.mode, Mode::Full);
//! # Ok::<(), posit_fault::ConfigurationError>(())
//! ```

use crate::{ConfigurationError, Format, Scale};
use crate::underlying::Bits;

use core::fmt;

/// Batch sweeps over a grid of operands
mod sweep;

/// Precision of encoding and truncation
pub mod precision;

pub use sweep::{BadCase, ModeTally, SignClass, Sweep, SweepReport};

/// The parameters of the truncation fault model: the full-width posit format, the width it gets
/// truncated to, which fraction bit the truncation predicate inspects, the reference width that
/// fixes the width of scale codes, and the window the inspected bit must fall in.
#[derive(Clone, Copy, Debug)]
#[derive(Eq, PartialEq, Hash)]
pub struct TruncationConfig {
  format: Format,
  truncated: Format,
  frac_size: u32,
  reference_nbits: u32,
  window: u32,
}

impl TruncationConfig {
  /// The default [`Self::window`]: the inspected fraction bit must be among the first 16 bits.
  pub const DEFAULT_WINDOW: u32 = 16;

  /// Build a fault model for `nbits`-wide posits with `es` exponent bits, truncated to
  /// `trunc_amount` bits, inspecting the `frac_size`-th fraction bit (counting from 1), with scale
  /// codes rendered at the width fixed by `reference_nbits`.
  ///
  /// Fails if
  ///   - `(nbits, es)` or `(trunc_amount, es)` is not a valid [`Format`],
  ///   - `trunc_amount > nbits`,
  ///   - the `frac_size`-th fraction bit cannot exist in any `nbits`-wide posit (i.e. `frac_size`
  ///     is 0 or more than `nbits - 3 - es`),
  ///   - `reference_nbits < nbits`.
  pub fn new(
    nbits: u32,
    es: u32,
    trunc_amount: u32,
    frac_size: u32,
    reference_nbits: u32,
  ) -> Result<Self, ConfigurationError> {
    let format = Format::new(nbits, es)?;
    if trunc_amount > nbits {
      return Err(ConfigurationError::TruncationTooWide { nbits, trunc_amount })
    }
    let truncated = Format::new(trunc_amount, es)?;
    // The most fraction bits a posit can have is when the regime is as short as possible (2 bits).
    let max_frac_size = nbits.saturating_sub(3 + es);
    if !(1 ..= max_frac_size).contains(&frac_size) {
      return Err(ConfigurationError::FractionBitOutOfRange { nbits, es, frac_size })
    }
    if reference_nbits < nbits {
      return Err(ConfigurationError::ReferenceTooNarrow { nbits, reference_nbits })
    }
    log::trace!(
      "new truncation config: {format} truncated to {truncated}, fraction bit {frac_size}, \
      reference width {reference_nbits}"
    );
    Ok(Self { format, truncated, frac_size, reference_nbits, window: Self::DEFAULT_WINDOW })
  }

  /// Replace the window (default [`Self::DEFAULT_WINDOW`]): truncation is allowed only if the
  /// inspected fraction bit of both operands has an index (counting from the sign bit, at 0) less
  /// than `window`.
  pub fn with_window(self, window: u32) -> Self {
    Self { window, ..self }
  }

  /// The full-width format.
  #[inline]
  pub const fn format(&self) -> Format {
    self.format
  }

  /// The format of truncated operands: `trunc_amount` bits and the same `es`.
  #[inline]
  pub const fn truncated_format(&self) -> Format {
    self.truncated
  }

  #[inline]
  pub const fn trunc_amount(&self) -> u32 {
    self.truncated.nbits()
  }

  #[inline]
  pub const fn frac_size(&self) -> u32 {
    self.frac_size
  }

  #[inline]
  pub const fn reference_nbits(&self) -> u32 {
    self.reference_nbits
  }

  #[inline]
  pub const fn window(&self) -> u32 {
    self.window
  }

  /// Simulate the addition of the magnitudes of `a` and `b` (full-width posits), choosing the
  /// truncated or the full-width path with [`can_truncate`], and compare the scale code of the
  /// result against that of the true full-width sum.
  pub fn simulate(&self, a: u64, b: u64) -> Outcome {
    let full = self.format;
    let n = full.nbits();
    let a = a.abs_in(n);
    let b = b.abs_in(n);

    let true_sum = full.add(a, b);
    let true_scale = full.scale(true_sum, self.reference_nbits);

    let (mode, used_sum, used_scale) = if can_truncate(a, b, self) {
      let narrow = self.truncated;
      let drop = n - narrow.nbits();
      let used_sum = narrow.add(a >> drop, b >> drop);
      (Mode::Truncated, used_sum, narrow.scale(used_sum, self.reference_nbits))
    } else {
      (Mode::Full, true_sum, true_scale)
    };

    let outcome = Outcome {
      mode,
      true_scale,
      used_scale,
      scale_diff: true_scale.abs_diff(used_scale),
      true_sum,
      used_sum,
    };
    if outcome.is_fault() {
      log::debug!(
        "{mode} addition of {a:#x} and {b:#x}: scale {used_scale} instead of {true_scale}",
      );
    }
    outcome
  }
}

/// Whether an addition was carried out on truncated operands or at full width.
#[derive(Clone, Copy, Debug)]
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Mode {
  Full,
  Truncated,
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Mode::Full => "full",
      Mode::Truncated => "trunc",
    })
  }
}

/// The result of [`TruncationConfig::simulate`].
#[derive(Clone, Copy, Debug)]
#[derive(Eq, PartialEq)]
pub struct Outcome {
  /// Which path was used.
  pub mode: Mode,
  /// Scale code of the full-width sum.
  pub true_scale: Scale,
  /// Scale code of the sum actually used (the truncated one, in [`Mode::Truncated`]).
  pub used_scale: Scale,
  /// `|true_scale - used_scale|`, as unsigned numbers.
  pub scale_diff: u32,
  /// The full-width sum.
  pub true_sum: u64,
  /// The sum actually used: `trunc_amount` bits wide in [`Mode::Truncated`], else the same as
  /// `true_sum`.
  pub used_sum: u64,
}

impl Outcome {
  /// A fault is a scale drift of more than 1.
  pub fn is_fault(&self) -> bool {
    self.scale_diff > 1
  }
}

/// The 0-based index, counting from the sign bit (most significant), of the `num`-th fraction
/// bit (counting from 1) of the posit `bits`, or `None` if the posit does not have that many
/// fraction bits.
///
/// The regime is counted with its terminating bit, unless the run reaches the end of the word.
/// Exponent bits are always counted as `es` bits, even if some of them are cut off. Negative
/// posits are *not* negated first: pass the absolute value if that is what you mean.
///
/// ```
/// # use posit_fault::{Format, fault::frac_index};
/// let p32 = Format::new(32, 2)?;
/// // 0 | 10 | 00 | 1000…: fraction starts at index 5
/// assert_eq!(frac_index(p32.encode(1.5), p32, 1), Some(5));
/// assert_eq!(frac_index(p32.max(), p32, 1), None);
/// # Ok::<(), posit_fault::ConfigurationError>(())
/// ```
pub fn frac_index(bits: u64, format: Format, num: u32) -> Option<u32> {
  let n = format.nbits();
  let body = bits.mask_lsb(n - 1);
  let regime_sign = bits.bit(n - 2);
  let run =
    if regime_sign {
      (!body).mask_lsb(n - 1).leading_zeros_in(n - 1)
    } else {
      body.leading_zeros_in(n - 1)
    };
  let regime_len = if run < n - 1 { run + 1 } else { n - 1 };
  let start = 1 + regime_len + format.es();
  let index = start.checked_add(num.checked_sub(1)?)?;
  (index < n).then_some(index)
}

/// Whether the posits `a` and `b` (full-width, of `config`'s format) may be added on their top
/// `trunc_amount` bits: if either is 0, always; otherwise only if the
/// [`frac_size`](TruncationConfig::frac_size)-th fraction bit of both exists and lies within the
/// [`window`](TruncationConfig::window).
pub fn can_truncate(a: u64, b: u64, config: &TruncationConfig) -> bool {
  let format = config.format;
  let a = a & format.mask();
  let b = b & format.mask();
  if a == format.zero() || b == format.zero() {
    return true
  }
  let within_window = |bits| {
    frac_index(bits, format, config.frac_size).is_some_and(|index| index < config.window)
  };
  within_window(a) && within_window(b)
}

/// Keep the top `trunc_amount` bits of the `nbits`-wide posit `bits`.
///
/// ```
/// # use posit_fault::fault::truncate;
/// assert_eq!(truncate(0x4cab_1234, 32, 16), Ok(0x4cab));
/// assert!(truncate(0x4cab_1234, 32, 33).is_err());
/// ```
pub fn truncate(bits: u64, nbits: u32, trunc_amount: u32) -> Result<u64, ConfigurationError> {
  if trunc_amount > nbits {
    return Err(ConfigurationError::TruncationTooWide { nbits, trunc_amount })
  }
  Ok(bits.mask_lsb(nbits.min(u64::BITS)).lshr(nbits - trunc_amount))
}

/// Build a [`TruncationConfig`] and [simulate](TruncationConfig::simulate) the addition of `a`
/// and `b` with it.
///
/// ```
/// # use posit_fault::{simulate_truncation, fault::Mode};
/// let outcome = simulate_truncation(0, 0, 32, 2, 16, 3, 32)?;
/// assert_eq!(outcome.mode, Mode::Truncated);
/// assert_eq!(outcome.scale_diff, 0);
/// # Ok::<(), posit_fault::ConfigurationError>(())
/// ```
pub fn simulate_truncation(
  a: u64,
  b: u64,
  nbits: u32,
  es: u32,
  trunc_amount: u32,
  frac_size: u32,
  reference_nbits: u32,
) -> Result<Outcome, ConfigurationError> {
  let config = TruncationConfig::new(nbits, es, trunc_amount, frac_size, reference_nbits)?;
  Ok(config.simulate(a, b))
}
