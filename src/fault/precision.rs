//! How much precision a value loses when stored as a posit, and how much more when that posit is
//! then truncated to a narrower width (as opposed to being rounded to the narrower width
//! directly).

use crate::{ConfigurationError, Format};
use super::truncate;

/// `|approx - exact| / |exact|`, or 0 if they are equal. NaN if either is NaN.
fn relative_difference(approx: f64, exact: f64) -> f64 {
  if approx == exact {
    return 0.
  }
  let difference = if approx > exact { approx - exact } else { exact - approx };
  let magnitude = if exact < 0. { -exact } else { exact };
  difference / magnitude
}

/// The relative error of rounding `x` to the nearest posit of `format`:
/// `|decode(encode(x)) - x| / |x|`.
///
/// This is 0 for `x == 0`, and NaN for non-finite `x`.
///
/// ```
/// # use posit_fault::{Format, fault::precision::relative_error};
/// let p8 = Format::new(8, 1)?;
/// assert_eq!(relative_error(p8, 3.), 0.);
/// assert_eq!(relative_error(p8, 17.), 1. / 17.);  // Rounded to 16
/// # Ok::<(), posit_fault::ConfigurationError>(())
/// ```
pub fn relative_error(format: Format, x: f64) -> f64 {
  relative_difference(format.decode(format.encode(x)), x)
}

/// The relative error of rounding `x` to the nearest posit of `format`, and then keeping only the
/// top `narrow_nbits` bits of that, read as a posit of `narrow_nbits` bits and the same `es`.
///
/// Fails if `narrow_nbits` is greater than `format.nbits()` or does not make a valid format.
///
/// ```
/// # use posit_fault::{Format, fault::precision::{relative_error, truncated_relative_error}};
/// let p16 = Format::new(16, 1)?;
/// let p8 = Format::new(8, 1)?;
/// // 8-bit posits only have 2 fraction bits at this scale: 23 is rounded to 24, but truncating
/// // the 16-bit posit gives 20.
/// assert_eq!(relative_error(p8, 23.), 1. / 23.);
/// assert_eq!(truncated_relative_error(p16, 23., 8)?, 3. / 23.);
/// # Ok::<(), posit_fault::ConfigurationError>(())
/// ```
pub fn truncated_relative_error(
  format: Format,
  x: f64,
  narrow_nbits: u32,
) -> Result<f64, ConfigurationError> {
  let narrow = Format::new(narrow_nbits, format.es())?;
  let truncated = truncate(format.encode(x), format.nbits(), narrow_nbits)?;
  Ok(relative_difference(narrow.decode(truncated), x))
}
