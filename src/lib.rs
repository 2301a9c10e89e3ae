#![cfg_attr(not(any(test, feature = "std")), no_std)]
//! This crate provides a bit-accurate software model of
//! [posit arithmetic](https://posithub.org/docs/posit_standard-2.pdf) for any width from 2 to 64
//! bits and any exponent size, together with a *truncation fault model*: a simulator that asks
//! whether an addition performed at a narrower posit width would land in the same magnitude class
//! (scale) as the full-width addition.
//!
//! # Introduction
//!
//! Posits are an alternative floating point format proposed by John Gustafson in 2017. A posit
//! of `nbits` bits and `es` exponent bits is laid out, from most to least significant bit, as a
//! sign bit, a variable-length *regime* (a run of identical bits), up to `es` exponent bits, and
//! whatever fraction bits are left. Because the regime is variable-length, precision tapers off
//! towards the edges of the dynamic range, and a posit truncated to its top bits is still a
//! valid, nearby, posit of a narrower format.
//!
//! That last property is what the [`fault`] module exploits: approximate-computing hardware can
//! add the top `trunc_amount` bits of two operands instead of the full words, *if* it can tell
//! ahead of time, from bit positions alone, that doing so will not throw the scale of the result
//! off.
//!
//! # Usage
//!
//! ```
//! use posit_fault::{Format, TruncationConfig, fault::Mode};
//!
//! // Pick a format: 16 bits, 2 exponent bits. Formats are checked at runtime.
//! let p16 = Format::new(16, 2)?;
//!
//! // Encode, add, decode.
//! let a = p16.encode(3.);
//! let b = p16.encode(4.);
//! assert_eq!(p16.decode(p16.add(a, b)), 7.);
//!
//! // Simulate a 32-bit addition carried out on the top 16 bits only.
//! let config = TruncationConfig::new(32, 2, 16, 3, 32)?;
//! let p32 = config.format();
//! let outcome = config.simulate(p32.encode(1.), p32.encode(1.));
//! assert_eq!(outcome.mode, Mode::Truncated);
//! assert_eq!(outcome.scale_diff, 0);
//! # Ok::<(), posit_fault::ConfigurationError>(())
//! ```
//!
//! # Features
//!
//!   - `std` (default): `std` support in the error type.
//!   - `parallel`: run [`TruncationConfig::sweep`] on a [rayon](https://docs.rs/rayon) thread pool.
//!
//! This crate includes benchmarks; run them with `cargo bench`.

extern crate alloc;

mod error;
mod posit;
mod underlying;

pub mod fault;

pub use error::ConfigurationError;
pub use fault::{TruncationConfig, simulate_truncation};
pub use posit::{Format, Posit, Scale};
pub use underlying::{FixedBin, FixedHex};

/// Encode `value` as a posit of `nbits` bits with `es` exponent bits. See [`Format::encode`].
///
/// ```
/// assert_eq!(posit_fault::encode(1.0, 32, 2), Ok(0x4000_0000));
/// assert_eq!(posit_fault::encode(-1.0, 32, 2), Ok(0xc000_0000));
/// ```
pub fn encode(value: f64, nbits: u32, es: u32) -> Result<u64, ConfigurationError> {
  Ok(Format::new(nbits, es)?.encode(value))
}

/// Decode the posit `bits` of `nbits` bits with `es` exponent bits. See [`Format::decode`].
pub fn decode(bits: u64, nbits: u32, es: u32) -> Result<f64, ConfigurationError> {
  Ok(Format::new(nbits, es)?.decode(bits))
}

/// Add the posits `a` and `b` of `nbits` bits with `es` exponent bits. See [`Format::add`].
pub fn add(a: u64, b: u64, nbits: u32, es: u32) -> Result<u64, ConfigurationError> {
  Ok(Format::new(nbits, es)?.add(a, b))
}

/// The scale code of the posit `bits` of `current_nbits` bits with `es` exponent bits, at the
/// width fixed by `reference_nbits`. See [`Format::scale`].
pub fn scale(
  bits: u64,
  current_nbits: u32,
  es: u32,
  reference_nbits: u32,
) -> Result<Scale, ConfigurationError> {
  let format = Format::new(current_nbits, es)?;
  if reference_nbits < current_nbits {
    return Err(ConfigurationError::ReferenceTooNarrow { nbits: current_nbits, reference_nbits })
  }
  Ok(format.scale(bits, reference_nbits))
}

/// Default number of proptest cases in each test.
#[cfg(test)]
const PROPTEST_CASES: u32 = if cfg!(debug_assertions) { 0x4000 } else { 0x10_0000 };
