use super::*;
use crate::FixedHex;

use alloc::vec::Vec;

/// A grid of operand magnitudes: `0, step, 2 step, …` up to (excluding) `limit`. A sweep adds
/// every pair of values from the grid.
#[derive(Clone, Copy, Debug)]
#[derive(Eq, PartialEq, Hash)]
pub struct Sweep {
  pub limit: u32,
  /// A step of 0 is taken as 1.
  pub step: u32,
}

impl Default for Sweep {
  /// `0 .. 2^17` in steps of 1311, i.e. 100 values and 10 000 pairs.
  fn default() -> Self {
    Self { limit: 1 << 17, step: 1311 }
  }
}

impl Sweep {
  /// The operand magnitudes of this grid, in increasing order. A `step` of 0 walks every value
  /// below `limit`.
  pub fn values(&self) -> impl Iterator<Item = u32> + Clone {
    (0 .. self.limit).step_by(self.step.max(1) as usize)
  }
}

/// The sign of both operands in a same-sign sweep.
#[derive(Clone, Copy, Debug)]
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SignClass {
  Pos,
  Neg,
}

impl SignClass {
  /// Give `magnitude` this sign. Zero stays `+0.0`.
  pub fn apply(self, magnitude: f64) -> f64 {
    match self {
      SignClass::Pos => magnitude,
      SignClass::Neg => 0. - magnitude,
    }
  }
}

impl fmt::Display for SignClass {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      SignClass::Pos => "pos",
      SignClass::Neg => "neg",
    })
  }
}

/// Number of additions carried out in one [`Mode`], and their total scale drift.
#[derive(Clone, Copy, Debug, Default)]
#[derive(Eq, PartialEq)]
pub struct ModeTally {
  pub count: u64,
  pub total_scale_diff: u64,
}

impl ModeTally {
  /// The mean scale drift, or `None` if no additions were made in this mode.
  pub fn mean_scale_diff(&self) -> Option<f64> {
    (self.count != 0).then(|| self.total_scale_diff as f64 / self.count as f64)
  }

  fn record(&mut self, scale_diff: u32) {
    self.count += 1;
    self.total_scale_diff += u64::from(scale_diff);
  }

  fn merge(self, other: Self) -> Self {
    Self {
      count: self.count + other.count,
      total_scale_diff: self.total_scale_diff + other.total_scale_diff,
    }
  }
}

/// A simulated addition whose scale drifted by more than 1.
#[derive(Clone, Copy, Debug)]
#[derive(PartialEq)]
pub struct BadCase {
  pub sign_class: SignClass,
  pub a_value: f64,
  pub b_value: f64,
  pub mode: Mode,
  pub true_scale: Scale,
  pub used_scale: Scale,
  pub scale_diff: u32,
  /// The full-width sum, at full width.
  pub true_sum_hex: FixedHex,
  /// The sum used, at the width it was computed in.
  pub used_sum_hex: FixedHex,
}

/// The aggregate result of a [sweep](TruncationConfig::sweep) over one [`SignClass`].
#[derive(Clone, Debug)]
#[derive(PartialEq)]
pub struct SweepReport {
  pub sign_class: SignClass,
  /// Number of additions simulated.
  pub total: u64,
  pub truncated: ModeTally,
  pub full: ModeTally,
  /// All faults, ordered by operand magnitude (first `a`, then `b`).
  pub bad_cases: Vec<BadCase>,
}

impl SweepReport {
  fn new(sign_class: SignClass) -> Self {
    Self {
      sign_class,
      total: 0,
      truncated: ModeTally::default(),
      full: ModeTally::default(),
      bad_cases: Vec::new(),
    }
  }

  /// Number of faults.
  pub fn bad_count(&self) -> usize {
    self.bad_cases.len()
  }

  /// The tally for `mode`.
  pub fn tally(&self, mode: Mode) -> &ModeTally {
    match mode {
      Mode::Truncated => &self.truncated,
      Mode::Full => &self.full,
    }
  }

  /// Simulate `a_value + b_value` and add the outcome to the report.
  fn record(&mut self, config: &TruncationConfig, a_value: f64, b_value: f64) {
    let format = config.format();
    let outcome = config.simulate(format.encode(a_value), format.encode(b_value));
    self.total += 1;
    match outcome.mode {
      Mode::Truncated => self.truncated.record(outcome.scale_diff),
      Mode::Full => self.full.record(outcome.scale_diff),
    }
    if outcome.is_fault() {
      let used_width = match outcome.mode {
        Mode::Truncated => config.trunc_amount(),
        Mode::Full => format.nbits(),
      };
      self.bad_cases.push(BadCase {
        sign_class: self.sign_class,
        a_value,
        b_value,
        mode: outcome.mode,
        true_scale: outcome.true_scale,
        used_scale: outcome.used_scale,
        scale_diff: outcome.scale_diff,
        true_sum_hex: FixedHex { bits: outcome.true_sum, width: format.nbits() },
        used_sum_hex: FixedHex { bits: outcome.used_sum, width: used_width },
      })
    }
  }

  /// Combine the reports of two disjoint parts of the same sweep.
  fn merge(mut self, other: Self) -> Self {
    debug_assert_eq!(self.sign_class, other.sign_class);
    self.total += other.total;
    self.truncated = self.truncated.merge(other.truncated);
    self.full = self.full.merge(other.full);
    self.bad_cases.extend(other.bad_cases);
    self
  }
}

impl TruncationConfig {
  /// Simulate the addition of every pair of values of `sweep`, both given the sign `sign_class`,
  /// and aggregate the outcomes.
  ///
  /// With feature `parallel`, rows of the grid are spread over the rayon thread pool; the report
  /// is the same either way.
  ///
  /// ```
  /// # use posit_fault::{TruncationConfig, fault::{Sweep, SignClass}};
  /// let config = TruncationConfig::new(32, 2, 16, 3, 32)?;
  /// let report = config.sweep(&Sweep::default(), SignClass::Pos);
  /// assert_eq!(report.total, 100 * 100);
  /// assert_eq!(report.truncated.count + report.full.count, report.total);
  /// # Ok::<(), posit_fault::ConfigurationError>(())
  /// ```
  pub fn sweep(&self, sweep: &Sweep, sign_class: SignClass) -> SweepReport {
    let values: Vec<f64> = sweep.values().map(|v| sign_class.apply(f64::from(v))).collect();
    let row = |mut report: SweepReport, &a_value: &f64| {
      for &b_value in &values {
        report.record(self, a_value, b_value)
      }
      report
    };

    #[cfg(feature = "parallel")]
    let mut report = {
      use rayon::prelude::*;
      values
        .par_iter()
        .fold(|| SweepReport::new(sign_class), row)
        .reduce(|| SweepReport::new(sign_class), SweepReport::merge)
    };
    #[cfg(not(feature = "parallel"))]
    let mut report = values.iter().fold(SweepReport::new(sign_class), row);

    // By magnitude: for negative operands that is decreasing value (and +0 first).
    report.bad_cases.sort_by(|x, y| {
      let by_value = x.a_value.total_cmp(&y.a_value).then(x.b_value.total_cmp(&y.b_value));
      match sign_class {
        SignClass::Pos => by_value,
        SignClass::Neg => by_value.reverse(),
      }
    });

    log::info!(
      "{sign_class} same-sign addition: {} cases, truncated {} (mean scale diff {}), \
      full {} (mean scale diff {}), {} bad cases (scale diff > 1)",
      report.total,
      report.truncated.count,
      MeanDisplay(report.truncated.mean_scale_diff()),
      report.full.count,
      MeanDisplay(report.full.mean_scale_diff()),
      report.bad_count(),
    );
    report
  }

  /// [Sweep](Self::sweep) positive, then negative, operands.
  pub fn sweep_both(&self, sweep: &Sweep) -> [SweepReport; 2] {
    [self.sweep(sweep, SignClass::Pos), self.sweep(sweep, SignClass::Neg)]
  }
}

/// Displays a mean, or `N/A` if there were no samples.
struct MeanDisplay(Option<f64>);

impl fmt::Display for MeanDisplay {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.0 {
      Some(mean) => write!(f, "{mean:.4}"),
      None => f.write_str("N/A"),
    }
  }
}
