use super::*;
use crate::underlying::Bits;

use core::fmt::{self, Debug, Display};

impl Display for Format {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "posit<{},{}>", self.nbits, self.es)
  }
}

impl Debug for Posit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bits = self.bits;
    f.debug_tuple("Posit")
      .field(&format_args!("0b{bits:0w$b}", w=self.format.nbits as usize))
      .field(&format_args!("{}", self.format))
      .finish()
  }
}

/// Displays the value of the posit, as the `f64` it decodes to (or `NaR`).
impl Display for Posit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_nar() {
      f.write_str("NaR")
    } else {
      Display::fmt(&self.to_f64(), f)
    }
  }
}

impl Debug for Decoded {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let frac_hidden = self.frac >> Decoded::FRAC_WIDTH;
    let frac_explicit = self.frac.mask_lsb(Decoded::FRAC_WIDTH) << (u128::BITS - Decoded::FRAC_WIDTH);
    f.debug_struct("Decoded")
      .field("sign", &self.sign)
      .field("frac", &format_args!("0x{frac_hidden:x}.{frac_explicit:032x}"))
      .field("exp", &format_args!("{:+}", self.exp))
      .finish()
  }
}
