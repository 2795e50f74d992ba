// Copyright (c) 2017-2022, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

#[macro_use]
mod cdf;

use num_traits::PrimInt;
use std::mem::size_of;

/// Integer binary logarithm.
///
/// `ilog(x)` is the number of bits needed to represent `x`, i.e.
/// `floor(log2(x)) + 1` for positive `x` and `0` for zero. Call sites
/// use the qualified `ILog::ilog(x)` form; the inherent
/// `ilog(self, base)` on the primitive integers takes precedence over
/// trait methods and would reject the zero-argument call.
pub trait ILog: PrimInt {
  fn ilog(self) -> usize {
    size_of::<Self>() * 8 - self.leading_zeros() as usize
  }
}

impl<T: PrimInt> ILog for T {}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn ilog_matches_bit_width() {
    assert_eq!(ILog::ilog(0u16), 0);
    assert_eq!(ILog::ilog(1u16), 1);
    assert_eq!(ILog::ilog(0x8000u16), 16);
    assert_eq!(ILog::ilog(16388u16), 15);
    // Not the std method: that one is `floor(log2)` relative to a base.
    assert_eq!(ILog::ilog(255u32), 8);
  }
}
