// Copyright (c) 2017-2022, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

// Builds an inverse CDF in Q15 from cumulative probabilities.  The
// trailing slot doubles as the zero tail and the adaptation counter.
macro_rules! cdf {
  ($($x:expr),+) => {[$(32768 - $x),+, 0]}
}

#[cfg(test)]
mod test {
  #[test]
  fn cdf_macro_layout() {
    let c: [u16; 4] = cdf!(19132, 25510, 30392);
    assert_eq!(c, [32768 - 19132, 32768 - 25510, 32768 - 30392, 0]);
    // Monotonically non-increasing with a zero count slot.
    assert!(c.windows(2).all(|w| w[0] >= w[1]));
  }
}
