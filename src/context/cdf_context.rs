// Copyright (c) 2017-2022, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;

use std::fmt;

/// The adaptive symbol probabilities carried across a tile: one CDF
/// family per partition symbol alphabet, each row an inverse CDF in
/// Q15 with a trailing adaptation counter slot.
#[derive(Clone, Copy)]
pub struct CDFContext {
  pub partition_w8_cdf: [[u16; PARTITION_TYPES]; PARTITION_TYPES],
  pub partition_cdf: [[u16; EXT_PARTITION_TYPES]; 3 * PARTITION_TYPES],
  pub partition_w128_cdf: [[u16; EXT_PARTITION_TYPES - 2]; PARTITION_TYPES],
}

impl CDFContext {
  pub fn new() -> CDFContext {
    CDFContext {
      partition_w8_cdf: default_partition_w8_cdf,
      partition_cdf: default_partition_cdf,
      partition_w128_cdf: default_partition_w128_cdf,
    }
  }

  pub fn reset_counts(&mut self) {
    macro_rules! reset_1d {
      ($field:expr) => {
        let r = $field.last_mut().unwrap();
        *r = 0;
      };
    }
    macro_rules! reset_2d {
      ($field:expr) => {
        for x in $field.iter_mut() {
          reset_1d!(x);
        }
      };
    }

    reset_2d!(self.partition_w8_cdf);
    reset_2d!(self.partition_cdf);
    reset_2d!(self.partition_w128_cdf);
  }
}

impl Default for CDFContext {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for CDFContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "CDFContext contains too many numbers to print :-(")
  }
}

/// Probability mass of `element` in an inverse CDF, treating the slot
/// past the final symbol as an implicit zero.
#[inline]
pub const fn cdf_element_prob(cdf: &[u16], element: usize) -> u16 {
  (if element > 0 { cdf[element - 1] } else { 32768 })
    - (if element + 1 < cdf.len() { cdf[element] } else { 0 })
}

#[derive(Clone)]
pub struct ContextWriterCheckpoint {
  pub fc: CDFContext,
  pub bc: BlockContextCheckpoint,
}

/// Syntax-level encoder interface: owns the neighbor context and
/// borrows the tile's adaptive CDFs, pairing them with a `Writer`
/// call by call.
pub struct ContextWriter<'a> {
  pub bc: BlockContext<'a>,
  pub fc: &'a mut CDFContext,
}

impl<'a> ContextWriter<'a> {
  pub fn new(fc: &'a mut CDFContext, bc: BlockContext<'a>) -> Self {
    ContextWriter { fc, bc }
  }

  pub fn checkpoint(&self) -> ContextWriterCheckpoint {
    ContextWriterCheckpoint { fc: *self.fc, bc: self.bc.checkpoint() }
  }

  pub fn rollback(&mut self, checkpoint: &ContextWriterCheckpoint) {
    *self.fc = checkpoint.fc;
    self.bc.rollback(&checkpoint.bc);
  }
}

/// Decoder twin of `ContextWriter`: the same neighbor context and CDF
/// state, driven from a `Reader` so both sides track identically.
pub struct ContextReader<'a> {
  pub bc: BlockContext<'a>,
  pub fc: &'a mut CDFContext,
}

impl<'a> ContextReader<'a> {
  pub fn new(fc: &'a mut CDFContext, bc: BlockContext<'a>) -> Self {
    ContextReader { fc, bc }
  }
}
