// Copyright (c) 2017-2022, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::cdf_context::{cdf_element_prob, ContextReader, ContextWriter};
use super::*;
use crate::ec::{Reader, Writer};

// Generates 4 bit field in which each bit set to 1 represents
// a blocksize partition  1111 means we split 64x64, 32x32, 16x16
// and 8x8.  1000 means we just split the 64x64 to 32x32
pub static partition_context_lookup: [[u8; 2]; BlockSize::BLOCK_SIZES_ALL] = [
  [31, 31], // 4X4   - {0b11111, 0b11111}
  [31, 30], // 4X8   - {0b11111, 0b11110}
  [30, 31], // 8X4   - {0b11110, 0b11111}
  [30, 30], // 8X8   - {0b11110, 0b11110}
  [30, 28], // 8X16  - {0b11110, 0b11100}
  [28, 30], // 16X8  - {0b11100, 0b11110}
  [28, 28], // 16X16 - {0b11100, 0b11100}
  [28, 24], // 16X32 - {0b11100, 0b11000}
  [24, 28], // 32X16 - {0b11000, 0b11100}
  [24, 24], // 32X32 - {0b11000, 0b11000}
  [24, 16], // 32X64 - {0b11000, 0b10000}
  [16, 24], // 64X32 - {0b10000, 0b11000}
  [16, 16], // 64X64 - {0b10000, 0b10000}
  [16, 0],  // 64X128- {0b10000, 0b00000}
  [0, 16],  // 128X64- {0b00000, 0b10000}
  [0, 0],   // 128X128-{0b00000, 0b00000}
  [31, 28], // 4X16  - {0b11111, 0b11100}
  [28, 31], // 16X4  - {0b11100, 0b11111}
  [30, 24], // 8X32  - {0b11110, 0b11000}
  [24, 30], // 32X8  - {0b11000, 0b11110}
  [28, 16], // 16X64 - {0b11100, 0b10000}
  [16, 28], // 64X16 - {0b10000, 0b11100}
];

pub const PARTITION_PLOFFSET: usize = 4;
pub const PARTITION_BLOCK_SIZES: usize = 4 + 1;
const PARTITION_CONTEXTS_PRIMARY: usize =
  PARTITION_BLOCK_SIZES * PARTITION_PLOFFSET;
pub const PARTITION_CONTEXTS: usize = PARTITION_CONTEXTS_PRIMARY;
pub const PARTITION_TYPES: usize = 4;
pub const EXT_PARTITION_TYPES: usize = 10;

// partition contexts are at 8x8 granularity, as it is not possible to
// split 4x4 blocks any further than that
pub const PARTITION_CONTEXT_GRANULARITY: usize = 8;
pub const PARTITION_CONTEXT_MAX_WIDTH: usize =
  MAX_TILE_WIDTH / PARTITION_CONTEXT_GRANULARITY;

static partition_type_order: [PartitionType; EXT_PARTITION_TYPES] = [
  PartitionType::PARTITION_NONE,
  PartitionType::PARTITION_HORZ,
  PartitionType::PARTITION_VERT,
  PartitionType::PARTITION_SPLIT,
  PartitionType::PARTITION_HORZ_A,
  PartitionType::PARTITION_HORZ_B,
  PartitionType::PARTITION_VERT_A,
  PartitionType::PARTITION_VERT_B,
  PartitionType::PARTITION_HORZ_4,
  PartitionType::PARTITION_VERT_4,
];

/// Collapses a partition CDF into the split-or-horz binary choice used
/// when only the left half of a block lies inside the tile. An outcome
/// counts towards "split" when it divides the visible half
/// horizontally. Elements absent from a shorter alphabet contribute
/// nothing.
fn partition_gather_horz_alike(out: &mut [u16; 2], cdf_in: &[u16]) {
  use PartitionType::*;
  let mut mass = 32768;
  for p in
    [PARTITION_HORZ, PARTITION_SPLIT, PARTITION_HORZ_A, PARTITION_HORZ_B,
     PARTITION_VERT_A, PARTITION_HORZ_4]
  {
    if (p as usize) < cdf_in.len() {
      mass -= cdf_element_prob(cdf_in, p as usize);
    }
  }
  out[0] = 32768 - mass;
  out[1] = 0;
}

/// Split-or-vert counterpart, for blocks whose bottom half is outside
/// the tile.
fn partition_gather_vert_alike(out: &mut [u16; 2], cdf_in: &[u16]) {
  use PartitionType::*;
  let mut mass = 32768;
  for p in
    [PARTITION_VERT, PARTITION_SPLIT, PARTITION_HORZ_A, PARTITION_VERT_A,
     PARTITION_VERT_B, PARTITION_VERT_4]
  {
    if (p as usize) < cdf_in.len() {
      mass -= cdf_element_prob(cdf_in, p as usize);
    }
  }
  out[0] = 32768 - mass;
  out[1] = 0;
}

impl<'a> ContextWriter<'a> {
  /// # Panics
  ///
  /// - If called with a `PartitionType` incompatible with the current
  ///   block's tile-boundary situation.
  pub fn write_partition(
    &mut self, w: &mut impl Writer, bo: TileBlockOffset, p: PartitionType,
    bsize: BlockSize,
  ) {
    debug_assert!(bsize.is_sqr());
    assert!(bsize >= BlockSize::BLOCK_8X8);
    let hbs = bsize.width_mi() / 2;
    let has_cols = (bo.0.x + hbs) < self.bc.blocks.cols();
    let has_rows = (bo.0.y + hbs) < self.bc.blocks.rows();
    let ctx = self.bc.partition_plane_context(bo, bsize);
    assert!(ctx < PARTITION_CONTEXTS);

    if !has_rows && !has_cols {
      // Both halves fall outside: the partition is implied, nothing is
      // coded.
      assert!(p == PartitionType::PARTITION_NONE);
      return;
    }

    if has_rows && has_cols {
      if ctx < PARTITION_TYPES {
        debug_assert!(p <= PartitionType::PARTITION_SPLIT);
        let cdf = &mut self.fc.partition_w8_cdf[ctx];
        w.symbol_with_update(p as u32, cdf);
      } else if ctx < 4 * PARTITION_TYPES {
        let cdf = &mut self.fc.partition_cdf[ctx - PARTITION_TYPES];
        w.symbol_with_update(p as u32, cdf);
      } else {
        debug_assert!(p < PartitionType::PARTITION_HORZ_4);
        let cdf = &mut self.fc.partition_w128_cdf[ctx - 4 * PARTITION_TYPES];
        w.symbol_with_update(p as u32, cdf);
      }
    } else if !has_rows && has_cols {
      assert!(
        p == PartitionType::PARTITION_SPLIT
          || p == PartitionType::PARTITION_HORZ
      );
      let mut cdf = [0u16; 2];
      if ctx < PARTITION_TYPES {
        let partition_cdf = &self.fc.partition_w8_cdf[ctx];
        partition_gather_vert_alike(&mut cdf, partition_cdf);
      } else if ctx < 4 * PARTITION_TYPES {
        let partition_cdf = &self.fc.partition_cdf[ctx - PARTITION_TYPES];
        partition_gather_vert_alike(&mut cdf, partition_cdf);
      } else {
        let partition_cdf =
          &self.fc.partition_w128_cdf[ctx - 4 * PARTITION_TYPES];
        partition_gather_vert_alike(&mut cdf, partition_cdf);
      }
      w.symbol((p == PartitionType::PARTITION_SPLIT) as u32, &cdf);
    } else {
      assert!(
        p == PartitionType::PARTITION_SPLIT
          || p == PartitionType::PARTITION_VERT
      );
      let mut cdf = [0u16; 2];
      if ctx < PARTITION_TYPES {
        let partition_cdf = &self.fc.partition_w8_cdf[ctx];
        partition_gather_horz_alike(&mut cdf, partition_cdf);
      } else if ctx < 4 * PARTITION_TYPES {
        let partition_cdf = &self.fc.partition_cdf[ctx - PARTITION_TYPES];
        partition_gather_horz_alike(&mut cdf, partition_cdf);
      } else {
        let partition_cdf =
          &self.fc.partition_w128_cdf[ctx - 4 * PARTITION_TYPES];
        partition_gather_horz_alike(&mut cdf, partition_cdf);
      }
      w.symbol((p == PartitionType::PARTITION_SPLIT) as u32, &cdf);
    }
  }
}

impl<'a> ContextReader<'a> {
  /// Reads the partition symbol for a square block, or infers the
  /// implied `None` when both halves fall outside the tile.
  pub fn read_partition(
    &mut self, r: &mut Reader<'_>, bo: TileBlockOffset, bsize: BlockSize,
  ) -> PartitionType {
    debug_assert!(bsize.is_sqr());
    assert!(bsize >= BlockSize::BLOCK_8X8);
    let hbs = bsize.width_mi() / 2;
    let has_cols = (bo.0.x + hbs) < self.bc.blocks.cols();
    let has_rows = (bo.0.y + hbs) < self.bc.blocks.rows();
    let ctx = self.bc.partition_plane_context(bo, bsize);
    assert!(ctx < PARTITION_CONTEXTS);

    if !has_rows && !has_cols {
      return PartitionType::PARTITION_NONE;
    }

    if has_rows && has_cols {
      let s = if ctx < PARTITION_TYPES {
        let cdf = &mut self.fc.partition_w8_cdf[ctx];
        r.symbol_with_update(cdf)
      } else if ctx < 4 * PARTITION_TYPES {
        let cdf = &mut self.fc.partition_cdf[ctx - PARTITION_TYPES];
        r.symbol_with_update(cdf)
      } else {
        let cdf = &mut self.fc.partition_w128_cdf[ctx - 4 * PARTITION_TYPES];
        r.symbol_with_update(cdf)
      };
      partition_type_order[s as usize]
    } else if !has_rows && has_cols {
      let mut cdf = [0u16; 2];
      if ctx < PARTITION_TYPES {
        let partition_cdf = &self.fc.partition_w8_cdf[ctx];
        partition_gather_vert_alike(&mut cdf, partition_cdf);
      } else if ctx < 4 * PARTITION_TYPES {
        let partition_cdf = &self.fc.partition_cdf[ctx - PARTITION_TYPES];
        partition_gather_vert_alike(&mut cdf, partition_cdf);
      } else {
        let partition_cdf =
          &self.fc.partition_w128_cdf[ctx - 4 * PARTITION_TYPES];
        partition_gather_vert_alike(&mut cdf, partition_cdf);
      }
      if r.symbol(&cdf) == 1 {
        PartitionType::PARTITION_SPLIT
      } else {
        PartitionType::PARTITION_HORZ
      }
    } else {
      let mut cdf = [0u16; 2];
      if ctx < PARTITION_TYPES {
        let partition_cdf = &self.fc.partition_w8_cdf[ctx];
        partition_gather_horz_alike(&mut cdf, partition_cdf);
      } else if ctx < 4 * PARTITION_TYPES {
        let partition_cdf = &self.fc.partition_cdf[ctx - PARTITION_TYPES];
        partition_gather_horz_alike(&mut cdf, partition_cdf);
      } else {
        let partition_cdf =
          &self.fc.partition_w128_cdf[ctx - 4 * PARTITION_TYPES];
        partition_gather_horz_alike(&mut cdf, partition_cdf);
      }
      if r.symbol(&cdf) == 1 {
        PartitionType::PARTITION_SPLIT
      } else {
        PartitionType::PARTITION_VERT
      }
    }
  }
}

impl<'a> BlockContext<'a> {
  /// # Panics
  ///
  /// - If called with a non-square `bsize`
  pub fn partition_plane_context(
    &self, bo: TileBlockOffset, bsize: BlockSize,
  ) -> usize {
    let above_ctx = self.above_partition_context[bo.0.x >> 1];
    let left_ctx = self.left_partition_context[bo.y_in_sb(self.sb_size) >> 1];
    let bsl = bsize.width_log2() - BlockSize::BLOCK_8X8.width_log2();
    let above = (above_ctx >> bsl) & 1;
    let left = (left_ctx >> bsl) & 1;

    assert!(bsize.is_sqr());

    (left * 2 + above) as usize + bsl * PARTITION_PLOFFSET
  }

  /// Records `subsize` over the extent of `bsize` in the neighbor
  /// vectors. `bsize` may be non-square: the extended partitions
  /// bookkeep their two bands separately.
  pub fn update_partition_context(
    &mut self, bo: TileBlockOffset, subsize: BlockSize, bsize: BlockSize,
  ) {
    let bw = bsize.width_mi();
    let bh = bsize.height_mi();
    let y_in_sb = bo.y_in_sb(self.sb_size);

    let above_ctx =
      &mut self.above_partition_context[bo.0.x >> 1..(bo.0.x + bw) >> 1];
    let left_ctx =
      &mut self.left_partition_context[y_in_sb >> 1..(y_in_sb + bh) >> 1];

    // update the partition context at the end notes. set partition bits
    // of block sizes larger than the current one to be one, and partition
    // bits of smaller block sizes to be zero.
    for above in &mut above_ctx[..bw >> 1] {
      *above = partition_context_lookup[subsize as usize][0];
    }

    for left in &mut left_ctx[..bh >> 1] {
      *left = partition_context_lookup[subsize as usize][1];
    }
  }

  /// Partition-context bookkeeping after an extended ("T"-shaped or
  /// 4-way) partition, which leaves two differently-sized bands whose
  /// neighbor vectors must record different depths.
  ///
  /// # Errors
  ///
  /// - Returns `InvalidBlockSize` for a `partition` that `bsize` does
  ///   not support.
  pub fn update_ext_partition_context(
    &mut self, bo: TileBlockOffset, bsize: BlockSize, partition: PartitionType,
  ) -> Result<(), InvalidBlockSize> {
    use PartitionType::*;

    if bsize < BlockSize::BLOCK_8X8 {
      return Ok(());
    }
    let hbs = bsize.width_mi() / 2;
    let subsize = bsize.subsize(partition)?;
    let bsize2 = bsize.subsize(PARTITION_SPLIT)?;
    match partition {
      PARTITION_SPLIT => {}
      PARTITION_NONE | PARTITION_HORZ | PARTITION_VERT | PARTITION_HORZ_4
      | PARTITION_VERT_4 => {
        self.update_partition_context(bo, subsize, bsize);
      }
      PARTITION_HORZ_A => {
        self.update_partition_context(bo, bsize2, subsize);
        self.update_partition_context(bo.with_offset(0, hbs), subsize, subsize);
      }
      PARTITION_HORZ_B => {
        self.update_partition_context(bo, subsize, subsize);
        self.update_partition_context(bo.with_offset(0, hbs), bsize2, subsize);
      }
      PARTITION_VERT_A => {
        self.update_partition_context(bo, bsize2, subsize);
        self.update_partition_context(bo.with_offset(hbs, 0), subsize, subsize);
      }
      PARTITION_VERT_B => {
        self.update_partition_context(bo, subsize, subsize);
        self.update_partition_context(bo.with_offset(hbs, 0), bsize2, subsize);
      }
      PARTITION_INVALID => return Err(InvalidBlockSize),
    }
    Ok(())
  }
}
