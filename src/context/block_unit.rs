// Copyright (c) 2017-2022, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;
use std::ops::{Index, IndexMut};

/// Absolute offset in blocks (4x4 units), where a block is defined
/// to be an `N*N` square where `N == (1 << BLOCK_TO_PLANE_SHIFT)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockOffset {
  pub x: usize,
  pub y: usize,
}

/// Absolute offset in blocks inside a tile, where a block is defined
/// to be an `N*N` square where `N == (1 << BLOCK_TO_PLANE_SHIFT)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileBlockOffset(pub BlockOffset);

impl TileBlockOffset {
  /// Vertical position inside the containing superblock, in 4x4 units.
  #[inline]
  pub const fn y_in_sb(self, sb_size: SuperBlockSize) -> usize {
    self.0.y & (sb_size.mib_size() - 1)
  }

  #[inline]
  pub const fn with_offset(self, col_offset: usize, row_offset: usize) -> Self {
    TileBlockOffset(BlockOffset {
      x: self.0.x + col_offset,
      y: self.0.y + row_offset,
    })
  }
}

/// Per-4x4-unit syntax results consulted by later neighbor lookups.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Block {
  pub bsize: BlockSize,
}

impl Default for Block {
  fn default() -> Block {
    Block { bsize: BlockSize::BLOCK_64X64 }
  }
}

/// The per-tile mode-info grid: one entry per 4x4 unit, populated in
/// traversal order as partition leaves are decided.
#[derive(Clone, Debug)]
pub struct TileBlocks {
  blocks: Box<[Block]>,
  cols: usize,
  rows: usize,
}

impl TileBlocks {
  pub fn new(cols: usize, rows: usize) -> Self {
    TileBlocks {
      blocks: vec![Block::default(); cols * rows].into_boxed_slice(),
      cols,
      rows,
    }
  }

  #[inline]
  pub const fn cols(&self) -> usize {
    self.cols
  }

  #[inline]
  pub const fn rows(&self) -> usize {
    self.rows
  }

  /// Records `bsize` over the leaf's whole extent, clipped to the tile.
  pub fn set_block_size(&mut self, bo: TileBlockOffset, bsize: BlockSize) {
    let bw = bsize.width_mi().min(self.cols - bo.0.x.min(self.cols));
    let bh = bsize.height_mi().min(self.rows - bo.0.y.min(self.rows));
    for y in 0..bh {
      for x in 0..bw {
        self[bo.0.y + y][bo.0.x + x] = Block { bsize };
      }
    }
  }
}

impl Index<usize> for TileBlocks {
  type Output = [Block];
  #[inline]
  fn index(&self, index: usize) -> &Self::Output {
    &self.blocks[index * self.cols..(index + 1) * self.cols]
  }
}

impl IndexMut<usize> for TileBlocks {
  #[inline]
  fn index_mut(&mut self, index: usize) -> &mut Self::Output {
    &mut self.blocks[index * self.cols..(index + 1) * self.cols]
  }
}

impl Index<TileBlockOffset> for TileBlocks {
  type Output = Block;
  #[inline]
  fn index(&self, bo: TileBlockOffset) -> &Self::Output {
    &self[bo.0.y][bo.0.x]
  }
}

/// Neighbor context carried along a tile's traversal: the "above"
/// vector persists for the tile's width, the "left" vector is reset at
/// the start of every superblock row.
pub struct BlockContext<'a> {
  pub sb_size: SuperBlockSize,
  pub above_partition_context: [u8; PARTITION_CONTEXT_MAX_WIDTH],
  pub left_partition_context: [u8; MAX_MIB_SIZE >> 1],
  pub blocks: &'a mut TileBlocks,
}

impl<'a> BlockContext<'a> {
  pub fn new(blocks: &'a mut TileBlocks, sb_size: SuperBlockSize) -> Self {
    BlockContext {
      sb_size,
      above_partition_context: [0; PARTITION_CONTEXT_MAX_WIDTH],
      left_partition_context: [0; MAX_MIB_SIZE >> 1],
      blocks,
    }
  }

  pub fn reset_left_contexts(&mut self) {
    for c in &mut self.left_partition_context {
      *c = 0;
    }
  }

  pub fn checkpoint(&self) -> BlockContextCheckpoint {
    BlockContextCheckpoint {
      above_partition_context: self.above_partition_context,
      left_partition_context: self.left_partition_context,
    }
  }

  pub fn rollback(&mut self, checkpoint: &BlockContextCheckpoint) {
    self.above_partition_context = checkpoint.above_partition_context;
    self.left_partition_context = checkpoint.left_partition_context;
  }
}

#[derive(Clone)]
pub struct BlockContextCheckpoint {
  above_partition_context: [u8; PARTITION_CONTEXT_MAX_WIDTH],
  left_partition_context: [u8; MAX_MIB_SIZE >> 1],
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn grid_writes_are_clipped() {
    let mut blocks = TileBlocks::new(6, 4);
    blocks.set_block_size(
      TileBlockOffset(BlockOffset { x: 4, y: 2 }),
      BlockSize::BLOCK_32X32,
    );
    assert_eq!(blocks[3][5].bsize, BlockSize::BLOCK_32X32);
    assert_eq!(blocks[1][4].bsize, BlockSize::BLOCK_64X64);
  }

  #[test]
  fn y_in_sb_wraps_at_superblock() {
    let bo = TileBlockOffset(BlockOffset { x: 0, y: 21 });
    assert_eq!(bo.y_in_sb(SuperBlockSize::Sb64x64), 5);
    assert_eq!(bo.y_in_sb(SuperBlockSize::Sb128x128), 21);
  }
}
