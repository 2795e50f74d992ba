// Copyright (c) 2017-2022, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;

pub const MAX_SB_SIZE_LOG2: usize = 7;

pub const MI_SIZE_LOG2: usize = 2;
pub const MI_SIZE: usize = 1 << MI_SIZE_LOG2;
pub const MAX_MIB_SIZE_LOG2: usize = MAX_SB_SIZE_LOG2 - MI_SIZE_LOG2;
pub const MAX_MIB_SIZE: usize = 1 << MAX_MIB_SIZE_LOG2;

pub const MAX_TILE_WIDTH: usize = 4096;

/// The root block unit a tile is carved into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuperBlockSize {
  Sb64x64,
  Sb128x128,
}

impl SuperBlockSize {
  #[inline]
  pub const fn block_size(self) -> BlockSize {
    match self {
      SuperBlockSize::Sb64x64 => BlockSize::BLOCK_64X64,
      SuperBlockSize::Sb128x128 => BlockSize::BLOCK_128X128,
    }
  }

  #[inline]
  pub const fn mib_size_log2(self) -> usize {
    match self {
      SuperBlockSize::Sb64x64 => 4,
      SuperBlockSize::Sb128x128 => 5,
    }
  }

  #[inline]
  pub const fn mib_size(self) -> usize {
    1 << self.mib_size_log2()
  }
}

/// Absolute offset in superblocks inside a tile, where a superblock is
/// the tile's configured root block unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSuperBlockOffset {
  pub x: usize,
  pub y: usize,
}

impl TileSuperBlockOffset {
  /// Offset of a block inside the current superblock.
  #[inline]
  pub const fn block_offset(
    self, sb_size: SuperBlockSize, block_x: usize, block_y: usize,
  ) -> TileBlockOffset {
    TileBlockOffset(BlockOffset {
      x: (self.x << sb_size.mib_size_log2()) + block_x,
      y: (self.y << sb_size.mib_size_log2()) + block_y,
    })
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn superblock_geometry() {
    assert_eq!(SuperBlockSize::Sb64x64.mib_size(), 16);
    assert_eq!(SuperBlockSize::Sb128x128.mib_size(), 32);
    assert_eq!(
      SuperBlockSize::Sb64x64.block_size(),
      BlockSize::BLOCK_64X64
    );

    let sbo = TileSuperBlockOffset { x: 2, y: 1 };
    let bo = sbo.block_offset(SuperBlockSize::Sb64x64, 3, 5);
    assert_eq!((bo.0.x, bo.0.y), (35, 21));
  }
}
