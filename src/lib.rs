// Copyright (c) 2017-2022, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! Adaptive multi-symbol range coding of AV1-style partition trees.
//!
//! The crate covers the tile-level core of the format: the range coder
//! in both directions ([`ec`]), adaptive CDF tables and the neighbor
//! context model ([`context`]), and the recursive partition-tree
//! driver ([`tile`]) that ties them to a per-leaf callback.

#[macro_use]
pub mod util;

pub mod context;
pub mod ec;
pub mod entropymode;
pub mod partition;
pub mod tile;

pub use crate::context::{CDFContext, SuperBlockSize, TileBlockOffset};
pub use crate::partition::{BlockSize, PartitionType};
pub use crate::tile::{Tile, TileError};
