// Copyright (c) 2001-2016, Alliance for Open Media. All rights reserved
// Copyright (c) 2017-2022, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

#![allow(non_upper_case_globals)]

use crate::context::*;

pub static default_partition_w8_cdf: [[u16; PARTITION_TYPES];
  PARTITION_TYPES] = [
  cdf!(19132, 25510, 30392),
  cdf!(13928, 19855, 28540),
  cdf!(12522, 23679, 28629),
  cdf!(6387, 11126, 16124),
];

pub static default_partition_cdf: [[u16; EXT_PARTITION_TYPES];
  3 * PARTITION_TYPES] = [
  cdf!(15597, 20929, 24571, 26706, 27664, 28821, 29601, 30571, 31902),
  cdf!(7925, 11043, 16785, 22470, 23971, 25043, 26651, 28701, 29834),
  cdf!(5414, 13269, 15111, 20488, 22360, 24500, 25537, 26336, 32117),
  cdf!(2662, 6362, 8614, 20860, 23053, 24778, 26436, 27829, 31171),
  cdf!(18462, 20920, 23124, 27647, 28227, 29049, 29519, 30178, 31544),
  cdf!(7689, 9060, 12056, 24992, 25660, 26182, 26951, 28041, 29052),
  cdf!(6015, 9009, 10062, 24544, 25409, 26545, 27071, 27526, 32047),
  cdf!(1394, 2208, 2796, 28614, 29061, 29466, 29840, 30185, 31899),
  cdf!(20137, 21547, 23078, 29566, 29837, 30261, 30524, 30892, 31724),
  cdf!(6732, 7490, 9497, 27944, 28250, 28515, 28969, 29630, 30104),
  cdf!(5945, 7663, 8348, 28683, 29117, 29749, 30064, 30298, 32238),
  cdf!(870, 1212, 1487, 31198, 31394, 31574, 31743, 31881, 32332),
];

pub static default_partition_w128_cdf: [[u16; EXT_PARTITION_TYPES - 2];
  PARTITION_TYPES] = [
  cdf!(27899, 28219, 28529, 32484, 32539, 32619, 32639),
  cdf!(6607, 6990, 8268, 32060, 32219, 32338, 32371),
  cdf!(5429, 6676, 7122, 32027, 32227, 32531, 32582),
  cdf!(711, 966, 1172, 32448, 32538, 32617, 32664),
];
