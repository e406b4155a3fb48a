// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tables shared by the unit tests.

use crate::table::PointTable;

/// Four points around the unit square and an outlying pair near `(5, 5)`.
pub(crate) fn clusters() -> PointTable {
    PointTable::from_points(
        2,
        [
            [0.0, 0.0],
            [0.0, 1.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [5.0, 5.0],
            [5.0, 6.0],
        ],
    )
    .unwrap()
}
