// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by tables, persistence, tree construction and iteration.

use std::path::PathBuf;

/// Result alias for fallible Canopy operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced by Canopy operations.
///
/// Every error aborts the operation that raised it. A table whose load or
/// reorder failed is never handed back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A persisted table is malformed or dimensionally inconsistent.
    #[error("{}:{line}: {reason}", .path.display())]
    Format {
        /// File being read.
        path: PathBuf,
        /// 1-based line number, or 0 when the problem is not tied to a line.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// A logical id outside `[0, len)`.
    #[error("logical id {id} out of range for table of {len} points")]
    Index {
        /// Requested id.
        id: usize,
        /// Number of points in the table.
        len: usize,
    },

    /// `next_point` was called on an exhausted node iterator.
    #[error("node iterator is exhausted")]
    Exhausted,

    /// A point whose length does not match the table's dimensionality.
    #[error("expected a point of {expected} dimensions, found {found}")]
    DimensionMismatch {
        /// Table dimensionality.
        expected: usize,
        /// Length of the offending point.
        found: usize,
    },

    /// A NaN or infinite coordinate or weight.
    #[error("logical id {id} has a non-finite coordinate or weight")]
    NonFinite {
        /// Logical id of the offending point.
        id: usize,
    },

    /// Zero points, zero dimensions, or a leaf size of zero.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// The file system refused a read or write.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn format(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
