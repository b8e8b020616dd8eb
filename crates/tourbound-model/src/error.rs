// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Validation errors raised while constructing a graph.
//!
//! Every error here is detected eagerly, before a `Graph` exists, so the
//! search engine never sees a partially valid matrix.

use thiserror::Error;

/// The error type for cost matrix and graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The matrix has no cities.
    #[error("cost matrix must contain at least one city")]
    Empty,

    /// A row of the matrix does not have `expected` entries.
    #[error("cost matrix is not square: row {row} has {len} entries, expected {expected}")]
    NonSquare {
        /// The offending row.
        row: usize,
        /// The number of entries found in that row.
        len: usize,
        /// The number of rows in the matrix.
        expected: usize,
    },

    /// An upper-triangle buffer has the wrong number of values.
    #[error("upper triangle has {actual} values, expected {expected}")]
    TriangleLength {
        /// `n * (n - 1) / 2` for the requested city count.
        expected: usize,
        /// The number of values supplied.
        actual: usize,
    },

    /// An off-diagonal cost is negative.
    #[error("cost from city {from} to city {to} is negative")]
    NegativeCost {
        /// Row of the negative entry.
        from: usize,
        /// Column of the negative entry.
        to: usize,
    },

    /// `cost[i][j] != cost[j][i]`.
    #[error("cost matrix is not symmetric at ({i}, {j})")]
    Asymmetric {
        /// Row of the first mismatching entry.
        i: usize,
        /// Column of the first mismatching entry.
        j: usize,
    },

    /// A tour could reach the numeric limit of the cost type.
    #[error("tour costs may overflow the cost type")]
    CostOverflow,
}
