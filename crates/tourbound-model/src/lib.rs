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

//! # Tourbound Model
//!
//! **The problem model for the Tourbound TSP solver.**
//!
//! This crate defines the data structures that describe a symmetric
//! Traveling Salesman instance and its solution. It is the interchange layer
//! between user input (text files, in-memory rows) and the search engine
//! (`tourbound_bnb`).
//!
//! ## Architecture
//!
//! * **`index`**: `CityIndex`, a strongly typed city id.
//! * **`num`**: the `CostNumeric` trait alias for edge cost types.
//! * **`matrix`**: `CostMatrix`, validated symmetric edge costs.
//! * **`adjacency`**: `OrderedAdjacency`, per-city edge lists sorted by cost.
//! * **`graph`**: `Graph`, the immutable bundle the engine searches over.
//! * **`tour`**: `Tour`, a closed visiting order with its cost.
//! * **`complexity`**: the size of the permutation tree, in log space.
//! * **`loading`**: `InstanceLoader`, the text instance reader.
//! * **`error`**: `GraphError`, validation failures.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: Constructors validate eagerly. Once a `Graph` exists it
//!     is symmetric, non-negative and safe from cost overflow.
//! 2.  **Memory Layout**: Matrix and adjacency rows are flattened into single
//!     vectors for cache locality in the search loop.
//! 3.  **Type Safety**: Cities are `CityIndex`, never bare `usize`.

pub mod adjacency;
pub mod complexity;
pub mod error;
pub mod graph;
pub mod index;
pub mod loading;
pub mod matrix;
pub mod num;
pub mod tour;
