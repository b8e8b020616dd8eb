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

//! # Tourbound BnB
//!
//! **An exact branch-and-bound solver for the symmetric Traveling Salesman
//! Problem.**
//!
//! Given a validated `Graph`, the solver returns a minimum-cost closed tour
//! that starts and ends at city `0` and visits every other city exactly once.
//! The search is a depth-first walk over the orderings of cities `1..N`,
//! pruned by an admissible lower bound against the best tour found so far.
//!
//! ## Architecture
//!
//! * **`bnb`**: `BnbSolver`, the search engine. It keeps its stack and trail
//!   allocations across runs.
//! * **`bound`**: `LowerBoundEstimator` and the reference `RowMinimumBound`.
//! * **`state`**: `SearchState`, the mutable partial path with a scoped
//!   `TrialVisit` guard.
//! * **`incumbent`**: the best tour so far and its cost.
//! * **`monitor`**: hooks to observe, log or stop the search.
//! * **`result`** / **`stats`**: what a run returns.
//!
//! ## Scalability
//!
//! The permutation tree has `(N - 1)!` leaves. Pruning keeps instances of a
//! dozen or so cities fast, but the worst case stays factorial; use the
//! `node_limit` or `time_limit` monitors when the instance size is not under
//! your control. Memory is `O(N^2)`: the pending-children stack holds at most
//! `N (N - 1) / 2` entries and recursion depth never reaches the machine stack.
//!
//! ## Quick start
//!
//! ```rust
//! let tour = tourbound_bnb::solve_matrix(&[
//!     [0i64, 10, 15, 20],
//!     [10, 0, 35, 25],
//!     [15, 35, 0, 30],
//!     [20, 25, 30, 0],
//! ])
//! .unwrap();
//! assert_eq!(tour.cost(), 80);
//! assert_eq!(tour.cities().first(), tour.cities().last());
//! ```

pub mod bnb;
pub mod bound;
pub mod incumbent;
pub mod monitor;
pub mod result;
pub mod stack;
pub mod state;
pub mod stats;
pub mod trail;

use crate::{bnb::BnbSolver, bound::RowMinimumBound, monitor::no_op::NoOperationMonitor};
use thiserror::Error;
use tourbound_model::{error::GraphError, graph::Graph, num::CostNumeric, tour::Tour};

/// The error type for the one-shot solve functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The cost matrix failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] GraphError),

    /// The search ended without producing a tour.
    #[error("search finished without a tour")]
    NoSolution,
}

/// Solves `graph` to optimality with the default bound and no monitoring.
///
/// # Errors
///
/// Returns `SolveError::NoSolution` only if the search produced no tour,
/// which cannot happen for a valid graph with the default bound.
pub fn solve<T>(graph: &Graph<T>) -> Result<Tour<T>, SolveError>
where
    T: CostNumeric,
{
    let mut solver = BnbSolver::preallocated(graph.num_cities());
    let outcome = solver.solve(graph, &mut RowMinimumBound::new(), NoOperationMonitor::new());
    outcome.into_result().into_tour().ok_or(SolveError::NoSolution)
}

/// Validates a square cost matrix given as rows and solves it.
///
/// # Errors
///
/// Returns `SolveError::InvalidInput` if the matrix is empty, not square,
/// not symmetric, has a negative cost, or could overflow `T`.
pub fn solve_matrix<T, R>(rows: &[R]) -> Result<Tour<T>, SolveError>
where
    T: CostNumeric,
    R: AsRef<[T]>,
{
    let graph = Graph::from_rows(rows)?;
    solve(&graph)
}
