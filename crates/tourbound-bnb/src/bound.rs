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

//! Admissible lower bounds on the cost of completing a partial tour.
//!
//! A `LowerBoundEstimator` looks at a `SearchState` and returns a value no
//! larger than the cheapest way to finish the tour from it. The engine adds
//! that estimate to the running cost and prunes any branch whose bound
//! already reaches the incumbent. Estimators must be admissible (never
//! overestimate); pruning is only correct under that assumption.
//!
//! `RowMinimumBound` is the reference estimator. Every city that is still
//! unvisited has to be left exactly once on the way back to the origin, and
//! it can only be left towards another unvisited city or the origin itself.
//! Summing the cheapest such edge for each unvisited city therefore never
//! exceeds the true remaining cost. Once nothing is left unvisited the only
//! remaining edge is the one closing the cycle, and its exact cost is used.

use crate::state::SearchState;
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric};

/// Computes admissible estimates of the cost to complete a partial tour.
pub trait LowerBoundEstimator<T>
where
    T: CostNumeric,
{
    /// Returns the name of the estimator.
    fn name(&self) -> &str;

    /// Returns a lower bound on the cost still to be paid from `state` to a
    /// closed tour, excluding the running cost already paid.
    fn estimate_remaining_cost(&mut self, graph: &Graph<T>, state: &SearchState<T>) -> T;

    /// Returns a lower bound on the cost of every complete tour extending
    /// `state`.
    #[inline]
    fn lower_bound(&mut self, graph: &Graph<T>, state: &SearchState<T>) -> T {
        state
            .running_cost()
            .saturating_add(self.estimate_remaining_cost(graph, state))
    }
}

impl<T> std::fmt::Debug for dyn LowerBoundEstimator<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LowerBoundEstimator({})", self.name())
    }
}

/// The sum-of-row-minima bound over the unvisited cities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowMinimumBound;

impl RowMinimumBound {
    /// Creates a new `RowMinimumBound`.
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl<T> LowerBoundEstimator<T> for RowMinimumBound
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "RowMinimumBound"
    }

    fn estimate_remaining_cost(&mut self, graph: &Graph<T>, state: &SearchState<T>) -> T {
        if state.is_complete() {
            return graph.cost(state.current_city(), CityIndex::ORIGIN);
        }

        let visited = state.visited();
        let adjacency = graph.adjacency();
        let mut remaining = T::zero();
        for city in state.unvisited() {
            // The origin is still open for re-entry.
            let cheapest = adjacency
                .cheapest_edge_where(city, |to| to.is_origin() || !visited.contains(to.get()));
            if let Some(edge) = cheapest {
                remaining = remaining.saturating_add(edge.cost());
            }
        }
        remaining
    }
}
