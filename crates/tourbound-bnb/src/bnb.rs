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

//! Branch-and-bound solver for the symmetric travelling salesman problem.
//!
//! This module implements a stateful, depth-first search over the orderings of
//! the cities that are not the origin. At every node the children (one per
//! unvisited city) are priced with a `LowerBoundEstimator`, sorted by
//! `(lower bound, city)` and visited cheapest first. A child whose bound has
//! reached the incumbent cost by the time it is popped is discarded, together
//! with its whole subtree.
//!
//! The recursion is unrolled into two frame-structured stacks owned by the
//! `BnbSolver`: a `SearchStack` of pending children and a `SearchTrail` that
//! undoes committed visits on backtrack. Children are pushed in descending
//! order so that popping yields them in ascending order, which makes the
//! visiting order identical to a recursive formulation while keeping the
//! machine stack flat. Pricing a child uses a `SearchState::trial_visit`
//! guard, so the state is restored on every path out of the pricing code.
//!
//! A search session object holds the per-run state: the incumbent,
//! statistics and timing. The solver keeps its stack and trail allocations
//! across runs and resets them after every solve.

use crate::{
    bound::LowerBoundEstimator,
    incumbent::{Incumbent, IncumbentError},
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    result::{BnbSolverOutcome, TerminationReason},
    stack::{Candidate, SearchStack},
    state::SearchState,
    stats::BnbSolverStatistics,
    trail::SearchTrail,
};
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric, tour::Tour};

/// An exact depth-first branch-and-bound tour solver.
///
/// This is only the execution engine. Bounds come from a
/// `LowerBoundEstimator`, and observation or early stopping from a
/// `TreeSearchMonitor`.
#[derive(Clone, Debug)]
pub struct BnbSolver<T> {
    trail: SearchTrail<T>,
    stack: SearchStack<T>,
    scratch: Vec<Candidate<T>>,
}

impl<T> Default for BnbSolver<T>
where
    T: CostNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T>
where
    T: CostNumeric,
{
    /// Creates a new solver instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
            scratch: Vec::new(),
        }
    }

    /// Creates a new solver with storage preallocated for `num_cities`.
    ///
    /// # Note
    ///
    /// The solver grows its storage to fit each graph it is given anyway;
    /// preallocating only moves those allocations to construction time.
    #[inline]
    pub fn preallocated(num_cities: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_cities),
            stack: SearchStack::preallocated(num_cities),
            scratch: Vec::with_capacity(num_cities),
        }
    }

    /// Solves `graph` to optimality, or until `monitor` stops the search.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tourbound_bnb::{bnb::BnbSolver, bound::RowMinimumBound};
    /// # use tourbound_bnb::monitor::no_op::NoOperationMonitor;
    /// # use tourbound_model::graph::Graph;
    /// let graph = Graph::from_rows(&[
    ///     [0i64, 10, 15, 20],
    ///     [10, 0, 35, 25],
    ///     [15, 35, 0, 30],
    ///     [20, 25, 30, 0],
    /// ])
    /// .unwrap();
    ///
    /// let mut solver = BnbSolver::new();
    /// let outcome = solver.solve(&graph, &mut RowMinimumBound::new(), NoOperationMonitor::new());
    /// assert_eq!(outcome.result().tour().unwrap().cost(), 80);
    /// ```
    #[inline]
    pub fn solve<B, S>(&mut self, graph: &Graph<T>, bound: &mut B, monitor: S) -> BnbSolverOutcome<T>
    where
        B: LowerBoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        self.solve_internal(graph, bound, monitor, Incumbent::new())
    }

    /// Solves `graph` with the incumbent seeded by `initial`.
    ///
    /// The seed's cost is recomputed on `graph`. It is returned as the optimal
    /// tour if the search finds nothing strictly cheaper.
    ///
    /// # Errors
    ///
    /// Returns an `IncumbentError` if `initial` is not a closed tour visiting
    /// every city of `graph` exactly once, starting and ending at the origin.
    pub fn solve_with_incumbent<B, S>(
        &mut self,
        graph: &Graph<T>,
        bound: &mut B,
        monitor: S,
        initial: &Tour<T>,
    ) -> Result<BnbSolverOutcome<T>, IncumbentError>
    where
        B: LowerBoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        let incumbent = Incumbent::from_tour(graph, initial)?;
        Ok(self.solve_internal(graph, bound, monitor, incumbent))
    }

    #[inline(always)]
    fn solve_internal<B, S>(
        &mut self,
        graph: &Graph<T>,
        bound: &mut B,
        mut monitor: S,
        incumbent: Incumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        B: LowerBoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        let session = BnbSolverSearchSession::new(self, graph, bound, &mut monitor, incumbent);
        let outcome = session.run();
        self.reset();
        outcome
    }

    /// Clears the logical contents of the trail and stack, keeping memory.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
        self.scratch.clear();
    }
}

/// The state and logic of a single search run.
struct BnbSolverSearchSession<'a, T, B, S>
where
    T: CostNumeric,
{
    solver: &'a mut BnbSolver<T>,
    graph: &'a Graph<T>,
    bound: &'a mut B,
    monitor: &'a mut S,
    state: SearchState<T>,
    incumbent: Incumbent<T>,
    stats: BnbSolverStatistics<T>,
    start_time: std::time::Instant,
}

impl<'a, T, B, S> std::fmt::Debug for BnbSolverSearchSession<'a, T, B, S>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("graph", &self.graph)
            .field("state", &self.state)
            .field("incumbent", &self.incumbent)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, B, S> BnbSolverSearchSession<'a, T, B, S>
where
    T: CostNumeric,
    B: LowerBoundEstimator<T>,
    S: TreeSearchMonitor<T>,
{
    #[inline]
    fn new(
        solver: &'a mut BnbSolver<T>,
        graph: &'a Graph<T>,
        bound: &'a mut B,
        monitor: &'a mut S,
        incumbent: Incumbent<T>,
    ) -> Self {
        let mut stats = BnbSolverStatistics::default();
        if !incumbent.is_empty() {
            stats.set_initial_upper_bound(incumbent.best_cost());
        }

        Self {
            solver,
            graph,
            bound,
            monitor,
            state: SearchState::new(graph.num_cities()),
            incumbent,
            stats,
            start_time: std::time::Instant::now(),
        }
    }

    /// Runs the search to completion or until a monitor stops it.
    fn run(mut self) -> BnbSolverOutcome<T> {
        self.monitor.on_enter_search(self.graph, &self.stats);
        self.initialize();

        let termination_reason = loop {
            self.monitor.on_step(&self.state, &self.stats);
            self.stats.on_step();

            if let SearchCommand::Terminate(msg) =
                self.monitor.search_command(&self.state, &self.stats)
            {
                break TerminationReason::Aborted(msg);
            }

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break TerminationReason::OptimalityProven;
                }
                self.backtrack_step();
            } else {
                self.process_next_candidate();
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    /// Builds the outcome from the incumbent and the termination reason.
    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome<T> {
        match reason {
            TerminationReason::OptimalityProven => match self.incumbent.into_tour() {
                Some(tour) => BnbSolverOutcome::optimal(tour, self.stats),
                None => BnbSolverOutcome::exhausted_without_tour(self.stats),
            },
            TerminationReason::Aborted(msg) => {
                BnbSolverOutcome::aborted(self.incumbent.into_tour(), msg, self.stats)
            }
        }
    }

    /// Sizes the stack and trail for the graph, opens the root frame and
    /// expands the root.
    fn initialize(&mut self) {
        let num_cities = self.graph.num_cities();
        self.solver.trail.ensure_capacity(num_cities);
        self.solver.stack.ensure_capacity(num_cities);
        self.solver.scratch.reserve(num_cities);

        let root_bound = self.bound.lower_bound(self.graph, &self.state);
        self.stats.set_root_lower_bound(root_bound);

        // Root frame. Must exist before any candidate is pushed.
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();
        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.depth() as u64);

        if self.state.is_complete() {
            self.handle_complete_tour();
        } else {
            self.expand();
        }
    }

    /// Prices every unvisited city as a child of the current node and pushes
    /// the children so that the cheapest bound is popped first.
    fn expand(&mut self) {
        let graph = self.graph;
        let num_cities = graph.num_cities();
        self.solver.scratch.clear();

        for index in 0..num_cities {
            let city = CityIndex::new(index);
            // SAFETY: `index < num_cities` and the state was built for `graph`.
            if unsafe { self.state.is_visited_unchecked(city) } {
                continue;
            }

            let lower_bound = {
                let trial = self.state.trial_visit(graph, city);
                let remaining = self.bound.estimate_remaining_cost(graph, &trial);
                let lower_bound = trial.running_cost().saturating_add(remaining);
                self.monitor
                    .on_lower_bound_computed(&trial, lower_bound, remaining, &self.stats);
                lower_bound
            };

            self.stats.on_candidate_generated();
            self.solver.scratch.push(Candidate::new(lower_bound, city));
        }

        self.solver.scratch.sort_unstable();

        let count = self.solver.scratch.len();
        self.solver
            .stack
            .extend(self.solver.scratch.iter().rev().copied());
        self.monitor
            .on_candidates_enqueued(&self.state, count, &self.stats);
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    /// Pops the next pending child and either prunes it or descends into it.
    fn process_next_candidate(&mut self) {
        let candidate = match self.solver.stack.pop() {
            Some(c) => c,
            None => return,
        };

        // The incumbent may have improved since the child was priced.
        if candidate.lower_bound() >= self.incumbent.best_cost() {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return;
        }

        self.descend(candidate.city());
    }

    /// Commits `city` and opens a new level for its children.
    fn descend(&mut self, city: CityIndex) {
        // SAFETY: `city` was generated by `expand` from `0..num_cities` and the
        // current city is on the path, so both are in bounds for `graph`.
        let edge = unsafe { self.graph.cost_unchecked(self.state.current_city(), city) };
        let new_cost = self.state.running_cost().saturating_add(edge);

        self.solver.trail.push_frame();
        self.solver
            .trail
            .apply_visit(&mut self.state, city, new_cost);
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.depth() as u64);
        self.monitor.on_descend(&self.state, city, &self.stats);

        if self.state.is_complete() {
            self.handle_complete_tour();
        } else {
            self.expand();
        }
    }

    /// Closes the cycle at a leaf and installs it if strictly cheaper.
    fn handle_complete_tour(&mut self) {
        let cost = self.state.closing_cost(self.graph);

        let state = &self.state;
        let installed = self
            .incumbent
            .try_install(cost, || state.to_closed_tour(cost).into_cities());

        if installed {
            self.stats.on_solution_found();
            if let Some(tour) = self.incumbent.tour() {
                self.monitor.on_solution_found(tour, &self.stats);
            }
        } else {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::TourNotImproving, &self.stats);
        }
    }
}
