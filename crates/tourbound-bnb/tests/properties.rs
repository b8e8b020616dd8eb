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

use proptest::prelude::*;
use tourbound_bnb::{
    bnb::BnbSolver,
    bound::{LowerBoundEstimator, RowMinimumBound},
    monitor::no_op::NoOperationMonitor,
    state::SearchState,
    trail::SearchTrail,
};
use tourbound_model::{graph::Graph, index::CityIndex};

type IntegerType = i64;

/// Cheapest way to close the tour from the end of `path`, by enumeration.
fn best_completion(graph: &Graph<IntegerType>, path: &mut Vec<CityIndex>, used: &mut [bool]) -> IntegerType {
    let n = graph.num_cities();
    let last = *path.last().unwrap();
    if path.len() == n {
        return graph.cost(last, CityIndex::ORIGIN);
    }

    let mut best = IntegerType::MAX;
    for i in 1..n {
        if used[i] {
            continue;
        }
        used[i] = true;
        path.push(CityIndex::new(i));
        let rest = best_completion(graph, path, used);
        path.pop();
        used[i] = false;
        best = best.min(graph.cost(last, CityIndex::new(i)) + rest);
    }
    best
}

fn brute_force(graph: &Graph<IntegerType>) -> IntegerType {
    let mut used = vec![false; graph.num_cities()];
    used[0] = true;
    best_completion(graph, &mut vec![CityIndex::ORIGIN], &mut used)
}

fn instance(max_cities: usize) -> impl Strategy<Value = Graph<IntegerType>> {
    (1..=max_cities).prop_flat_map(|n| {
        prop::collection::vec(0..1_000 as IntegerType, n * (n - 1) / 2)
            .prop_map(move |values| Graph::from_upper_triangle(n, &values).unwrap())
    })
}

/// An instance together with a partial path through it.
fn instance_with_prefix() -> impl Strategy<Value = (Graph<IntegerType>, Vec<usize>)> {
    instance(7).prop_flat_map(|graph| {
        let n = graph.num_cities();
        let order = Just((1..n).collect::<Vec<_>>()).prop_shuffle();
        (Just(graph), order, 0..n).prop_map(|(graph, mut order, len)| {
            order.truncate(len);
            (graph, order)
        })
    })
}

proptest! {
    #[test]
    fn prop_optimal_cost_matches_enumeration(graph in instance(7)) {
        let mut solver = BnbSolver::new();
        let outcome = solver.solve(&graph, &mut RowMinimumBound::new(), NoOperationMonitor::new());

        prop_assert!(outcome.result().is_optimal());
        let tour = outcome.result().tour().unwrap();
        prop_assert_eq!(tour.cost(), brute_force(&graph));
    }

    #[test]
    fn prop_tour_is_valid_and_cost_is_its_edge_sum(graph in instance(8)) {
        let n = graph.num_cities();
        let tour = tourbound_bnb::solve(&graph).unwrap();

        prop_assert_eq!(tour.len(), n + 1);
        prop_assert!(tour.is_hamiltonian_cycle(n));
        prop_assert_eq!(tour.cities()[0], CityIndex::ORIGIN);
        prop_assert_eq!(tour.cities()[n], CityIndex::ORIGIN);

        let edge_sum: IntegerType = tour
            .cities()
            .windows(2)
            .map(|w| graph.cost(w[0], w[1]))
            .sum();
        prop_assert_eq!(tour.cost(), edge_sum);
    }

    #[test]
    fn prop_root_bound_never_exceeds_optimum(graph in instance(7)) {
        let mut solver = BnbSolver::new();
        let outcome = solver.solve(&graph, &mut RowMinimumBound::new(), NoOperationMonitor::new());
        let optimum = outcome.result().tour().unwrap().cost();
        prop_assert!(outcome.statistics().root_lower_bound <= optimum);
    }

    #[test]
    fn prop_row_minimum_bound_is_admissible((graph, prefix) in instance_with_prefix()) {
        let n = graph.num_cities();
        let mut state = SearchState::<IntegerType>::new(n);
        let mut trail = SearchTrail::<IntegerType>::new();
        trail.push_frame();
        for &i in &prefix {
            let city = CityIndex::new(i);
            let cost = state.running_cost() + graph.cost(state.current_city(), city);
            trail.apply_visit(&mut state, city, cost);
        }

        let mut used = vec![false; n];
        for city in state.path() {
            used[city.get()] = true;
        }
        let mut path = state.path().to_vec();
        let exact = state.running_cost() + best_completion(&graph, &mut path, &mut used);

        let estimate = RowMinimumBound::new().lower_bound(&graph, &state);
        prop_assert!(estimate <= exact, "bound {} exceeds best completion {}", estimate, exact);

        trail.backtrack(&mut state);
        prop_assert_eq!(state.depth(), 1);
        prop_assert_eq!(state.running_cost(), 0);
    }

    #[test]
    fn prop_repeated_solves_agree(graph in instance(7)) {
        let mut solver = BnbSolver::new();
        let mut bound = RowMinimumBound::new();
        let a = solver.solve(&graph, &mut bound, NoOperationMonitor::new());
        let b = solver.solve(&graph, &mut bound, NoOperationMonitor::new());
        prop_assert_eq!(a.result(), b.result());
        prop_assert_eq!(a.statistics().nodes_explored, b.statistics().nodes_explored);
    }
}
