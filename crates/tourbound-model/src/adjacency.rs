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

//! Per-city edge lists sorted by cost.
//!
//! For every city `i` the structure stores the `N - 1` pairs `(cost[i][j], j)`
//! with `j != i`, sorted ascending by cost and then by city index. Rows are
//! flattened into one vector with stride `N - 1`.
//!
//! Because each row is sorted, the first entry that passes a filter is the
//! cheapest edge passing it. Queries such as "cheapest edge out of `i` to an
//! unvisited city" are therefore a forward scan that usually stops after a few
//! entries, O(N) in the worst case.

use crate::{index::CityIndex, matrix::CostMatrix, num::CostNumeric};
use fixedbitset::FixedBitSet;

/// One entry of a sorted adjacency row.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct AdjacentEdge<T> {
    cost: T,
    city: CityIndex,
}

impl<T> AdjacentEdge<T>
where
    T: Copy,
{
    /// Creates a new edge entry.
    #[inline(always)]
    pub fn new(cost: T, city: CityIndex) -> Self {
        Self { cost, city }
    }

    /// Returns the edge cost.
    #[inline(always)]
    pub fn cost(&self) -> T {
        self.cost
    }

    /// Returns the city at the other end of the edge.
    #[inline(always)]
    pub fn city(&self) -> CityIndex {
        self.city
    }
}

/// Sorted adjacency rows derived from a `CostMatrix`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderedAdjacency<T> {
    edges: Vec<AdjacentEdge<T>>, // len = num_cities * (num_cities - 1)
    num_cities: usize,
}

impl<T> OrderedAdjacency<T>
where
    T: CostNumeric,
{
    /// Derives the sorted rows from `matrix`.
    pub fn new(matrix: &CostMatrix<T>) -> Self {
        let n = matrix.num_cities();
        let stride = n.saturating_sub(1);
        let mut edges = Vec::with_capacity(n * stride);

        for i in 0..n {
            let from = CityIndex::new(i);
            let start = edges.len();
            edges.extend(
                (0..n)
                    .filter(|&j| j != i)
                    .map(|j| AdjacentEdge::new(matrix.cost(from, CityIndex::new(j)), CityIndex::new(j))),
            );
            // Field order makes the derived `Ord` compare (cost, city).
            edges[start..].sort_unstable();
        }

        Self {
            edges,
            num_cities: n,
        }
    }

    /// Returns the cheapest edge out of `city` whose target satisfies `accept`.
    ///
    /// Returns `None` if no target is accepted.
    #[inline]
    pub fn cheapest_edge_where<F>(&self, city: CityIndex, mut accept: F) -> Option<AdjacentEdge<T>>
    where
        F: FnMut(CityIndex) -> bool,
    {
        self.row(city).iter().copied().find(|edge| accept(edge.city))
    }

    /// Returns the cheapest edge out of `city` to a city not in `visited`.
    ///
    /// Returns `None` (an infinitely expensive edge) if every other city is
    /// visited.
    ///
    /// # Panics
    ///
    /// Panics if `city` is out of `0..num_cities`.
    #[inline]
    pub fn cheapest_unvisited_edge(
        &self,
        city: CityIndex,
        visited: &FixedBitSet,
    ) -> Option<AdjacentEdge<T>> {
        self.cheapest_edge_where(city, |target| !visited.contains(target.get()))
    }
}

impl<T> OrderedAdjacency<T> {
    /// Returns the number of cities.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.num_cities
    }

    /// Returns the sorted edges leaving `city`.
    ///
    /// # Panics
    ///
    /// Panics if `city` is out of `0..num_cities`.
    #[inline]
    pub fn row(&self, city: CityIndex) -> &[AdjacentEdge<T>] {
        assert!(
            city.get() < self.num_cities,
            "called `OrderedAdjacency::row` with city index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            city.get()
        );

        let stride = self.num_cities - 1;
        let start = city.get() * stride;
        &self.edges[start..start + stride]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    fn sample() -> OrderedAdjacency<i64> {
        let m = CostMatrix::from_rows(&[
            [0i64, 10, 15, 20],
            [10, 0, 35, 25],
            [15, 35, 0, 30],
            [20, 25, 30, 0],
        ])
        .unwrap();
        OrderedAdjacency::new(&m)
    }

    #[test]
    fn test_rows_are_sorted_and_exclude_self() {
        let adj = sample();
        let row: Vec<(i64, usize)> = adj
            .row(ci(1))
            .iter()
            .map(|e| (e.cost(), e.city().get()))
            .collect();
        assert_eq!(row, vec![(10, 0), (25, 3), (35, 2)]);

        for i in 0..4 {
            let row = adj.row(ci(i));
            assert_eq!(row.len(), 3);
            assert!(row.iter().all(|e| e.city() != ci(i)));
            assert!(row.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_ties_are_broken_by_city_index() {
        let m = CostMatrix::from_upper_triangle(4, &[5i64, 5, 5, 1, 1, 1]).unwrap();
        let adj = OrderedAdjacency::new(&m);
        let row: Vec<usize> = adj.row(ci(0)).iter().map(|e| e.city().get()).collect();
        assert_eq!(row, vec![1, 2, 3]);
    }

    #[test]
    fn test_cheapest_unvisited_edge_skips_visited() {
        let adj = sample();
        let mut visited = FixedBitSet::with_capacity(4);

        let e = adj.cheapest_unvisited_edge(ci(2), &visited).unwrap();
        assert_eq!((e.cost(), e.city()), (15, ci(0)));

        visited.insert(0);
        let e = adj.cheapest_unvisited_edge(ci(2), &visited).unwrap();
        assert_eq!((e.cost(), e.city()), (30, ci(3)));

        visited.insert(3);
        visited.insert(1);
        assert!(adj.cheapest_unvisited_edge(ci(2), &visited).is_none());
    }

    #[test]
    fn test_cheapest_edge_where_uses_predicate() {
        let adj = sample();
        let e = adj
            .cheapest_edge_where(ci(3), |c| c.get() % 2 == 0)
            .unwrap();
        assert_eq!((e.cost(), e.city()), (20, ci(0)));
        assert!(adj.cheapest_edge_where(ci(3), |_| false).is_none());
    }

    #[test]
    fn test_single_city_has_empty_row() {
        let m = CostMatrix::<i64>::from_upper_triangle(1, &[]).unwrap();
        let adj = OrderedAdjacency::new(&m);
        assert!(adj.row(ci(0)).is_empty());
        let visited = FixedBitSet::with_capacity(1);
        assert!(adj.cheapest_unvisited_edge(ci(0), &visited).is_none());
    }

    #[test]
    #[should_panic(expected = "called `OrderedAdjacency::row` with city index out of bounds")]
    fn test_row_panics_out_of_bounds() {
        let adj = sample();
        let _ = adj.row(ci(4));
    }
}
