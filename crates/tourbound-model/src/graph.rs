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

//! The graph model consumed by the search engine.
//!
//! A `Graph` bundles the validated `CostMatrix` with the `OrderedAdjacency`
//! derived from it. It is pure data: once built it only answers lookups, and
//! the engine borrows it immutably for the whole search.

use crate::{
    adjacency::{AdjacentEdge, OrderedAdjacency},
    complexity::Complexity,
    error::GraphError,
    index::CityIndex,
    matrix::CostMatrix,
    num::CostNumeric,
};
use fixedbitset::FixedBitSet;

/// A complete, symmetric, non-negatively weighted graph over `N >= 1` cities.
#[derive(Clone)]
pub struct Graph<T> {
    matrix: CostMatrix<T>,
    adjacency: OrderedAdjacency<T>,
}

impl<T> Graph<T>
where
    T: CostNumeric,
{
    /// Creates a graph from an already validated matrix.
    pub fn new(matrix: CostMatrix<T>) -> Self {
        let adjacency = OrderedAdjacency::new(&matrix);
        Self { matrix, adjacency }
    }

    /// Validates full rows and builds the graph.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tourbound_model::graph::Graph;
    /// let g = Graph::from_rows(&[[0i64, 3, 4], [3, 0, 5], [4, 5, 0]]).unwrap();
    /// assert_eq!(g.num_cities(), 3);
    /// ```
    #[inline]
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GraphError>
    where
        R: AsRef<[T]>,
    {
        Ok(Self::new(CostMatrix::from_rows(rows)?))
    }

    /// Validates an upper triangle and builds the graph.
    #[inline]
    pub fn from_upper_triangle(num_cities: usize, values: &[T]) -> Result<Self, GraphError> {
        Ok(Self::new(CostMatrix::from_upper_triangle(num_cities, values)?))
    }

    /// Returns the cheapest edge out of `city` to a city not in `visited`,
    /// or `None` if all other cities are visited.
    #[inline]
    pub fn cheapest_unvisited_edge(
        &self,
        city: CityIndex,
        visited: &FixedBitSet,
    ) -> Option<AdjacentEdge<T>> {
        self.adjacency.cheapest_unvisited_edge(city, visited)
    }

    /// Returns the cost of the edge `from -> to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of `0..num_cities`.
    #[inline]
    pub fn cost(&self, from: CityIndex, to: CityIndex) -> T {
        self.matrix.cost(from, to)
    }

    /// Returns the cost of the edge `from -> to` without bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure both indices are within `0..num_cities`.
    #[inline]
    pub unsafe fn cost_unchecked(&self, from: CityIndex, to: CityIndex) -> T {
        unsafe { self.matrix.cost_unchecked(from, to) }
    }
}

impl<T> Graph<T> {
    /// Returns the number of cities.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.matrix.num_cities()
    }

    /// Returns the origin city.
    #[inline]
    pub fn origin(&self) -> CityIndex {
        CityIndex::ORIGIN
    }

    /// Returns the underlying matrix.
    #[inline]
    pub fn matrix(&self) -> &CostMatrix<T> {
        &self.matrix
    }

    /// Returns the sorted adjacency rows.
    #[inline]
    pub fn adjacency(&self) -> &OrderedAdjacency<T> {
        &self.adjacency
    }

    /// Returns the size of the permutation tree over this graph.
    #[inline]
    pub fn complexity(&self) -> Complexity {
        Complexity::new(self.num_cities())
    }
}

impl<T> std::fmt::Debug for Graph<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("num_cities", &self.num_cities())
            .field("matrix", &self.matrix)
            .finish()
    }
}

impl<T> std::fmt::Display for Graph<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Graph(cities: {}, search space: {})",
            self.num_cities(),
            self.complexity()
        )
    }
}
