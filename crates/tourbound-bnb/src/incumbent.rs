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

//! Incumbent management for the tour search.
//!
//! The incumbent is the best complete tour found so far together with its
//! cost, the upper bound every branch is pruned against. It starts empty at
//! `T::max_value()` ("+infinity") and is only ever replaced by a strictly
//! cheaper tour, so among equal-cost tours the first one found is kept.
//!
//! A search can also be warm-started from a known tour. The tour is checked
//! to be a Hamiltonian cycle anchored at the origin and its cost is
//! recomputed on the graph; the caller's cost is never trusted.

use thiserror::Error;
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric, tour::Tour};

/// The reasons a tour cannot seed the incumbent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncumbentError {
    /// The tour does not list `num_cities + 1` cities.
    #[error("tour lists {actual} cities but a closed tour over {num_cities} cities lists {}", .num_cities + 1)]
    WrongLength {
        /// The number of cities of the instance.
        num_cities: usize,
        /// The number of entries in the tour.
        actual: usize,
    },
    /// The tour does not start and end at the origin.
    #[error("tour must start and end at the origin city 0")]
    NotAnchoredAtOrigin,
    /// The tour names a city that does not exist.
    #[error("tour names city {city} but the instance has {num_cities} cities")]
    CityOutOfBounds {
        /// The offending city.
        city: usize,
        /// The number of cities of the instance.
        num_cities: usize,
    },
    /// The tour visits a city more than once.
    #[error("tour visits city {city} more than once")]
    DuplicateCity {
        /// The repeated city.
        city: usize,
    },
}

/// The best tour found so far and its cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incumbent<T> {
    best_cost: T,
    best_tour: Option<Tour<T>>,
}

impl<T> Default for Incumbent<T>
where
    T: CostNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Incumbent<T>
where
    T: CostNumeric,
{
    /// Creates an empty incumbent with an infinite upper bound.
    #[inline]
    pub fn new() -> Self {
        Self {
            best_cost: T::max_value(),
            best_tour: None,
        }
    }

    /// Creates an incumbent seeded with `tour`, after validating it against
    /// `graph` and recomputing its cost.
    pub fn from_tour(graph: &Graph<T>, tour: &Tour<T>) -> Result<Self, IncumbentError> {
        let num_cities = graph.num_cities();
        let cities = tour.cities();

        if cities.len() != num_cities + 1 {
            return Err(IncumbentError::WrongLength {
                num_cities,
                actual: cities.len(),
            });
        }
        if !cities[0].is_origin() || !cities[num_cities].is_origin() {
            return Err(IncumbentError::NotAnchoredAtOrigin);
        }

        let mut seen = vec![false; num_cities];
        for &city in &cities[..num_cities] {
            let index = city.get();
            if index >= num_cities {
                return Err(IncumbentError::CityOutOfBounds {
                    city: index,
                    num_cities,
                });
            }
            if seen[index] {
                return Err(IncumbentError::DuplicateCity { city: index });
            }
            seen[index] = true;
        }

        let cost = tour.cost_in(graph);
        Ok(Self {
            best_cost: cost,
            best_tour: Some(Tour::new(cost, cities.to_vec())),
        })
    }

    /// Returns the current upper bound.
    #[inline]
    pub fn best_cost(&self) -> T {
        self.best_cost
    }

    /// Returns the best tour, if one is known.
    #[inline]
    pub fn tour(&self) -> Option<&Tour<T>> {
        self.best_tour.as_ref()
    }

    /// Returns `true` if no tour is known yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.best_tour.is_none()
    }

    /// Returns `true` if a tour of cost `cost` would replace the incumbent.
    #[inline]
    pub fn improves(&self, cost: T) -> bool {
        cost < self.best_cost
    }

    /// Installs the tour produced by `build` if `cost` is strictly below the
    /// current bound. Returns `true` if the incumbent changed.
    ///
    /// `build` is only invoked on improvement.
    #[inline]
    pub fn try_install<F>(&mut self, cost: T, build: F) -> bool
    where
        F: FnOnce() -> Vec<CityIndex>,
    {
        if !self.improves(cost) {
            return false;
        }
        self.best_cost = cost;
        self.best_tour = Some(Tour::new(cost, build()));
        true
    }

    /// Consumes the incumbent and returns the best tour.
    #[inline]
    pub fn into_tour(self) -> Option<Tour<T>> {
        self.best_tour
    }
}
