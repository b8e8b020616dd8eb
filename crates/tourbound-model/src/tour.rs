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

use crate::{graph::Graph, index::CityIndex, num::CostNumeric};

/// A closed tour and its cost.
///
/// `cities` lists the visiting order with the origin repeated at both ends,
/// so a tour over `N` cities holds `N + 1` entries. The one-city tour is
/// `[0, 0]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tour<T> {
    cost: T,
    cities: Vec<CityIndex>,
}

impl<T> Tour<T>
where
    T: Copy,
{
    /// Constructs a new `Tour`.
    ///
    /// No validation is performed; see `is_hamiltonian_cycle`.
    #[inline]
    pub fn new(cost: T, cities: Vec<CityIndex>) -> Self {
        Self { cost, cities }
    }

    /// Returns the total cost.
    #[inline]
    pub fn cost(&self) -> T {
        self.cost
    }

    /// Returns the visiting order, origin at both ends.
    #[inline]
    pub fn cities(&self) -> &[CityIndex] {
        &self.cities
    }

    /// Returns the number of entries in the visiting order (`N + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Returns `true` if the visiting order is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Consumes the tour and returns the visiting order.
    #[inline]
    pub fn into_cities(self) -> Vec<CityIndex> {
        self.cities
    }

    /// Returns `true` if the visiting order starts and ends at the origin and
    /// visits each of the `num_cities` cities exactly once in between.
    pub fn is_hamiltonian_cycle(&self, num_cities: usize) -> bool {
        if num_cities == 0 || self.cities.len() != num_cities + 1 {
            return false;
        }
        if !self.cities[0].is_origin() || !self.cities[num_cities].is_origin() {
            return false;
        }

        let mut seen = vec![false; num_cities];
        for &c in &self.cities[..num_cities] {
            let i = c.get();
            if i >= num_cities || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }
}

impl<T> Tour<T>
where
    T: CostNumeric,
{
    /// Recomputes the cost of the visiting order on `graph`.
    ///
    /// # Panics
    ///
    /// Panics if a city is out of bounds for `graph`.
    pub fn cost_in(&self, graph: &Graph<T>) -> T {
        self.cities
            .windows(2)
            .fold(T::zero(), |acc, w| acc.saturating_add(graph.cost(w[0], w[1])))
    }
}

impl<T> std::fmt::Display for Tour<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tour Summary")?;
        writeln!(f, "   Cost: {}", self.cost)?;
        writeln!(f)?;

        if self.cities.is_empty() {
            writeln!(f, "   (Empty tour)")?;
            return Ok(());
        }

        writeln!(f, "   {:<10} | {:<10}", "Step", "City")?;
        writeln!(f, "   {:-<10}-+-{:-<10}", "", "")?;
        for (step, city) in self.cities.iter().enumerate() {
            writeln!(f, "   {:<10} | {:<10}", step, city.get())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour(cost: i64, cities: &[usize]) -> Tour<i64> {
        Tour::new(cost, cities.iter().copied().map(CityIndex::new).collect())
    }

    #[test]
    fn test_accessors() {
        let t = tour(80, &[0, 1, 3, 2, 0]);
        assert_eq!(t.cost(), 80);
        assert_eq!(t.len(), 5);
        assert!(!t.is_empty());
        assert_eq!(t.cities()[2], CityIndex::new(3));
        assert_eq!(t.clone().into_cities().len(), 5);
    }

    #[test]
    fn test_is_hamiltonian_cycle() {
        assert!(tour(0, &[0, 0]).is_hamiltonian_cycle(1));
        assert!(tour(0, &[0, 2, 1, 0]).is_hamiltonian_cycle(3));

        assert!(!tour(0, &[0, 2, 1]).is_hamiltonian_cycle(3)); // not closed
        assert!(!tour(0, &[1, 0, 2, 1]).is_hamiltonian_cycle(3)); // wrong origin
        assert!(!tour(0, &[0, 1, 1, 0]).is_hamiltonian_cycle(3)); // repeat
        assert!(!tour(0, &[0, 1, 3, 0]).is_hamiltonian_cycle(3)); // out of range
        assert!(!tour(0, &[]).is_hamiltonian_cycle(0));
    }

    #[test]
    fn test_cost_in_sums_edges() {
        let g = Graph::from_rows(&[
            [0i64, 10, 15, 20],
            [10, 0, 35, 25],
            [15, 35, 0, 30],
            [20, 25, 30, 0],
        ])
        .unwrap();
        assert_eq!(tour(0, &[0, 1, 3, 2, 0]).cost_in(&g), 80);
        assert_eq!(tour(0, &[0, 2, 1, 3, 0]).cost_in(&g), 95);
        assert_eq!(tour(0, &[0, 0]).cost_in(&g), 0);
    }

    #[test]
    fn test_display_formatting_example() {
        let t = tour(7, &[0, 1, 0]);
        let mut expected = String::new();
        expected.push_str("Tour Summary\n");
        expected.push_str("   Cost: 7\n");
        expected.push('\n');
        expected.push_str("   Step       | City      \n");
        expected.push_str("   -----------+-----------\n");
        expected.push_str("   0          | 0         \n");
        expected.push_str("   1          | 1         \n");
        expected.push_str("   2          | 0         \n");
        assert_eq!(format!("{}", t), expected);
    }
}
