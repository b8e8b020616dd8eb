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

//! Validated, immutable edge cost storage.
//!
//! `CostMatrix` stores the full `N x N` matrix flattened row-major, so a row
//! is one contiguous slice. The diagonal is never read from input and is
//! stored as zero; this makes the closing edge of the trivial one-city tour
//! cost nothing without special casing.
//!
//! Construction validates eagerly:
//! - at least one city,
//! - square shape (for `from_rows`) or the exact triangle length (for
//!   `from_upper_triangle`),
//! - non-negative off-diagonal costs,
//! - symmetry,
//! - no tour can reach `T::max_value()`, which the engine reserves as the
//!   "+infinity" sentinel.

use crate::{error::GraphError, index::CityIndex, num::CostNumeric};

#[inline(always)]
fn flatten_index(num_cities: usize, from: usize, to: usize) -> usize {
    from * num_cities + to
}

/// A symmetric, non-negative `N x N` cost matrix.
#[derive(Clone, PartialEq, Eq)]
pub struct CostMatrix<T> {
    costs: Vec<T>, // len = num_cities * num_cities
    num_cities: usize,
}

impl<T> CostMatrix<T>
where
    T: CostNumeric,
{
    /// Builds a matrix from full rows.
    ///
    /// Diagonal entries are ignored. Returns an error if the matrix is empty,
    /// not square, has a negative off-diagonal entry, is not symmetric, or
    /// could overflow `T` on a complete tour.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tourbound_model::matrix::CostMatrix;
    /// # use tourbound_model::index::CityIndex;
    /// let m = CostMatrix::from_rows(&[[0i64, 4], [4, 0]]).unwrap();
    /// assert_eq!(m.cost(CityIndex::new(0), CityIndex::new(1)), 4);
    /// ```
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GraphError>
    where
        R: AsRef<[T]>,
    {
        let num_cities = rows.len();
        if num_cities == 0 {
            return Err(GraphError::Empty);
        }

        let mut costs = Vec::with_capacity(num_cities * num_cities);
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != num_cities {
                return Err(GraphError::NonSquare {
                    row: row_index,
                    len: row.len(),
                    expected: num_cities,
                });
            }
            costs.extend(row.iter().enumerate().map(|(col, &c)| {
                if col == row_index { T::zero() } else { c }
            }));
        }

        let matrix = Self { costs, num_cities };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Builds a matrix from the strict upper triangle.
    ///
    /// `values` holds `cost[i][j]` for every `i < j`, row-major by `i` and then
    /// `j`; the lower triangle is mirrored from it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tourbound_model::matrix::CostMatrix;
    /// # use tourbound_model::index::CityIndex;
    /// // (0,1)=1 (0,2)=2 (1,2)=3
    /// let m = CostMatrix::from_upper_triangle(3, &[1i32, 2, 3]).unwrap();
    /// assert_eq!(m.cost(CityIndex::new(2), CityIndex::new(1)), 3);
    /// ```
    pub fn from_upper_triangle(num_cities: usize, values: &[T]) -> Result<Self, GraphError> {
        if num_cities == 0 {
            return Err(GraphError::Empty);
        }

        let expected = num_cities * (num_cities - 1) / 2;
        if values.len() != expected {
            return Err(GraphError::TriangleLength {
                expected,
                actual: values.len(),
            });
        }

        let mut costs = vec![T::zero(); num_cities * num_cities];
        let mut values = values.iter().copied();
        for i in 0..num_cities {
            for j in (i + 1)..num_cities {
                // Length was checked above.
                let c = values.next().unwrap_or_else(T::zero);
                costs[flatten_index(num_cities, i, j)] = c;
                costs[flatten_index(num_cities, j, i)] = c;
            }
        }

        let matrix = Self { costs, num_cities };
        matrix.validate()?;
        Ok(matrix)
    }

    fn validate(&self) -> Result<(), GraphError> {
        let n = self.num_cities;
        for i in 0..n {
            for j in (i + 1)..n {
                let upper = self.costs[flatten_index(n, i, j)];
                let lower = self.costs[flatten_index(n, j, i)];
                if upper < T::zero() {
                    return Err(GraphError::NegativeCost { from: i, to: j });
                }
                if lower < T::zero() {
                    return Err(GraphError::NegativeCost { from: j, to: i });
                }
                if upper != lower {
                    return Err(GraphError::Asymmetric { i, j });
                }
            }
        }

        // Every tour uses exactly one outgoing edge per city, so the sum of
        // row maxima bounds every tour cost from above.
        let mut worst_tour = T::zero();
        for i in 0..n {
            let row_max = self.row_slice(i).iter().copied().max().unwrap_or_else(T::zero);
            worst_tour = worst_tour
                .checked_add(&row_max)
                .ok_or(GraphError::CostOverflow)?;
        }
        if worst_tour == T::max_value() {
            return Err(GraphError::CostOverflow);
        }

        Ok(())
    }

    #[inline(always)]
    fn row_slice(&self, city: usize) -> &[T] {
        let start = city * self.num_cities;
        &self.costs[start..start + self.num_cities]
    }
}

impl<T> CostMatrix<T> {
    /// Returns the number of cities.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.num_cities
    }

    /// Returns the cost of the edge `from -> to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of `0..num_cities`.
    #[inline]
    pub fn cost(&self, from: CityIndex, to: CityIndex) -> T
    where
        T: Copy,
    {
        assert!(
            from.get() < self.num_cities && to.get() < self.num_cities,
            "called `CostMatrix::cost` with city index out of bounds: the len is {} but the indices are {} and {}",
            self.num_cities,
            from.get(),
            to.get()
        );

        self.costs[flatten_index(self.num_cities, from.get(), to.get())]
    }

    /// Returns the cost of the edge `from -> to` without bounds checking.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either index is out of `0..num_cities`.
    ///
    /// # Safety
    ///
    /// The caller must ensure both indices are within `0..num_cities`.
    #[inline]
    pub unsafe fn cost_unchecked(&self, from: CityIndex, to: CityIndex) -> T
    where
        T: Copy,
    {
        debug_assert!(
            from.get() < self.num_cities && to.get() < self.num_cities,
            "called `CostMatrix::cost_unchecked` with city index out of bounds: the len is {} but the indices are {} and {}",
            self.num_cities,
            from.get(),
            to.get()
        );

        unsafe {
            *self
                .costs
                .get_unchecked(flatten_index(self.num_cities, from.get(), to.get()))
        }
    }

    /// Returns the row of costs leaving `city`.
    ///
    /// # Panics
    ///
    /// Panics if `city` is out of `0..num_cities`.
    #[inline]
    pub fn row(&self, city: CityIndex) -> &[T] {
        let start = city.get() * self.num_cities;
        &self.costs[start..start + self.num_cities]
    }

    /// Returns the flattened row-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.costs
    }
}

impl<T> std::fmt::Debug for CostMatrix<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostMatrix")
            .field("num_cities", &self.num_cities)
            .field("costs", &self.costs)
            .finish()
    }
}

impl<T> std::fmt::Display for CostMatrix<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CostMatrix({} cities)", self.num_cities)?;
        for row in self.costs.chunks(self.num_cities.max(1)) {
            let line: Vec<String> = row.iter().map(|c| format!("{:>6}", c)).collect();
            writeln!(f, "  {}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    #[test]
    fn test_from_rows_stores_costs_and_zeroes_diagonal() {
        let m = CostMatrix::from_rows(&[[9i64, 1, 2], [1, 9, 3], [2, 3, 9]]).unwrap();
        assert_eq!(m.num_cities(), 3);
        assert_eq!(m.cost(ci(0), ci(0)), 0);
        assert_eq!(m.cost(ci(1), ci(1)), 0);
        assert_eq!(m.cost(ci(0), ci(2)), 2);
        assert_eq!(m.cost(ci(2), ci(1)), 3);
        assert_eq!(m.row(ci(1)), &[1, 0, 3]);
    }

    #[test]
    fn test_from_rows_accepts_vectors() {
        let rows = vec![vec![0i32, 5], vec![5, 0]];
        let m = CostMatrix::from_rows(&rows).unwrap();
        assert_eq!(m.as_slice(), &[0, 5, 5, 0]);
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        let rows: Vec<Vec<i64>> = Vec::new();
        assert_eq!(CostMatrix::from_rows(&rows), Err(GraphError::Empty));
    }

    #[test]
    fn test_from_rows_rejects_non_square() {
        let rows = vec![vec![0i64, 1, 2], vec![1, 0], vec![2, 3, 0]];
        assert_eq!(
            CostMatrix::from_rows(&rows),
            Err(GraphError::NonSquare {
                row: 1,
                len: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn test_from_rows_rejects_negative_cost() {
        let rows = [[0i64, -1], [-1, 0]];
        assert_eq!(
            CostMatrix::from_rows(&rows),
            Err(GraphError::NegativeCost { from: 0, to: 1 })
        );
    }

    #[test]
    fn test_from_rows_ignores_negative_diagonal() {
        let rows = [[-5i64, 1], [1, -7]];
        assert!(CostMatrix::from_rows(&rows).is_ok());
    }

    #[test]
    fn test_from_rows_rejects_asymmetry() {
        let rows = [[0i64, 1, 2], [1, 0, 3], [2, 4, 0]];
        assert_eq!(
            CostMatrix::from_rows(&rows),
            Err(GraphError::Asymmetric { i: 1, j: 2 })
        );
    }

    #[test]
    fn test_from_rows_rejects_possible_overflow() {
        let rows = [[0i8, 100], [100, 0]];
        assert_eq!(CostMatrix::from_rows(&rows), Err(GraphError::CostOverflow));

        let rows = [[0i8, 60], [60, 0]];
        assert!(CostMatrix::from_rows(&rows).is_ok());
    }

    #[test]
    fn test_from_upper_triangle_mirrors_values() {
        let m = CostMatrix::from_upper_triangle(4, &[1i64, 2, 3, 4, 5, 6]).unwrap();
        // (0,1)=1 (0,2)=2 (0,3)=3 (1,2)=4 (1,3)=5 (2,3)=6
        assert_eq!(m.cost(ci(0), ci(3)), 3);
        assert_eq!(m.cost(ci(3), ci(0)), 3);
        assert_eq!(m.cost(ci(1), ci(2)), 4);
        assert_eq!(m.cost(ci(3), ci(2)), 6);
        assert_eq!(m.cost(ci(2), ci(2)), 0);
    }

    #[test]
    fn test_from_upper_triangle_single_city() {
        let m = CostMatrix::<i64>::from_upper_triangle(1, &[]).unwrap();
        assert_eq!(m.num_cities(), 1);
        assert_eq!(m.cost(ci(0), ci(0)), 0);
    }

    #[test]
    fn test_from_upper_triangle_rejects_wrong_length() {
        assert_eq!(
            CostMatrix::from_upper_triangle(3, &[1i64, 2]),
            Err(GraphError::TriangleLength {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            CostMatrix::<i64>::from_upper_triangle(0, &[]),
            Err(GraphError::Empty)
        );
    }

    #[test]
    fn test_cost_unchecked_matches_checked() {
        let m = CostMatrix::from_upper_triangle(3, &[7i64, 8, 9]).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let checked = m.cost(ci(i), ci(j));
                let unchecked = unsafe { m.cost_unchecked(ci(i), ci(j)) };
                assert_eq!(checked, unchecked);
            }
        }
    }

    #[test]
    #[should_panic(expected = "called `CostMatrix::cost` with city index out of bounds")]
    fn test_cost_panics_out_of_bounds() {
        let m = CostMatrix::from_upper_triangle(2, &[1i64]).unwrap();
        let _ = m.cost(ci(0), ci(2));
    }

    #[test]
    fn test_display_lists_rows() {
        let m = CostMatrix::from_upper_triangle(2, &[3i64]).unwrap();
        let s = format!("{}", m);
        assert!(s.starts_with("CostMatrix(2 cities)"));
        assert_eq!(s.lines().count(), 3);
    }
}
