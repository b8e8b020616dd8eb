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

use crate::stats::BnbSolverStatistics;
use tourbound_model::tour::Tour;

/// The tour a search run produced, qualified by what was proven about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// The search space was exhausted; no cheaper tour exists.
    Optimal(Tour<T>),
    /// A tour was found but the search stopped before proving optimality.
    Feasible(Tour<T>),
    /// The search stopped before any tour was known.
    Unknown,
}

impl<T> SolverResult<T> {
    /// Returns the tour, if any.
    #[inline]
    pub fn tour(&self) -> Option<&Tour<T>> {
        match self {
            SolverResult::Optimal(tour) | SolverResult::Feasible(tour) => Some(tour),
            SolverResult::Unknown => None,
        }
    }

    /// Consumes the result and returns the tour, if any.
    #[inline]
    pub fn into_tour(self) -> Option<Tour<T>> {
        match self {
            SolverResult::Optimal(tour) | SolverResult::Feasible(tour) => Some(tour),
            SolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self, SolverResult::Feasible(_))
    }

    /// Returns the optimal tour.
    ///
    /// # Panics
    ///
    /// Panics if the result is not `Optimal`.
    #[inline]
    pub fn unwrap_optimal(self) -> Tour<T> {
        match self {
            SolverResult::Optimal(tour) => tour,
            SolverResult::Feasible(_) => {
                panic!("called `SolverResult::unwrap_optimal()` on a `Feasible` value")
            }
            SolverResult::Unknown => {
                panic!("called `SolverResult::unwrap_optimal()` on an `Unknown` value")
            }
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(tour) => write!(f, "Optimal(cost={})", tour.cost()),
            SolverResult::Feasible(tour) => write!(f, "Feasible(cost={})", tour.cost()),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why a search run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search space was exhausted.
    OptimalityProven,
    /// The search was stopped early. The string says why.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics<T>,
}

impl<T> BnbSolverOutcome<T> {
    #[inline]
    pub fn optimal(tour: Tour<T>, statistics: BnbSolverStatistics<T>) -> Self {
        Self {
            result: SolverResult::Optimal(tour),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(tour: Option<Tour<T>>, reason: R, statistics: BnbSolverStatistics<T>) -> Self
    where
        R: Into<String>,
    {
        let result = match tour {
            Some(tour) => SolverResult::Feasible(tour),
            None => SolverResult::Unknown,
        };

        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// The search space was exhausted without a tour ever beating the
    /// initial bound. Only reachable with an estimator that is not admissible.
    #[inline]
    pub fn exhausted_without_tour(statistics: BnbSolverStatistics<T>) -> Self {
        Self::aborted(None, "search space exhausted without a tour", statistics)
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics<T> {
        &self.statistics
    }

    /// Consumes the outcome and returns the solver result.
    #[inline]
    pub fn into_result(self) -> SolverResult<T> {
        self.result
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result:      {}", self.result)?;
        writeln!(f, "Termination: {}", self.termination_reason)?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourbound_model::index::CityIndex;

    type IntegerType = i64;

    fn tour(cost: IntegerType) -> Tour<IntegerType> {
        Tour::new(cost, vec![CityIndex::new(0), CityIndex::new(1), CityIndex::new(0)])
    }

    fn stats() -> BnbSolverStatistics<IntegerType> {
        BnbSolverStatistics::default()
    }

    #[test]
    fn test_optimal_outcome() {
        let outcome = BnbSolverOutcome::optimal(tour(8), stats());
        assert!(outcome.result().is_optimal());
        assert_eq!(outcome.termination_reason(), &TerminationReason::OptimalityProven);
        assert_eq!(outcome.result().tour().unwrap().cost(), 8);
        assert_eq!(format!("{}", outcome.result()), "Optimal(cost=8)");
        assert_eq!(outcome.into_result().unwrap_optimal().cost(), 8);
    }

    #[test]
    fn test_aborted_with_and_without_tour() {
        let outcome = BnbSolverOutcome::aborted(Some(tour(9)), "node limit", stats());
        assert!(outcome.result().is_feasible());
        assert_eq!(
            format!("{}", outcome.termination_reason()),
            "Aborted: node limit"
        );

        let outcome = BnbSolverOutcome::<IntegerType>::aborted(None, "interrupted", stats());
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert!(outcome.into_result().into_tour().is_none());
    }

    #[test]
    fn test_exhausted_without_tour_is_unknown() {
        let outcome = BnbSolverOutcome::<IntegerType>::exhausted_without_tour(stats());
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::Aborted(_)
        ));
    }

    #[test]
    #[should_panic(expected = "called `SolverResult::unwrap_optimal()` on a `Feasible` value")]
    fn test_unwrap_optimal_panics_on_feasible() {
        let _ = SolverResult::Feasible(tour(3)).unwrap_optimal();
    }

    #[test]
    fn test_outcome_display() {
        let outcome = BnbSolverOutcome::optimal(tour(8), stats());
        let out = format!("{}", outcome);
        assert!(out.starts_with("Result:      Optimal(cost=8)\nTermination: Optimality Proven\n"));
        assert!(out.contains("Tourbound-BnB Solver Statistics:"));
    }
}
