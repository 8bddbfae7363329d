//! Route representation.
//!
//! A route is an ordered sequence of circuit labels produced by a
//! construction heuristic. Closed routes repeat their start as the final
//! element; open routes do not. Routes are immutable once built and are
//! consumed by the evaluator, reporter and map renderer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::Result;
use crate::matrix::LabeledMatrix;

/// Sum of consecutive leg values, accumulated left-to-right over the tour.
pub fn path_total(costs: &LabeledMatrix, tour: &[String]) -> Result<f64> {
    let mut total = 0.0;
    for pair in tour.windows(2) {
        total += costs.get(&pair[0], &pair[1])?;
    }
    Ok(total)
}

/// A finished tour over a node set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Visiting order; for a closed route the start label repeats at the end
    pub tour: Vec<String>,
    /// Whether the route returns to its start
    pub closed: bool,
    /// Total of the objective the heuristic minimized
    pub objective: f64,
    /// Heuristic that generated this route
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
}

impl Route {
    /// Create a route from a tour, computing its objective total over `costs`.
    pub fn from_tour(
        costs: &LabeledMatrix,
        tour: Vec<String>,
        closed: bool,
        algorithm: &str,
    ) -> Result<Self> {
        let objective = path_total(costs, &tour)?;
        Ok(Route {
            tour,
            closed,
            objective,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
        })
    }

    /// Number of legs traveled.
    pub fn num_legs(&self) -> usize {
        self.tour.len().saturating_sub(1)
    }

    /// Consecutive `(from, to)` pairs.
    pub fn legs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tour
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// The distinct circuits visited, in visiting order (closing leg dropped).
    pub fn visited(&self) -> &[String] {
        if self.closed && self.tour.len() > 1 {
            &self.tour[..self.tour.len() - 1]
        } else {
            &self.tour
        }
    }

    /// Permutation invariant: every node appears exactly once, and a closed
    /// route additionally starts and ends on the same label.
    pub fn visits_each_once(&self, nodes: &[String]) -> bool {
        if self.closed {
            if self.tour.len() != nodes.len() + 1 {
                return false;
            }
            if self.tour.first() != self.tour.last() {
                return false;
            }
        } else if self.tour.len() != nodes.len() {
            return false;
        }

        let visited: HashSet<&String> = self.visited().iter().collect();
        visited.len() == nodes.len() && nodes.iter().all(|n| visited.contains(n))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Route ({})", self.algorithm)?;
        writeln!(f, "  Objective: {:.2}", self.objective)?;
        writeln!(f, "  Closed: {}", self.closed)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        writeln!(f, "  Order: {}", self.tour.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> LabeledMatrix {
        LabeledMatrix::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![
                vec![0.0, 1.0, 4.0],
                vec![1.0, 0.0, 2.0],
                vec![4.0, 2.0, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_path_total_left_to_right() {
        let m = matrix();
        let tour: Vec<String> = vec!["A".into(), "B".into(), "C".into(), "A".into()];
        assert_eq!(path_total(&m, &tour).unwrap(), 1.0 + 2.0 + 4.0);
    }

    #[test]
    fn test_closed_route_invariant() {
        let m = matrix();
        let nodes: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
        let route = Route::from_tour(
            &m,
            vec!["A".into(), "B".into(), "C".into(), "A".into()],
            true,
            "test",
        )
        .unwrap();
        assert!(route.visits_each_once(&nodes));
        assert_eq!(route.visited(), &nodes[..]);
    }

    #[test]
    fn test_open_route_invariant() {
        let m = matrix();
        let nodes: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
        let route =
            Route::from_tour(&m, vec!["B".into(), "A".into(), "C".into()], false, "test").unwrap();
        assert!(route.visits_each_once(&nodes));
    }

    #[test]
    fn test_duplicate_node_breaks_invariant() {
        let m = matrix();
        let nodes: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
        let route = Route::from_tour(
            &m,
            vec!["A".into(), "B".into(), "B".into()],
            false,
            "test",
        )
        .unwrap();
        assert!(!route.visits_each_once(&nodes));
    }
}
