//! Transport cost models.
//!
//! A [`TransportModel`] turns a raw geographic distance between two labeled
//! circuits into the set of eligible transport modes and the evaluation of
//! the best one. Two models exist: the three-mode eco model
//! ([`eco::EcoModel`]) and the two-mode economic model
//! ([`economic::EconomicModel`]). Both are pure functions of their
//! configuration, which is fixed at construction time.

pub mod eco;
pub mod economic;

pub use eco::{EcoModel, ModeFactors};
pub use economic::{EconomicModel, EconomicParams};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::LabeledMatrix;

/// A transport method. The derived ordering is the canonical evaluation
/// order (truck, ship, plane) used to break cost ties deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Mode {
    Truck,
    Ship,
    Plane,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Truck => "TRUCK",
            Mode::Ship => "SHIP",
            Mode::Plane => "PLANE",
        }
    }

    pub const ALL: [Mode; 3] = [Mode::Truck, Mode::Ship, Mode::Plane];
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Evaluation of one leg under a transport model.
///
/// `cost` is the mode's own cost (linear eco cost, or euros for the economic
/// model); `score` is the value the construction heuristics minimize. For
/// the eco model the two coincide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeEval {
    pub cost: f64,
    pub score: f64,
    pub mode: Mode,
}

/// Mode eligibility and cost evaluation for a pair of circuits.
///
/// Implementations are side-effect free: the same inputs always produce the
/// same outputs, so every evaluation is recomputable from
/// `(tour, distance matrix, model parameters)` alone.
pub trait TransportModel {
    fn name(&self) -> &str;

    /// Modes allowed between `a` and `b` at the given raw distance, in
    /// canonical order.
    fn eligible_modes(&self, a: &str, b: &str, distance: f64) -> Result<Vec<Mode>>;

    /// Best eligible mode for this leg. Ties are broken by canonical order.
    fn edge(&self, a: &str, b: &str, distance: f64) -> Result<EdgeEval>;

    /// Elementwise monetary/weighted cost transform of a distance matrix.
    /// The diagonal is forced to exactly 0 (self-loops never incur cost).
    fn cost_matrix(&self, distances: &LabeledMatrix) -> Result<LabeledMatrix> {
        distances.map_edges(|a, b, d| self.edge(a, b, d).map(|e| e.cost))
    }

    /// Elementwise transform into the objective the heuristics minimize.
    /// The diagonal is forced to exactly 0.
    fn objective_matrix(&self, distances: &LabeledMatrix) -> Result<LabeledMatrix> {
        distances.map_edges(|a, b, d| self.edge(a, b, d).map(|e| e.score))
    }
}

/// Distances below zero are a configuration error, never coerced.
pub(crate) fn ensure_distance(a: &str, b: &str, distance: f64) -> Result<()> {
    if distance < 0.0 {
        return Err(Error::NegativeDistance {
            from: a.to_string(),
            to: b.to_string(),
            distance,
        });
    }
    Ok(())
}
