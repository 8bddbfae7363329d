//! Route evaluation.
//!
//! Recomputes, per consecutive leg of a finished route, the raw geographic
//! distance, the transport-weighted cost and the chosen mode, plus aggregate
//! totals and a per-mode usage table. Evaluation is a pure function of
//! `(route, distance matrix, model parameters)`; nothing is cached between
//! calls and inputs are never mutated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matrix::LabeledMatrix;
use crate::route::Route;
use crate::transport::{Mode, TransportModel};

/// One traveled leg with its derived metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub from: String,
    pub to: String,
    /// Raw geographic distance in km
    pub distance: f64,
    /// Transport-weighted cost (equals distance when no model is active)
    pub cost: f64,
    /// Chosen mode; absent for purely geographic runs
    pub mode: Option<Mode>,
}

/// Accumulated usage of one transport mode along a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeUsage {
    pub legs: usize,
    pub km: f64,
    pub cost: f64,
}

/// Full evaluation of a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEvaluation {
    pub legs: Vec<Leg>,
    /// Pure geographic distance in km
    pub total_distance: f64,
    /// Transport-weighted cost
    pub total_cost: f64,
    pub mode_summary: BTreeMap<Mode, ModeUsage>,
    /// `total_cost / total_distance`, 0 when the route covers no distance
    pub average_transport_factor: f64,
}

/// Evaluates finished routes against the raw distance matrix and an optional
/// transport model.
pub struct RouteEvaluator<'a> {
    distances: &'a LabeledMatrix,
    model: Option<&'a dyn TransportModel>,
}

impl<'a> RouteEvaluator<'a> {
    /// Geographic-only evaluator: cost equals distance, no mode table.
    pub fn new(distances: &'a LabeledMatrix) -> Self {
        RouteEvaluator {
            distances,
            model: None,
        }
    }

    pub fn with_model(distances: &'a LabeledMatrix, model: &'a dyn TransportModel) -> Self {
        RouteEvaluator {
            distances,
            model: Some(model),
        }
    }

    pub fn evaluate(&self, route: &Route) -> Result<RouteEvaluation> {
        let mut legs = Vec::with_capacity(route.num_legs());
        let mut total_distance = 0.0;
        let mut total_cost = 0.0;
        let mut mode_summary: BTreeMap<Mode, ModeUsage> = BTreeMap::new();

        for (from, to) in route.legs() {
            let distance = self.distances.get(from, to)?;
            let (cost, mode) = match self.model {
                Some(model) => {
                    let eval = model.edge(from, to, distance)?;
                    (eval.cost, Some(eval.mode))
                }
                None => (distance, None),
            };

            total_distance += distance;
            total_cost += cost;
            if let Some(mode) = mode {
                let usage = mode_summary.entry(mode).or_default();
                usage.legs += 1;
                usage.km += distance;
                usage.cost += cost;
            }

            legs.push(Leg {
                from: from.to_string(),
                to: to.to_string(),
                distance,
                cost,
                mode,
            });
        }

        let average_transport_factor = if total_distance > 0.0 {
            total_cost / total_distance
        } else {
            0.0
        };

        Ok(RouteEvaluation {
            legs,
            total_distance,
            total_cost,
            mode_summary,
            average_transport_factor,
        })
    }
}
