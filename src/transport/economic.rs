//! Two-mode economic model with a weighted time/cost objective.
//!
//! Truck costs are fixed + linear. Plane costs taper logarithmically with
//! distance but pick up a non-linear long-haul fuel penalty. The heuristics
//! minimize a scalarized score that blends perceived travel time with
//! normalized monetary cost; a hard region guard forces the plane whenever
//! two circuits sit in different regions.

use std::collections::HashMap;

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::transport::{ensure_distance, EdgeEval, Mode, TransportModel};

/// Trucks travel at baseline speed (100% perceived distance).
const TRUCK_SPEED_MULT: f64 = 1.0;

/// Scale of the logarithmic taper on plane variable cost.
const LOG_TAPER_SCALE: f64 = 500.0;

// Long-haul fuel penalty ("fuel paradox"): ultra-long flights carry the
// weight of their own fuel. Fixed by design, not runtime-tunable.
const FUEL_PENALTY_COEFF: f64 = 0.000_001;
const FUEL_PENALTY_EXPONENT: f64 = 2.5;

/// Immutable configuration for [`EconomicModel`]. Set once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomicParams {
    /// Weight on perceived travel time
    pub w_time: f64,
    /// Weight on normalized monetary cost
    pub w_cost: f64,
    /// Rescales euros into the same order of magnitude as kilometers
    pub normalizer: f64,
    /// Plane time factor (0.15 = 85% faster than road)
    pub plane_speed: f64,
    /// Plane fixed cost (base fees)
    pub plane_fixed: f64,
    /// Plane variable cost (rate per km, log-tapered)
    pub plane_var: f64,
    /// Truck fixed cost (base fees)
    pub truck_fixed: f64,
    /// Truck variable cost (rate per km)
    pub truck_var: f64,
}

impl Default for EconomicParams {
    fn default() -> Self {
        EconomicParams {
            w_time: 0.5,
            w_cost: 0.5,
            normalizer: 500.0,
            plane_speed: 0.15,
            plane_fixed: 250_000.0,
            plane_var: 80.0,
            truck_fixed: 2_000.0,
            truck_var: 3.0,
        }
    }
}

/// The economic transport model.
#[derive(Debug, Clone)]
pub struct EconomicModel {
    regions: HashMap<String, String>,
    params: EconomicParams,
}

impl EconomicModel {
    /// Build from an explicit label -> region map.
    pub fn new(regions: HashMap<String, String>, params: EconomicParams) -> Self {
        EconomicModel { regions, params }
    }

    /// Build from circuit metadata, using continents as regions.
    pub fn from_circuits(circuits: &[Circuit], params: EconomicParams) -> Self {
        let regions = circuits
            .iter()
            .map(|c| (c.name.clone(), c.continent.clone()))
            .collect();
        EconomicModel { regions, params }
    }

    pub fn params(&self) -> EconomicParams {
        self.params
    }

    fn region(&self, label: &str) -> Result<&str> {
        self.regions
            .get(label)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownLabel(label.to_string()))
    }

    fn truck_metrics(&self, distance: f64) -> (f64, f64) {
        let p = &self.params;
        let cost = p.truck_fixed + distance * p.truck_var;
        let score = p.w_time * distance * TRUCK_SPEED_MULT + p.w_cost * (cost / p.normalizer);
        (cost, score)
    }

    fn plane_metrics(&self, distance: f64) -> (f64, f64) {
        let p = &self.params;
        let log_taper = (distance + 1.0).ln() * LOG_TAPER_SCALE * p.plane_var;
        let fuel_penalty = FUEL_PENALTY_COEFF * distance.powf(FUEL_PENALTY_EXPONENT);
        let cost = p.plane_fixed + log_taper + fuel_penalty;
        let score = p.w_time * distance * p.plane_speed + p.w_cost * (cost / p.normalizer);
        (cost, score)
    }
}

impl TransportModel for EconomicModel {
    fn name(&self) -> &str {
        "economic"
    }

    fn eligible_modes(&self, a: &str, b: &str, distance: f64) -> Result<Vec<Mode>> {
        ensure_distance(a, b, distance)?;
        // Region guard: crossing regions always means flying
        if self.region(a)? != self.region(b)? {
            Ok(vec![Mode::Plane])
        } else {
            Ok(vec![Mode::Truck, Mode::Plane])
        }
    }

    fn edge(&self, a: &str, b: &str, distance: f64) -> Result<EdgeEval> {
        ensure_distance(a, b, distance)?;
        let (p_cost, p_score) = self.plane_metrics(distance);

        if self.region(a)? != self.region(b)? {
            return Ok(EdgeEval {
                cost: p_cost,
                score: p_score,
                mode: Mode::Plane,
            });
        }

        let (t_cost, t_score) = self.truck_metrics(distance);
        // Score ties favor the truck
        if t_score <= p_score {
            Ok(EdgeEval {
                cost: t_cost,
                score: t_score,
                mode: Mode::Truck,
            })
        } else {
            Ok(EdgeEval {
                cost: p_cost,
                score: p_score,
                mode: Mode::Plane,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> EconomicModel {
        let mut regions = HashMap::new();
        regions.insert("Monaco".to_string(), "Europe".to_string());
        regions.insert("Monza".to_string(), "Europe".to_string());
        regions.insert("Suzuka".to_string(), "Asia".to_string());
        EconomicModel::new(regions, EconomicParams::default())
    }

    #[test]
    fn test_truck_cost_formula() {
        let (cost, score) = model().truck_metrics(1000.0);
        assert!((cost - (2_000.0 + 1000.0 * 3.0)).abs() < 1e-9);
        assert!((score - (0.5 * 1000.0 + 0.5 * (5_000.0 / 500.0))).abs() < 1e-9);
    }

    #[test]
    fn test_plane_cost_formula_exact() {
        let d: f64 = 4000.0;
        let (cost, _) = model().plane_metrics(d);
        let expected =
            250_000.0 + (d + 1.0).ln() * 500.0 * 80.0 + 0.000_001 * d.powf(2.5);
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fuel_penalty_dominates_ultra_long_haul() {
        let (short, _) = model().plane_metrics(2_000.0);
        let (long, _) = model().plane_metrics(18_000.0);
        // The d^2.5 term makes the long leg far more than 9x the short one
        assert!(long > short * 9.0);
    }

    #[test]
    fn test_region_guard_forces_plane() {
        // Short hop across regions where the truck score would win
        let eval = model().edge("Monza", "Suzuka", 100.0).unwrap();
        assert_eq!(eval.mode, Mode::Plane);

        let modes = model().eligible_modes("Monza", "Suzuka", 100.0).unwrap();
        assert_eq!(modes, vec![Mode::Plane]);
    }

    #[test]
    fn test_same_region_short_leg_prefers_truck() {
        let eval = model().edge("Monaco", "Monza", 300.0).unwrap();
        assert_eq!(eval.mode, Mode::Truck);
    }

    #[test]
    fn test_score_tie_prefers_truck() {
        // With zero weights every score is 0 and the tie must go to the truck
        let params = EconomicParams {
            w_time: 0.0,
            w_cost: 0.0,
            ..EconomicParams::default()
        };
        let m = EconomicModel::new(
            [("A".to_string(), "R".to_string()), ("B".to_string(), "R".to_string())]
                .into_iter()
                .collect(),
            params,
        );
        let eval = m.edge("A", "B", 5_000.0).unwrap();
        assert_eq!(eval.mode, Mode::Truck);
    }

    #[test]
    fn test_unknown_region_is_fatal() {
        assert!(model().edge("Monaco", "Atlantis", 100.0).is_err());
    }

    #[test]
    fn test_objective_matrix_zero_diagonal() {
        use crate::matrix::LabeledMatrix;

        let d = LabeledMatrix::new(
            vec!["Monaco".into(), "Monza".into()],
            vec![vec![0.0, 300.0], vec![300.0, 0.0]],
        )
        .unwrap();
        let scores = model().objective_matrix(&d).unwrap();
        assert_eq!(scores.get("Monaco", "Monaco").unwrap(), 0.0);
        assert!(scores.get("Monaco", "Monza").unwrap() > 0.0);
    }
}
