//! Three-mode eco-logistics model.
//!
//! Costs scale linearly with distance through a per-mode factor. Eligibility
//! follows simplified logistical rules: trucks stay on one continent and
//! below a distance cap, ships connect coastal circuits on different
//! continents, planes always fly.

use std::collections::HashMap;

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::transport::{ensure_distance, EdgeEval, Mode, TransportModel};

/// Maximum distance (km) a truck leg may cover.
pub const DEFAULT_MAX_TRUCK_DISTANCE_KM: f64 = 1500.0;

/// Relative cost / emission factors per mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeFactors {
    pub truck: f64,
    pub ship: f64,
    pub plane: f64,
}

impl Default for ModeFactors {
    fn default() -> Self {
        ModeFactors {
            truck: 1.0,
            ship: 0.6,
            plane: 3.0,
        }
    }
}

impl ModeFactors {
    pub fn factor(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Truck => self.truck,
            Mode::Ship => self.ship,
            Mode::Plane => self.plane,
        }
    }
}

#[derive(Debug, Clone)]
struct EcoMeta {
    continent: String,
    coastal: bool,
}

/// The eco-logistics transport model.
#[derive(Debug, Clone)]
pub struct EcoModel {
    meta: HashMap<String, EcoMeta>,
    max_truck_distance: f64,
    factors: ModeFactors,
}

impl EcoModel {
    pub fn new(circuits: &[Circuit], max_truck_distance: f64, factors: ModeFactors) -> Self {
        let meta = circuits
            .iter()
            .map(|c| {
                (
                    c.name.clone(),
                    EcoMeta {
                        continent: c.continent.clone(),
                        coastal: c.coastal,
                    },
                )
            })
            .collect();
        EcoModel {
            meta,
            max_truck_distance,
            factors,
        }
    }

    /// Model over the built-in circuit set with default factors.
    pub fn with_builtin_circuits() -> Self {
        Self::new(
            &crate::circuit::builtin_circuits(),
            DEFAULT_MAX_TRUCK_DISTANCE_KM,
            ModeFactors::default(),
        )
    }

    pub fn factors(&self) -> ModeFactors {
        self.factors
    }

    pub fn max_truck_distance(&self) -> f64 {
        self.max_truck_distance
    }

    fn meta(&self, label: &str) -> Result<&EcoMeta> {
        self.meta
            .get(label)
            .ok_or_else(|| Error::UnknownLabel(label.to_string()))
    }
}

impl TransportModel for EcoModel {
    fn name(&self) -> &str {
        "eco"
    }

    fn eligible_modes(&self, a: &str, b: &str, distance: f64) -> Result<Vec<Mode>> {
        ensure_distance(a, b, distance)?;
        let ma = self.meta(a)?;
        let mb = self.meta(b)?;

        let mut modes = Vec::with_capacity(3);

        // Truck: same continent + short distance
        if ma.continent == mb.continent && distance <= self.max_truck_distance {
            modes.push(Mode::Truck);
        }

        // Ship: different continents + both coastal
        if ma.continent != mb.continent && ma.coastal && mb.coastal {
            modes.push(Mode::Ship);
        }

        // Plane is always allowed
        modes.push(Mode::Plane);

        Ok(modes)
    }

    fn edge(&self, a: &str, b: &str, distance: f64) -> Result<EdgeEval> {
        let modes = self.eligible_modes(a, b, distance)?;

        // First mode reaching the minimum in canonical order wins
        let mut best_mode = modes[0];
        let mut best_cost = distance * self.factors.factor(best_mode);
        for &mode in &modes[1..] {
            let cost = distance * self.factors.factor(mode);
            if cost < best_cost {
                best_cost = cost;
                best_mode = mode;
            }
        }

        Ok(EdgeEval {
            cost: best_cost,
            score: best_cost,
            mode: best_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_circuits() -> Vec<Circuit> {
        vec![
            Circuit::new("Monza", "Europe", false, 45.6156, 9.2811),
            Circuit::new("Monaco", "Europe", true, 43.7347, 7.4206),
            Circuit::new("Zandvoort", "Europe", true, 52.3889, 4.5409),
            Circuit::new("Shanghai", "Asia", true, 31.3389, 121.2197),
            Circuit::new("Suzuka", "Asia", false, 34.8431, 136.5419),
        ]
    }

    fn model() -> EcoModel {
        EcoModel::new(&test_circuits(), DEFAULT_MAX_TRUCK_DISTANCE_KM, ModeFactors::default())
    }

    #[test]
    fn test_same_continent_short_leg_allows_truck() {
        let modes = model().eligible_modes("Monaco", "Zandvoort", 1400.0).unwrap();
        assert_eq!(modes, vec![Mode::Truck, Mode::Plane]);
    }

    #[test]
    fn test_same_continent_long_leg_drops_truck() {
        let modes = model().eligible_modes("Monaco", "Zandvoort", 1501.0).unwrap();
        assert_eq!(modes, vec![Mode::Plane]);
    }

    #[test]
    fn test_intercontinental_coastal_pair_allows_ship() {
        let modes = model().eligible_modes("Monaco", "Shanghai", 9300.0).unwrap();
        assert_eq!(modes, vec![Mode::Ship, Mode::Plane]);
    }

    #[test]
    fn test_intercontinental_inland_endpoint_forces_plane() {
        let modes = model().eligible_modes("Monza", "Suzuka", 9700.0).unwrap();
        assert_eq!(modes, vec![Mode::Plane]);
    }

    #[test]
    fn test_truck_selected_when_cheaper() {
        let eval = model().edge("Monaco", "Zandvoort", 1400.0).unwrap();
        assert_eq!(eval.mode, Mode::Truck);
        assert!((eval.cost - 1400.0).abs() < 1e-9);
    }

    #[test]
    fn test_ship_beats_plane_across_continents() {
        let eval = model().edge("Monaco", "Shanghai", 9300.0).unwrap();
        assert_eq!(eval.mode, Mode::Ship);
        assert!((eval.cost - 9300.0 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_cost_tie_prefers_canonical_order() {
        // Equal truck and plane factors: truck comes first in canonical order
        let m = EcoModel::new(
            &test_circuits(),
            DEFAULT_MAX_TRUCK_DISTANCE_KM,
            ModeFactors { truck: 1.0, ship: 0.6, plane: 1.0 },
        );
        let eval = m.edge("Monaco", "Zandvoort", 1000.0).unwrap();
        assert_eq!(eval.mode, Mode::Truck);
    }

    #[test]
    fn test_unknown_label_is_fatal() {
        assert!(model().edge("Monaco", "Atlantis", 100.0).is_err());
    }

    #[test]
    fn test_negative_distance_is_fatal() {
        assert!(model().edge("Monaco", "Zandvoort", -1.0).is_err());
    }

    #[test]
    fn test_cost_matrix_zero_diagonal_and_mode_bound() {
        use crate::matrix::LabeledMatrix;
        use crate::transport::TransportModel;

        let labels: Vec<String> = vec!["Monaco".into(), "Zandvoort".into(), "Shanghai".into()];
        let values = vec![
            vec![0.0, 1200.0, 9300.0],
            vec![1200.0, 0.0, 8900.0],
            vec![9300.0, 8900.0, 0.0],
        ];
        let d = LabeledMatrix::new(labels.clone(), values).unwrap();
        let m = model();
        let costs = m.cost_matrix(&d).unwrap();

        for a in &labels {
            assert_eq!(costs.get(a, a).unwrap(), 0.0);
            for b in &labels {
                if a == b {
                    continue;
                }
                let raw = d.get(a, b).unwrap();
                let cheapest = m
                    .eligible_modes(a, b, raw)
                    .unwrap()
                    .into_iter()
                    .map(|mode| raw * m.factors().factor(mode))
                    .fold(f64::INFINITY, f64::min);
                assert!(costs.get(a, b).unwrap() <= cheapest + 1e-9);
            }
        }
    }

    #[test]
    fn test_plane_factor_monotonicity() {
        // Raising the plane factor never lowers any edge cost and never makes
        // plane newly optimal
        let base = model();
        let raised = EcoModel::new(
            &test_circuits(),
            DEFAULT_MAX_TRUCK_DISTANCE_KM,
            ModeFactors { truck: 1.0, ship: 0.6, plane: 4.0 },
        );

        let pairs = [("Monaco", "Zandvoort", 1400.0), ("Monza", "Suzuka", 9700.0), ("Monaco", "Shanghai", 9300.0)];
        for (a, b, d) in pairs {
            let before = base.edge(a, b, d).unwrap();
            let after = raised.edge(a, b, d).unwrap();
            assert!(after.cost >= before.cost - 1e-9);
            if after.mode == Mode::Plane {
                assert_eq!(before.mode, Mode::Plane);
            }
        }
    }
}
