//! Text reporting for solved routes.
//!
//! Builds the console blocks shown after a run: the route itself, distance
//! and cost totals, the per-mode summary table and the active model
//! parameters. Units and decimal places live here, not in the core types.

use std::fmt::Write;

use crate::evaluation::RouteEvaluation;
use crate::route::Route;
use crate::transport::economic::EconomicParams;
use crate::transport::eco::ModeFactors;

const RULE_WIDTH: usize = 60;

/// `====` banner with a centered-enough title, as the original reports print.
pub fn banner(title: &str) -> String {
    format!("{}\n{}\n{}", "=".repeat(RULE_WIDTH), title, "=".repeat(RULE_WIDTH))
}

/// The visiting order as a single arrow-joined line.
pub fn route_line(route: &Route) -> String {
    route.tour.join(" -> ")
}

/// Distance/cost totals and the average transport factor.
pub fn results_block(eval: &RouteEvaluation) -> String {
    let mut out = String::new();
    writeln!(out, "Results:").unwrap();
    writeln!(out, "Pure geographic distance: {:.1} km", eval.total_distance).unwrap();
    writeln!(out, "Transport-weighted cost:  {:.1}", eval.total_cost).unwrap();
    writeln!(
        out,
        "Average transport factor: {:.2}",
        eval.average_transport_factor
    )
    .unwrap();
    out
}

/// Per-leg mode listing (`A -> B (TRUCK)`).
pub fn leg_details(eval: &RouteEvaluation) -> String {
    let mut out = String::new();
    writeln!(out, "ROUTE DETAILS:").unwrap();
    for leg in &eval.legs {
        match leg.mode {
            Some(mode) => writeln!(out, "  {} -> {} ({})", leg.from, leg.to, mode).unwrap(),
            None => writeln!(out, "  {} -> {}: {:.0} km", leg.from, leg.to, leg.distance).unwrap(),
        }
    }
    out
}

/// Per-mode usage table.
pub fn mode_summary_table(eval: &RouteEvaluation) -> String {
    let mut out = String::new();
    writeln!(out, "TRANSPORT MODE SUMMARY").unwrap();
    writeln!(out, "{}", "-".repeat(40)).unwrap();
    for (mode, usage) in &eval.mode_summary {
        writeln!(
            out,
            "{:6}: {:2} legs, {:8.0} km, cost {:12.2}",
            mode.label(),
            usage.legs,
            usage.km,
            usage.cost
        )
        .unwrap();
    }
    out
}

/// The eco factors active for a run.
pub fn eco_parameters_block(factors: ModeFactors, max_truck_distance: f64) -> String {
    let mut out = String::new();
    writeln!(out, "ECO MODEL PARAMETERS (Active for this run):").unwrap();
    writeln!(out, "  Truck factor: {} (baseline)", factors.truck).unwrap();
    writeln!(out, "  Ship factor:  {} (lower = greener)", factors.ship).unwrap();
    writeln!(out, "  Plane factor: {} (higher = worse)", factors.plane).unwrap();
    writeln!(out, "  Max truck distance: {:.0} km", max_truck_distance).unwrap();
    out
}

/// The economic parameters active for a run.
pub fn economic_parameters_block(params: &EconomicParams) -> String {
    let mut out = String::new();
    writeln!(out, "SYSTEM PARAMETERS (Active for this run):").unwrap();
    writeln!(
        out,
        "  Optimization Priority: Time ({:.0}%) vs. Budget ({:.0}%)",
        params.w_time * 100.0,
        params.w_cost * 100.0
    )
    .unwrap();
    writeln!(
        out,
        "  Normalizer: {} (Balances Euros and Kilometers)",
        params.normalizer
    )
    .unwrap();
    writeln!(out, "  Truck: Baseline Speed (100% perceived distance)").unwrap();
    writeln!(
        out,
        "  Plane: High-Speed Mode ({:.0}% perceived distance)",
        params.plane_speed * 100.0
    )
    .unwrap();
    writeln!(out).unwrap();
    writeln!(out, "  Financials:").unwrap();
    writeln!(
        out,
        "  - Truck: EUR {} Fixed + EUR {}/km",
        params.truck_fixed, params.truck_var
    )
    .unwrap();
    writeln!(
        out,
        "  - Plane: EUR {} Fixed + EUR {}/km (subject to non-linear scaling)",
        params.plane_fixed, params.plane_var
    )
    .unwrap();
    out
}
