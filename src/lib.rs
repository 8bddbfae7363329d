//! Eco-TSP Solver Library
//!
//! A multi-modal logistics TSP solver for planning the visiting order of a
//! venue season.
//!
//! # Features
//!
//! - Labeled distance matrices from CSV files or built-in circuit coordinates
//! - Construction heuristics (Nearest Neighbour, Cheapest Insertion)
//! - Transport cost models: three-mode eco model (truck/ship/plane) and
//!   two-mode economic model with a weighted time/cost objective
//! - Route evaluation with per-mode usage summaries
//! - Benchmarking, text reporting and SVG map rendering
//!
//! # Example
//!
//! ```no_run
//! use eco_tsp_solver::circuit::builtin_circuits;
//! use eco_tsp_solver::matrix::LabeledMatrix;
//! use eco_tsp_solver::transport::{EcoModel, TransportModel};
//! use eco_tsp_solver::heuristics::construction::{ConstructionHeuristic, NearestNeighbour};
//! use eco_tsp_solver::evaluation::RouteEvaluator;
//!
//! let circuits = builtin_circuits();
//! let distances = LabeledMatrix::from_circuits(&circuits).unwrap();
//! let model = EcoModel::with_builtin_circuits();
//!
//! // Heuristics minimize the eco-weighted objective, not raw distance
//! let objective = model.objective_matrix(&distances).unwrap();
//! let nodes = distances.labels().to_vec();
//! let route = NearestNeighbour::new().construct(&objective, &nodes, true).unwrap();
//!
//! let evaluation = RouteEvaluator::with_model(&distances, &model)
//!     .evaluate(&route)
//!     .unwrap();
//! println!("{:.1} km, weighted cost {:.1}", evaluation.total_distance, evaluation.total_cost);
//! ```

pub mod benchmark;
pub mod circuit;
pub mod error;
pub mod evaluation;
pub mod heuristics;
pub mod matrix;
pub mod report;
pub mod route;
pub mod selection;
pub mod transport;
pub mod visualization;

pub use error::{Error, Result};
pub use matrix::LabeledMatrix;
pub use route::Route;
