//! Benchmarking and experimentation.
//!
//! Runs the construction heuristics across cost-model variants, collects
//! per-run results and aggregates statistics for comparison. Runs are
//! independent and read-only over the matrices, so repeats can execute in
//! parallel; only the result collection is a combine step.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::Result;
use crate::evaluation::RouteEvaluator;
use crate::heuristics::construction::{
    CheapestInsertion, ConstructionHeuristic, NearestNeighbour,
};
use crate::matrix::LabeledMatrix;
use crate::transport::TransportModel;

/// One cost-model variant under benchmark.
pub struct BenchmarkCase<'a> {
    /// Variant label ("geographic", "eco", "economic")
    pub model: String,
    /// Matrix the heuristics minimize
    pub objective: LabeledMatrix,
    /// Model used to re-evaluate the finished route, if any
    pub transport: Option<&'a (dyn TransportModel + Sync)>,
}

/// Result of running a single heuristic once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Heuristic name
    pub algorithm: String,
    /// Cost-model variant
    pub model: String,
    /// Number of circuits
    pub dimension: usize,
    /// Whether the route closed back on its start
    pub roundtrip: bool,
    /// Objective total the heuristic minimized
    pub objective: f64,
    /// Pure geographic distance of the route
    pub distance_km: f64,
    /// Transport-weighted cost of the route
    pub weighted_cost: f64,
    /// Computation time in seconds
    pub time: f64,
}

/// Aggregated statistics for a (heuristic, model) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub model: String,
    pub num_runs: usize,
    pub avg_objective: f64,
    pub best_objective: f64,
    pub worst_objective: f64,
    pub std_objective: f64,
    pub avg_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of runs per heuristic (for the randomized variant)
    pub num_runs: usize,
    /// Run in parallel
    pub parallel: bool,
    /// Show a progress bar
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            parallel: true,
            show_progress: true,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

struct RunSpec<'a> {
    case: &'a BenchmarkCase<'a>,
    heuristic_seed: Option<u64>,
    insertion: bool,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run every heuristic on every case, `num_runs` times each for the
    /// randomized variant, once for the deterministic ones.
    pub fn run(
        &mut self,
        distances: &LabeledMatrix,
        nodes: &[String],
        cases: &[BenchmarkCase<'_>],
        roundtrip: bool,
    ) {
        let mut specs = Vec::new();
        for case in cases {
            specs.push(RunSpec {
                case,
                heuristic_seed: None,
                insertion: false,
            });
            specs.push(RunSpec {
                case,
                heuristic_seed: None,
                insertion: true,
            });
            for seed in 0..self.config.num_runs as u64 {
                specs.push(RunSpec {
                    case,
                    heuristic_seed: Some(seed),
                    insertion: false,
                });
            }
        }

        let bar = if self.config.show_progress {
            let bar = ProgressBar::new(specs.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                    .expect("static progress template"),
            );
            Some(bar)
        } else {
            None
        };

        let run_one = |spec: &RunSpec<'_>| -> Option<RunResult> {
            let heuristic: Box<dyn ConstructionHeuristic> = if spec.insertion {
                Box::new(CheapestInsertion::new())
            } else {
                match spec.heuristic_seed {
                    Some(seed) => Box::new(NearestNeighbour::randomized(seed)),
                    None => Box::new(NearestNeighbour::new()),
                }
            };

            let result = run_single(
                distances,
                &spec.case.objective,
                spec.case.transport,
                heuristic.as_ref(),
                nodes,
                roundtrip,
                &spec.case.model,
            );
            if let Some(bar) = &bar {
                bar.inc(1);
            }
            match result {
                Ok(result) => Some(result),
                Err(e) => {
                    log::error!("benchmark run failed: {}", e);
                    None
                }
            }
        };

        let mut new_results: Vec<RunResult> = if self.config.parallel {
            specs.par_iter().filter_map(run_one).collect()
        } else {
            specs.iter().filter_map(run_one).collect()
        };

        if let Some(bar) = &bar {
            bar.finish_and_clear();
        }
        self.results.append(&mut new_results);
    }

    /// Aggregate the collected results per (heuristic, model) pair.
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut groups: BTreeMap<(String, String), Vec<&RunResult>> = BTreeMap::new();
        for result in &self.results {
            groups
                .entry((result.algorithm.clone(), result.model.clone()))
                .or_default()
                .push(result);
        }

        groups
            .into_iter()
            .map(|((algorithm, model), runs)| {
                let objectives: Vec<f64> = runs.iter().map(|r| r.objective).collect();
                let times: Vec<f64> = runs.iter().map(|r| r.time).collect();
                let std_objective = if objectives.len() > 1 {
                    Statistics::std_dev(objectives.iter())
                } else {
                    0.0
                };
                AlgorithmStatistics {
                    algorithm,
                    model,
                    num_runs: runs.len(),
                    avg_objective: Statistics::mean(objectives.iter()),
                    best_objective: Statistics::min(objectives.iter()),
                    worst_objective: Statistics::max(objectives.iter()),
                    std_objective,
                    avg_time: Statistics::mean(times.iter()),
                }
            })
            .collect()
    }

    /// Export raw per-run results as CSV.
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        for result in &self.results {
            writer.serialize(result)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export aggregated statistics as CSV.
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        for stats in self.compute_statistics() {
            writer.serialize(stats)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export raw per-run results as JSON.
    pub fn export_to_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &self.results)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        Ok(())
    }

    /// Human-readable summary table.
    pub fn generate_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Benchmark report ({})\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!(
            "{:<28} {:<12} {:>5} {:>12} {:>12} {:>12} {:>10}\n",
            "Algorithm", "Model", "Runs", "Best", "Average", "Worst", "Std"
        ));
        out.push_str(&"-".repeat(95));
        out.push('\n');
        for stats in self.compute_statistics() {
            out.push_str(&format!(
                "{:<28} {:<12} {:>5} {:>12.2} {:>12.2} {:>12.2} {:>10.2}\n",
                stats.algorithm,
                stats.model,
                stats.num_runs,
                stats.best_objective,
                stats.avg_objective,
                stats.worst_objective,
                stats.std_objective,
            ));
        }
        out
    }

    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

fn run_single(
    distances: &LabeledMatrix,
    objective: &LabeledMatrix,
    transport: Option<&(dyn TransportModel + Sync)>,
    heuristic: &dyn ConstructionHeuristic,
    nodes: &[String],
    roundtrip: bool,
    model: &str,
) -> Result<RunResult> {
    let route = heuristic.construct(objective, nodes, roundtrip)?;
    let evaluation = match transport {
        Some(t) => RouteEvaluator::with_model(distances, t).evaluate(&route)?,
        None => RouteEvaluator::new(distances).evaluate(&route)?,
    };

    Ok(RunResult {
        algorithm: route.algorithm.clone(),
        model: model.to_string(),
        dimension: nodes.len(),
        roundtrip,
        objective: route.objective,
        distance_km: evaluation.total_distance,
        weighted_cost: evaluation.total_cost,
        time: route.computation_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{EcoModel, ModeFactors};

    #[test]
    fn test_benchmark_config_defaults() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 5);
        assert!(config.parallel);
    }

    #[test]
    fn test_benchmark_collects_results_and_statistics() {
        let circuits = crate::circuit::builtin_circuits();
        let distances = LabeledMatrix::from_circuits(&circuits).unwrap();
        let nodes: Vec<String> = distances.labels()[..6].to_vec();

        let eco = EcoModel::new(&circuits, 1500.0, ModeFactors::default());
        let cases = vec![
            BenchmarkCase {
                model: "geographic".to_string(),
                objective: distances.clone(),
                transport: None,
            },
            BenchmarkCase {
                model: "eco".to_string(),
                objective: eco.objective_matrix(&distances).unwrap(),
                transport: Some(&eco),
            },
        ];

        let mut benchmark = Benchmark::new(BenchmarkConfig {
            num_runs: 2,
            parallel: false,
            show_progress: false,
        });
        benchmark.run(&distances, &nodes, &cases, true);

        // 2 cases x (NN + insertion + 2 randomized runs)
        assert_eq!(benchmark.results().len(), 8);

        let stats = benchmark.compute_statistics();
        assert!(!stats.is_empty());
        for s in &stats {
            assert!(s.best_objective <= s.avg_objective + 1e-9);
            assert!(s.avg_objective <= s.worst_objective + 1e-9);
        }
    }
}
