//! Eco-TSP Solver - Command Line Interface
//!
//! Plans the visiting order of a venue season under geographic, eco or
//! economic transport costs.

use clap::{Parser, Subcommand, ValueEnum};

use eco_tsp_solver::benchmark::{Benchmark, BenchmarkCase, BenchmarkConfig};
use eco_tsp_solver::circuit::{builtin_circuits, Circuit};
use eco_tsp_solver::error::Result;
use eco_tsp_solver::evaluation::RouteEvaluator;
use eco_tsp_solver::heuristics::construction::{
    CheapestInsertion, ConstructionHeuristic, NearestNeighbour,
};
use eco_tsp_solver::matrix::LabeledMatrix;
use eco_tsp_solver::report;
use eco_tsp_solver::route::Route;
use eco_tsp_solver::selection::{format_label_listing, parse_selection};
use eco_tsp_solver::transport::{
    EcoModel, EconomicModel, EconomicParams, ModeFactors, TransportModel,
};
use eco_tsp_solver::visualization::MapRenderer;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eco-tsp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "A multi-modal eco-logistics TSP solver for venue seasons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the circuit number mapping used for selections
    List {
        /// Distance matrix CSV; defaults to the built-in circuit set
        #[arg(short, long)]
        matrix: Option<PathBuf>,
    },

    /// Solve a tour over a circuit selection
    Solve {
        /// Distance matrix CSV; defaults to the built-in circuit set
        #[arg(short, long)]
        matrix: Option<PathBuf>,

        /// Circuit selection: 'all', numbers (1 3 7 / 1,3,7) or names
        #[arg(short, long, default_value = "all")]
        circuits: String,

        /// Construction heuristic
        #[arg(short = 'H', long, value_enum, default_value = "nn")]
        heuristic: Heuristic,

        /// Cost model the heuristic optimizes against
        #[arg(short = 'M', long, value_enum, default_value = "eco")]
        model: ModelKind,

        /// Build an open path instead of a roundtrip
        #[arg(long)]
        open: bool,

        /// Truck factor (baseline), eco model
        #[arg(long, default_value = "1.0")]
        truck_factor: f64,

        /// Ship factor (lower = greener), eco model
        #[arg(long, default_value = "0.6")]
        ship_factor: f64,

        /// Plane factor (higher = worse), eco model
        #[arg(long, default_value = "3.0")]
        plane_factor: f64,

        /// Maximum distance (km) for truck transport, eco model
        #[arg(long, default_value = "1500")]
        max_truck_distance: f64,

        /// Weight for time/distance, economic model
        #[arg(long, default_value = "0.5")]
        w_time: f64,

        /// Weight for budget/cost, economic model
        #[arg(long, default_value = "0.5")]
        w_cost: f64,

        /// Cost normalizer balancing euros and kilometers, economic model
        #[arg(long, default_value = "500")]
        normalizer: f64,

        /// Plane time factor (0.15 = 85% faster than road), economic model
        #[arg(long, default_value = "0.15")]
        plane_speed: f64,

        /// Plane fixed cost, economic model
        #[arg(long, default_value = "250000")]
        plane_fixed: f64,

        /// Plane variable cost per km, economic model
        #[arg(long, default_value = "80")]
        plane_var: f64,

        /// Truck fixed cost, economic model
        #[arg(long, default_value = "2000")]
        truck_fixed: f64,

        /// Truck variable cost per km, economic model
        #[arg(long, default_value = "3")]
        truck_var: f64,

        /// Random seed for the randomized heuristic
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write route and evaluation as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write an SVG map of the route
        #[arg(long)]
        visualize: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Evaluate the season in the order the matrix lists it
    Season {
        /// Distance matrix CSV; defaults to the built-in circuit set
        #[arg(short, long)]
        matrix: Option<PathBuf>,

        /// Add the return leg to the first circuit
        #[arg(long)]
        roundtrip: bool,
    },

    /// Run both heuristics across all cost models on one selection
    Compare {
        /// Distance matrix CSV; defaults to the built-in circuit set
        #[arg(short, long)]
        matrix: Option<PathBuf>,

        /// Circuit selection: 'all', numbers (1 3 7 / 1,3,7) or names
        #[arg(short, long, default_value = "all")]
        circuits: String,

        /// Build open paths instead of roundtrips
        #[arg(long)]
        open: bool,
    },

    /// Repeated benchmark runs with aggregated statistics
    Benchmark {
        /// Distance matrix CSV; defaults to the built-in circuit set
        #[arg(short, long)]
        matrix: Option<PathBuf>,

        /// Circuit selection: 'all', numbers (1 3 7 / 1,3,7) or names
        #[arg(short, long, default_value = "all")]
        circuits: String,

        /// Number of runs for the randomized variant
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Output directory for CSV/JSON results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Disable parallel execution
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Heuristic {
    /// Nearest Neighbour
    Nn,
    /// Nearest Neighbour, randomized top-3 candidate pick
    NnRandom,
    /// Cheapest Insertion
    Insertion,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum ModelKind {
    /// Raw geographic distance
    Geographic,
    /// Three-mode eco model (truck/ship/plane, linear factors)
    Eco,
    /// Two-mode economic model (weighted time/cost scores)
    Economic,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::List { matrix } => run_list(matrix),
        Commands::Solve {
            matrix,
            circuits,
            heuristic,
            model,
            open,
            truck_factor,
            ship_factor,
            plane_factor,
            max_truck_distance,
            w_time,
            w_cost,
            normalizer,
            plane_speed,
            plane_fixed,
            plane_var,
            truck_fixed,
            truck_var,
            seed,
            output,
            visualize,
            verbose,
        } => run_solve(SolveArgs {
            matrix,
            circuits,
            heuristic,
            model,
            open,
            factors: ModeFactors {
                truck: truck_factor,
                ship: ship_factor,
                plane: plane_factor,
            },
            max_truck_distance,
            params: EconomicParams {
                w_time,
                w_cost,
                normalizer,
                plane_speed,
                plane_fixed,
                plane_var,
                truck_fixed,
                truck_var,
            },
            seed,
            output,
            visualize,
            verbose,
        }),
        Commands::Season { matrix, roundtrip } => run_season(matrix, roundtrip),
        Commands::Compare {
            matrix,
            circuits,
            open,
        } => run_compare(matrix, circuits, open),
        Commands::Benchmark {
            matrix,
            circuits,
            runs,
            output,
            sequential,
        } => run_benchmark(matrix, circuits, runs, output, sequential),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct SolveArgs {
    matrix: Option<PathBuf>,
    circuits: String,
    heuristic: Heuristic,
    model: ModelKind,
    open: bool,
    factors: ModeFactors,
    max_truck_distance: f64,
    params: EconomicParams,
    seed: u64,
    output: Option<PathBuf>,
    visualize: Option<PathBuf>,
    verbose: bool,
}

/// Load the distance matrix and the circuit metadata backing it.
fn load_matrix(path: Option<&PathBuf>) -> Result<(LabeledMatrix, Vec<Circuit>)> {
    let circuits = builtin_circuits();
    let matrix = match path {
        Some(path) => {
            log::info!("loading distance matrix from {:?}", path);
            LabeledMatrix::from_csv_file(path)?
        }
        None => {
            log::info!("deriving distance matrix from built-in circuit coordinates");
            LabeledMatrix::from_circuits(&circuits)?
        }
    };
    Ok((matrix, circuits))
}

/// Economic regions come from the matrix file when tagged, else from the
/// built-in continents.
fn economic_model(
    matrix: &LabeledMatrix,
    circuits: &[Circuit],
    params: EconomicParams,
) -> EconomicModel {
    if matrix.regions().is_empty() {
        EconomicModel::from_circuits(circuits, params)
    } else {
        EconomicModel::new(matrix.regions().clone(), params)
    }
}

fn run_list(matrix: Option<PathBuf>) -> Result<()> {
    let (matrix, _) = load_matrix(matrix.as_ref())?;
    print!("{}", format_label_listing(matrix.labels()));
    Ok(())
}

fn run_solve(args: SolveArgs) -> Result<()> {
    let (distances, circuits) = load_matrix(args.matrix.as_ref())?;
    let nodes = parse_selection(&args.circuits, distances.labels())?;
    let sub = distances.submatrix(&nodes)?;
    let roundtrip = !args.open;

    let model: Option<Box<dyn TransportModel + Sync>> = match args.model {
        ModelKind::Geographic => None,
        ModelKind::Eco => Some(Box::new(EcoModel::new(
            &circuits,
            args.max_truck_distance,
            args.factors,
        ))),
        ModelKind::Economic => Some(Box::new(economic_model(&distances, &circuits, args.params))),
    };

    let objective = match &model {
        Some(model) => model.objective_matrix(&sub)?,
        None => sub.clone(),
    };

    let heuristic: Box<dyn ConstructionHeuristic> = match args.heuristic {
        Heuristic::Nn => Box::new(NearestNeighbour::new()),
        Heuristic::NnRandom => Box::new(NearestNeighbour::randomized(args.seed)),
        Heuristic::Insertion => Box::new(CheapestInsertion::new()),
    };

    log::info!(
        "solving {} circuits with {} over the {:?} objective",
        nodes.len(),
        heuristic.name(),
        args.model
    );
    let route = heuristic.construct(&objective, &nodes, roundtrip)?;

    let evaluation = match model.as_deref() {
        Some(model) => RouteEvaluator::with_model(&sub, model).evaluate(&route)?,
        None => RouteEvaluator::new(&sub).evaluate(&route)?,
    };

    println!(
        "{}",
        report::banner(&format!("LOGISTICS REPORT ({})", heuristic.name()))
    );
    match args.model {
        ModelKind::Eco => print!(
            "{}",
            report::eco_parameters_block(args.factors, args.max_truck_distance)
        ),
        ModelKind::Economic => print!("{}", report::economic_parameters_block(&args.params)),
        ModelKind::Geographic => {}
    }
    println!("\nSelected circuits:\n{}", nodes.join(", "));
    println!("\nRoute:\n{}", report::route_line(&route));
    println!();
    print!("{}", report::leg_details(&evaluation));
    println!();
    print!("{}", report::results_block(&evaluation));
    if !evaluation.mode_summary.is_empty() {
        println!();
        print!("{}", report::mode_summary_table(&evaluation));
    }
    if args.verbose {
        println!();
        print!("{}", route);
    }

    if let Some(path) = &args.output {
        let payload = serde_json::json!({
            "route": &route,
            "evaluation": &evaluation,
        });
        std::fs::write(path, serde_json::to_string_pretty(&payload).expect("serializable output"))?;
        println!("\nSolution written to {:?}", path);
    }

    if let Some(path) = &args.visualize {
        let renderer = MapRenderer::new();
        let svg = renderer.render_route(
            &circuits,
            &evaluation.legs,
            &format!(
                "{} | {:.0} km | cost {:.0}",
                heuristic.name(),
                evaluation.total_distance,
                evaluation.total_cost
            ),
        )?;
        renderer.save_svg(&svg, path)?;
        println!("Map written to {:?}", path);
    }

    Ok(())
}

fn run_season(matrix: Option<PathBuf>, roundtrip: bool) -> Result<()> {
    let (distances, _) = load_matrix(matrix.as_ref())?;

    let mut order = distances.labels().to_vec();
    if roundtrip {
        if let Some(first) = order.first().cloned() {
            order.push(first);
        }
    }
    let route = Route::from_tour(&distances, order, roundtrip, "SeasonOrder")?;
    let evaluation = RouteEvaluator::new(&distances).evaluate(&route)?;

    println!("{}", report::banner("SEASON BASELINE (matrix row order)"));
    println!("Route:\n{}", report::route_line(&route));
    println!();
    print!("{}", report::leg_details(&evaluation));
    println!();
    print!("{}", report::results_block(&evaluation));
    Ok(())
}

fn run_compare(matrix: Option<PathBuf>, circuits: String, open: bool) -> Result<()> {
    let (distances, circuit_meta) = load_matrix(matrix.as_ref())?;
    let nodes = parse_selection(&circuits, distances.labels())?;
    let sub = distances.submatrix(&nodes)?;
    let roundtrip = !open;

    let eco = EcoModel::new(
        &circuit_meta,
        eco_tsp_solver::transport::eco::DEFAULT_MAX_TRUCK_DISTANCE_KM,
        ModeFactors::default(),
    );
    let economic = economic_model(&distances, &circuit_meta, EconomicParams::default());

    let variants: Vec<(&str, Option<&(dyn TransportModel + Sync)>)> = vec![
        ("geographic", None),
        ("eco", Some(&eco)),
        ("economic", Some(&economic)),
    ];

    println!(
        "{:<22} {:<12} {:>14} {:>12} {:>14}",
        "Algorithm", "Model", "Objective", "Distance", "Weighted cost"
    );
    println!("{}", "-".repeat(78));

    for (label, model) in &variants {
        let objective = match model {
            Some(model) => model.objective_matrix(&sub)?,
            None => sub.clone(),
        };
        for heuristic in [
            &NearestNeighbour::new() as &dyn ConstructionHeuristic,
            &CheapestInsertion::new(),
        ] {
            let route = heuristic.construct(&objective, &nodes, roundtrip)?;
            let evaluation = match model {
                Some(model) => RouteEvaluator::with_model(&sub, *model).evaluate(&route)?,
                None => RouteEvaluator::new(&sub).evaluate(&route)?,
            };
            println!(
                "{:<22} {:<12} {:>14.2} {:>12.1} {:>14.2}",
                heuristic.name(),
                label,
                route.objective,
                evaluation.total_distance,
                evaluation.total_cost
            );
        }
    }

    Ok(())
}

fn run_benchmark(
    matrix: Option<PathBuf>,
    circuits: String,
    runs: usize,
    output: PathBuf,
    sequential: bool,
) -> Result<()> {
    let (distances, circuit_meta) = load_matrix(matrix.as_ref())?;
    let nodes = parse_selection(&circuits, distances.labels())?;
    let sub = distances.submatrix(&nodes)?;

    let eco = EcoModel::new(
        &circuit_meta,
        eco_tsp_solver::transport::eco::DEFAULT_MAX_TRUCK_DISTANCE_KM,
        ModeFactors::default(),
    );
    let economic = economic_model(&distances, &circuit_meta, EconomicParams::default());

    let cases = vec![
        BenchmarkCase {
            model: "geographic".to_string(),
            objective: sub.clone(),
            transport: None,
        },
        BenchmarkCase {
            model: "eco".to_string(),
            objective: eco.objective_matrix(&sub)?,
            transport: Some(&eco),
        },
        BenchmarkCase {
            model: "economic".to_string(),
            objective: economic.objective_matrix(&sub)?,
            transport: Some(&economic),
        },
    ];

    let mut benchmark = Benchmark::new(BenchmarkConfig {
        num_runs: runs,
        parallel: !sequential,
        show_progress: true,
    });
    log::info!("benchmarking {} circuits, {} runs", nodes.len(), runs);
    benchmark.run(&sub, &nodes, &cases, true);

    print!("{}", benchmark.generate_report());

    std::fs::create_dir_all(&output)?;
    benchmark.export_to_csv(output.join("runs.csv"))?;
    benchmark.export_statistics_csv(output.join("statistics.csv"))?;
    benchmark.export_to_json(output.join("runs.json"))?;
    println!("\nResults exported to {:?}", output);

    Ok(())
}
