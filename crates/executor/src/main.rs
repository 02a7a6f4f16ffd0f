pub mod config;
pub mod error;
pub mod loader;
pub mod simulator;
pub mod sweep;
pub mod types;
pub mod writer;

use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, DEFAULT_CONFIG_PATH};
use error::Error;
use loader::{GraphLoader, TextGraphLoader};
use negcycle_core::bellman_ford::StopReason;
use negcycle_core::cycle::shortest_directed_cycle;
use negcycle_core::hole::shortest_hole;
use negcycle_core::matching::{gale_shapley, has_unique_stable_matching, is_stable};
use negcycle_core::paths::count_paths;
use negcycle_core::traits::BellmanFordSolver;
use negcycle_core::{GraphCSR, detect_negative_cycle, relax, weigh_cycle};
use simulator::RedemptionSimulator;
use sweep::CycleSweep;
use writer::{FileResultWriter, ResultWriter};

#[derive(Parser, Debug)]
#[command(name = "negcycle", about = "Shortest paths, negative cycles and friends")]
struct Cli {
    /// TOML configuration file; without it the built-in file is used if present.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide whether the graph has a negative cycle and print one.
    NegCycle {
        #[arg(long, value_name = "FILE")]
        graph: PathBuf,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Distances and parents from a source, as CSV.
    ShortestPaths {
        #[arg(long, value_name = "FILE")]
        graph: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Mean weight of the walks with a fixed number of edges from source to target.
    AverageWeight {
        #[arg(long, value_name = "FILE")]
        graph: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        target: usize,
        /// Walk length; defaults to `paths.default_length`.
        #[arg(long)]
        length: Option<usize>,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Shortest cycle through the source in an undirected graph.
    ShortestHole {
        #[arg(long, value_name = "FILE")]
        graph: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Cheapest directed cycle of a graph with non-negative weights.
    ShortestCycle {
        #[arg(long, value_name = "FILE")]
        graph: PathBuf,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Proposer-optimal stable matching.
    Match {
        #[command(flatten)]
        prefs: PrefArgs,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Print 1 if the matching is stable, 0 otherwise.
    CheckStable {
        #[command(flatten)]
        prefs: PrefArgs,
        #[arg(long, value_name = "FILE")]
        matching: PathBuf,
    },

    /// Print 1 if exactly one stable matching exists, 0 otherwise.
    CheckUnique {
        #[command(flatten)]
        prefs: PrefArgs,
    },

    /// Monte-Carlo redemption estimate.
    Simulate {
        #[arg(long)]
        trials: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Negative-cycle search from many sources in parallel, as CSV.
    Sweep {
        #[arg(long, value_name = "FILE")]
        graph: PathBuf,
        /// Sources to search from; every vertex when omitted.
        #[arg(long, value_delimiter = ',')]
        sources: Vec<usize>,
        /// Output file; stdout when omitted.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Source vertex id.
    #[arg(long)]
    source: Option<usize>,
    /// File holding the source vertex id on its first line.
    #[arg(long, value_name = "FILE")]
    source_file: Option<PathBuf>,
}

impl SourceArgs {
    fn resolve(&self) -> Result<usize, Error> {
        match (&self.source, &self.source_file) {
            (Some(source), _) => Ok(*source),
            (None, Some(path)) => loader::read_source(path),
            (None, None) => Err(Error::ConfigLoadError(
                "one of --source or --source-file is required".into(),
            )),
        }
    }
}

#[derive(Args, Debug)]
struct PrefArgs {
    /// Proposer preference lists.
    #[arg(long, value_name = "FILE")]
    proposers: PathBuf,
    /// Receiver preference lists.
    #[arg(long, value_name = "FILE")]
    receivers: PathBuf,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = match &cli.config {
        Some(path) => config::load_config(path, true)?,
        None => config::load_config(Path::new(DEFAULT_CONFIG_PATH), false)?,
    };

    match cli.command {
        Command::NegCycle { graph, output } => run_neg_cycle(&load_graph(&graph)?, output),
        Command::ShortestPaths {
            graph,
            source,
            output,
        } => run_shortest_paths(&load_graph(&graph)?, source.resolve()?, output),
        Command::AverageWeight {
            graph,
            source,
            target,
            length,
            output,
        } => {
            let graph = load_graph(&graph)?;
            let length = length.unwrap_or(config.paths.default_length);
            run_average_weight(&graph, source.resolve()?, target, length, output)
        }
        Command::ShortestHole {
            graph,
            source,
            output,
        } => {
            let graph = load_graph(&graph)?;
            let hole = shortest_hole(&graph, source.resolve()?)?;
            FileResultWriter::new(output).write_hole(hole.as_ref())
        }
        Command::ShortestCycle { graph, output } => {
            let cycle = shortest_directed_cycle(&load_graph(&graph)?)?;
            FileResultWriter::new(output).write_directed_cycle(cycle.as_ref())
        }
        Command::Match { prefs, output } => {
            let prefs = loader::read_preferences(&prefs.proposers, &prefs.receivers)?;
            FileResultWriter::new(output).write_matching(&gale_shapley(&prefs))
        }
        Command::CheckStable { prefs, matching } => {
            let prefs = loader::read_preferences(&prefs.proposers, &prefs.receivers)?;
            let matching = loader::read_matching(&matching, prefs.n)?;
            println!("{}", u8::from(is_stable(&prefs, &matching)));
            Ok(())
        }
        Command::CheckUnique { prefs } => {
            let prefs = loader::read_preferences(&prefs.proposers, &prefs.receivers)?;
            println!("{}", u8::from(has_unique_stable_matching(&prefs)));
            Ok(())
        }
        Command::Simulate { trials, seed } => run_simulation(&config, trials, seed),
        Command::Sweep {
            graph,
            sources,
            output,
        } => run_sweep(load_graph(&graph)?, sources, output, &config).await,
    }
}

fn load_graph(path: &Path) -> Result<GraphCSR, Error> {
    let graph = TextGraphLoader::new(path).load()?;
    info!(
        "Loaded {} vertices and {} edges from {}.",
        graph.num_nodes,
        graph.num_edges(),
        path.display()
    );
    Ok(graph)
}

/// Writes the cycle, then re-weighs it against the graph as a sanity check.
fn run_neg_cycle(graph: &GraphCSR, output: PathBuf) -> Result<(), Error> {
    let detection = detect_negative_cycle(graph)?;
    FileResultWriter::new(output).write_negative_cycle(detection.found, &detection.cycle)?;

    if detection.found {
        match weigh_cycle(graph, &detection.cycle) {
            None => warn!("Reported vertices {:?} do not form a cycle.", detection.cycle),
            Some(cycle) if !cycle.is_negative() => warn!(
                "Reported cycle has non-negative weight {}.",
                cycle.total_weight
            ),
            Some(cycle) => info!(
                "Negative cycle of {} vertices, weight {}.",
                cycle.len(),
                cycle.total_weight
            ),
        }
    } else {
        info!("No negative cycle.");
    }
    Ok(())
}

/// Distances are written even when a negative cycle cuts relaxation short.
fn run_shortest_paths(graph: &GraphCSR, source: usize, output: PathBuf) -> Result<(), Error> {
    let outcome = relax(graph, source)?;

    match outcome.stop {
        StopReason::Converged => {}
        StopReason::CycleFound => warn!(
            "Negative cycle {:?} is reachable from {}; distances are not final.",
            outcome.cycle, source
        ),
        StopReason::RoundLimit => {
            return Err(common::error::Error::AmbiguousResult {
                rounds: outcome.rounds,
            }
            .into());
        }
    }

    FileResultWriter::new(output).write_shortest_paths(&outcome.distances, &outcome.parents)
}

fn run_average_weight(
    graph: &GraphCSR,
    source: usize,
    target: usize,
    length: usize,
    output: PathBuf,
) -> Result<(), Error> {
    if !graph.has_vertex(target) {
        return Err(common::error::Error::NodeIndexOutOfBounds(target).into());
    }
    let counts = count_paths(graph, source, Some(length))?;
    FileResultWriter::new(output).write_average_weight(counts.average_weight(length, target))
}

fn run_simulation(config: &Config, trials: Option<usize>, seed: Option<u64>) -> Result<(), Error> {
    let mut settings = config.simulator.clone();
    if let Some(trials) = trials {
        settings.trials = trials;
    }
    if seed.is_some() {
        settings.seed = seed;
    }

    let report = RedemptionSimulator::new(&settings)?.run();
    println!("{}", report);
    Ok(())
}

async fn run_sweep(
    graph: GraphCSR,
    sources: Vec<usize>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<(), Error> {
    let sources = if sources.is_empty() {
        (0..graph.num_nodes).collect()
    } else {
        sources
    };

    let sweep = CycleSweep::new(
        Arc::new(graph),
        BellmanFordSolver,
        config.sweep.max_concurrency,
    );
    let rows = sweep.run(&sources).await?;

    match output {
        Some(path) => {
            sweep::write_rows(&rows, BufWriter::new(File::create(&path)?))?;
            info!("Wrote {} sweep rows to {}.", rows.len(), path.display());
        }
        None => sweep::write_rows(&rows, io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn graph_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn source_flags_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "negcycle",
            "shortest-paths",
            "--graph",
            "g.txt",
            "--source",
            "0",
            "--source-file",
            "s.txt",
            "--output",
            "o.csv",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn neg_cycle_command_writes_cycle() {
        let graph = graph_file("3\n3\n0,1,1\n1,2,-5\n2,0,1\n");
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.txt");

        let graph = load_graph(graph.path()).unwrap();
        run_neg_cycle(&graph, output.clone()).unwrap();

        let text = fs::read_to_string(output).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("True"));
        let cycle = lines.next().unwrap();
        for vertex in ["0", "1", "2"] {
            assert!(cycle.contains(vertex));
        }
    }

    #[test]
    fn shortest_paths_command_writes_table() {
        let graph = graph_file("2\n1\n0,1,3\n");
        let dir = tempdir().unwrap();
        let output = dir.path().join("paths.csv");

        let graph = load_graph(graph.path()).unwrap();
        run_shortest_paths(&graph, 0, output.clone()).unwrap();

        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "vertex,distance,parent\n0,0.0,\n1,3.0,0\n"
        );
    }

    #[test]
    fn average_weight_rejects_unknown_target() {
        let graph = GraphCSR::from_edges(2, &mut [(0, 1, 1.0)]).unwrap();
        let dir = tempdir().unwrap();

        let result = run_average_weight(&graph, 0, 5, 1, dir.path().join("avg.txt"));

        assert_eq!(result.map_err(|e| e.exit_code()), Err(2));
    }

    #[test]
    fn average_weight_over_two_walks() {
        // 0 -> 1 -> 3 costs 3, 0 -> 2 -> 3 costs 5.
        let mut edges = vec![(0, 1, 1.0), (1, 3, 2.0), (0, 2, 4.0), (2, 3, 1.0)];
        let graph = GraphCSR::from_edges(4, &mut edges).unwrap();
        let dir = tempdir().unwrap();
        let output = dir.path().join("avg.txt");

        run_average_weight(&graph, 0, 3, 2, output.clone()).unwrap();

        assert_eq!(fs::read_to_string(output).unwrap(), "4.0\n");
    }
}
