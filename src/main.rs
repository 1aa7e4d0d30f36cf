//! neuronet CLI - load an edge list and query it from the command line.
//!
//! ```bash
//! # Load summary and the highest-degree node
//! neuronet stats edges.txt
//!
//! # Nodes within two hops of node 0, plus the edges among them
//! neuronet bfs edges.txt --start 0 --depth 2 --edges
//!
//! # Ten highest out-degree nodes of an undirected CSV edge list
//! neuronet top edges.csv -k 10 --out --undirected
//!
//! # Write a random edge list
//! neuronet generate -o random.txt --nodes 100000 --edges 1000000 --seed 42
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use neuronet::analysis::degree::DegreeIndex;
use neuronet::analysis::subgraph::induced_edges;
use neuronet::ingest::synthetic::{SyntheticConfig, generate, write_edge_list};
use neuronet::{DegreeSelection, Directedness, GraphEngine, LoadOptions, LoadedGraph};

#[derive(Parser)]
#[command(name = "neuronet")]
#[command(about = "Sparse graph engine CLI", long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Input {
    /// Edge list file (`u v` per line, or `u,v` for .csv)
    input: PathBuf,

    /// Treat edges as undirected
    #[arg(long)]
    undirected: bool,

    /// Reject `#` comment lines instead of skipping them
    #[arg(long)]
    strict: bool,
}

impl Input {
    fn load(&self) -> Result<std::sync::Arc<LoadedGraph>> {
        let options = LoadOptions {
            directedness: Directedness::from_flag(!self.undirected),
            allow_comments: !self.strict,
            ..LoadOptions::default()
        };
        let mut engine = GraphEngine::new();
        engine
            .load_with(&self.input, &options)
            .with_context(|| format!("failed to load {}", self.input.display()))?;
        engine.snapshot().context("no graph after load")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show load statistics and the highest-degree node
    Stats {
        #[command(flatten)]
        input: Input,
    },

    /// Nodes reachable within a hop bound
    Bfs {
        #[command(flatten)]
        input: Input,

        /// Start node identifier
        #[arg(long)]
        start: u64,

        /// Maximum hop count (at least 1)
        #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
        depth: i64,

        /// Also print the edges among the reached nodes
        #[arg(long)]
        edges: bool,
    },

    /// Neighbors of a node
    Neighbors {
        #[command(flatten)]
        input: Input,

        /// Node identifier
        #[arg(long)]
        node: u64,
    },

    /// Highest-degree nodes
    Top {
        #[command(flatten)]
        input: Input,

        /// Number of nodes to show
        #[arg(short, default_value_t = 10)]
        k: usize,

        /// Count in-degree only
        #[arg(long = "in", conflicts_with = "out_only")]
        in_only: bool,

        /// Count out-degree only
        #[arg(long = "out")]
        out_only: bool,
    },

    /// Write a random edge list
    Generate {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Node identifiers are drawn from 0..NODES
        #[arg(long, default_value_t = 1_000, value_parser = clap::value_parser!(u64).range(2..))]
        nodes: u64,

        #[arg(long, default_value_t = 10_000)]
        edges: u64,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Stats { input } => {
            let loaded = input.load()?;
            println!("{}", loaded.report());
            match loaded.degree_max_node(true, true) {
                Ok(node) => {
                    let degree = loaded.graph().degree(node, true, true)?;
                    println!("Max degree node: {node} (degree {degree})");
                }
                Err(e) => println!("Max degree node: none ({e})"),
            }
        }
        Commands::Bfs {
            input,
            start,
            depth,
            edges,
        } => {
            let loaded = input.load()?;
            let nodes = loaded.bfs(start, depth)?;
            println!("Reached {} nodes", nodes.len());
            for node in &nodes {
                println!("{node}");
            }
            if edges {
                for (src, dst) in induced_edges(loaded.graph(), &nodes)? {
                    println!("{src} {dst}");
                }
            }
        }
        Commands::Neighbors { input, node } => {
            let loaded = input.load()?;
            for n in loaded.neighbors(node)? {
                println!("{n}");
            }
        }
        Commands::Top {
            input,
            k,
            in_only,
            out_only,
        } => {
            let loaded = input.load()?;
            let selection = match (in_only, out_only) {
                (true, false) => DegreeSelection::In,
                (false, true) => DegreeSelection::Out,
                _ => DegreeSelection::Total,
            };
            println!("{:>12} {:>10}", "node", "degree");
            for (node, degree) in DegreeIndex::new(loaded.graph()).ranking(selection, k) {
                println!("{node:>12} {degree:>10}");
            }
        }
        Commands::Generate {
            output,
            nodes,
            edges,
            seed,
        } => {
            let cfg = SyntheticConfig {
                node_count: nodes,
                edge_count: edges,
                seed,
            };
            let written = write_synthetic(&output, &cfg)?;
            println!("Wrote {written} edges to {}", output.display());
        }
    }
    Ok(())
}

fn write_synthetic(path: &Path, cfg: &SyntheticConfig) -> Result<u64> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let written = write_edge_list(BufWriter::new(file), generate(cfg))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(written)
}
