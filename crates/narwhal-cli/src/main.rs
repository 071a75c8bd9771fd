mod document;

use clap::{Args, Parser, Subcommand, ValueEnum};
use document::{GraphDocument, LayoutDocument, SnapshotDocument};
use narwhal::placement::{DEFAULT_SEED, POLE_CIRCLE_RADIUS, scatter_around_poles, scatter_nodes};
use narwhal::{LayoutOptions, Statistics, Synchroniser};
use narwhal_dygraph::{Color, DyGraph, PresenceMode};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug)]
enum CliError {
    Usage(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    Document(String),
    Graph(narwhal_dygraph::Error),
    Layout(narwhal::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Document(msg) => write!(f, "invalid document: {msg}"),
            CliError::Graph(err) => write!(f, "{err}"),
            CliError::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<narwhal_dygraph::Error> for CliError {
    fn from(value: narwhal_dygraph::Error) -> Self {
        Self::Graph(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        Self::Layout(value)
    }
}

/// Lay out dynamic graphs in a space-time cube.
#[derive(Debug, Parser)]
#[command(name = "narwhal", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lay out the graph and print the mirror graph with node trajectories.
    Layout(LayoutArgs),
    /// Lay out the graph and print the original graph as seen at one time.
    Snapshot {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Time of the snapshot.
        #[arg(short, long)]
        time: f64,
    },
}

#[derive(Debug, Args)]
struct LayoutArgs {
    /// Input document (`-` or omitted for stdin).
    input: Option<String>,

    /// JSON file with layout options.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Cube height per unit of time.
    #[arg(long)]
    time_factor: Option<f64>,

    /// Wall-clock limit in seconds.
    #[arg(long)]
    time_limit: Option<f64>,

    /// Seed of the initial placement.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = Presence::Plain)]
    presence: Presence,

    /// Give elements a faded color timeline with this fade duration.
    #[arg(long)]
    fading: Option<f64>,

    #[arg(long)]
    pretty: bool,

    /// Output file (stdout when omitted).
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Presence {
    Plain,
    KeepNodes,
    KeepEdges,
}

impl From<Presence> for PresenceMode {
    fn from(value: Presence) -> Self {
        match value {
            Presence::Plain => PresenceMode::Plain,
            Presence::KeepNodes => PresenceMode::KeepAppearedNodes,
            Presence::KeepEdges => PresenceMode::KeepAppearedEdges,
        }
    }
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&Path>) -> Result<(), CliError> {
    let mut bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    bytes.push(b'\n');
    match out {
        None => std::io::stdout().lock().write_all(&bytes)?,
        Some(path) => std::fs::write(path, bytes)?,
    }
    Ok(())
}

fn load_options(args: &LayoutArgs) -> Result<LayoutOptions, CliError> {
    let mut options = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => LayoutOptions::default(),
    };
    if let Some(iterations) = args.iterations {
        options.iterations = iterations;
    }
    if let Some(time_factor) = args.time_factor {
        options.time_factor = time_factor;
    }
    if let Some(limit) = args.time_limit {
        options.time_limit_secs = Some(limit);
    }
    options.validate()?;
    Ok(options)
}

fn place(graph: &mut DyGraph, options: &LayoutOptions, seed: u64) {
    let spread = options.desired_distance * (graph.node_count().max(1) as f64).sqrt() * 2.0;
    if graph.cluster_count() > 0 {
        scatter_around_poles(
            graph,
            POLE_CIRCLE_RADIUS.max(spread),
            options.cluster_radius(),
            spread,
            seed,
        );
    } else {
        scatter_nodes(graph, spread, seed);
    }
}

fn lay_out(args: &LayoutArgs) -> Result<(Synchroniser, Statistics), CliError> {
    let options = load_options(args)?;
    let text = read_input(args.input.as_deref())?;
    let doc: GraphDocument = serde_json::from_str(&text)?;

    let mut graph = doc.to_graph()?;
    let data_end = graph
        .time_extent()
        .map(|extent| extent.right_bound())
        .unwrap_or(0.0);
    let mode = PresenceMode::from(args.presence);
    match args.fading {
        Some(fading) if !(fading.is_finite() && fading >= 0.0) => {
            return Err(CliError::Usage(format!(
                "--fading must be a non-negative number, got {fading}"
            )));
        }
        Some(fading) => graph.merge_and_color(mode, data_end, Color::BLACK, Color::GRAY, fading),
        None => graph.merge_presences(mode, data_end),
    }
    place(&mut graph, &options, args.seed);
    doc.pin_positions(&mut graph);
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        clusters = graph.cluster_count(),
        "read dynamic graph"
    );
    debug!(?options, "layout options");

    Ok(narwhal::layout(graph, &options)?)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Layout(args) => {
            let (sync, stats) = lay_out(&args)?;
            let doc = LayoutDocument::new(&sync, stats);
            write_json(&doc, args.pretty, args.out.as_deref())
        }
        Command::Snapshot { layout: args, time } => {
            if !time.is_finite() {
                return Err(CliError::Usage(format!("--time must be finite, got {time}")));
            }
            let (sync, _) = lay_out(&args)?;
            let doc = SnapshotDocument::new(&sync.original().snapshot_at(time));
            write_json(&doc, args.pretty, args.out.as_deref())
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {err}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
