use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use graphmotion::{
    Clock as _, EngineSettings, FrameOutput, Graph, GraphData, GraphEngine, GraphKind,
    ManualClock, SharedGraph, Size, place_vertices,
};

#[derive(Parser, Debug)]
#[command(name = "graphmotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the static placement of a graph and print it as JSON.
    Place(PlaceArgs),
    /// Run the engine for a number of frames and print the last frame as JSON.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct GraphArgs {
    /// Input graph JSON (`{"vertices": [...], "edges": [...]}`).
    #[arg(long)]
    graph: PathBuf,

    /// Edge direction of the input graph.
    #[arg(long, value_enum, default_value_t = KindChoice::Undirected)]
    kind: KindChoice,

    /// Engine settings JSON; defaults apply when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlaceArgs {
    #[command(flatten)]
    graph: GraphArgs,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    graph: GraphArgs,

    /// Number of frames to run.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Milliseconds between frames.
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// Canvas width.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Canvas height.
    #[arg(long, default_value_t = 600.0)]
    height: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindChoice {
    Directed,
    Undirected,
}

impl From<KindChoice> for GraphKind {
    fn from(kind: KindChoice) -> Self {
        match kind {
            KindChoice::Directed => Self::Directed,
            KindChoice::Undirected => Self::Undirected,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Place(args) => cmd_place(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_graph(args: &GraphArgs) -> anyhow::Result<Graph> {
    let json = std::fs::read_to_string(&args.graph)
        .with_context(|| format!("open graph '{}'", args.graph.display()))?;
    let data = GraphData::from_json(&json).with_context(|| "parse graph JSON")?;
    Ok(Graph::from_data(args.kind.into(), data)?)
}

fn read_settings(path: Option<&Path>) -> anyhow::Result<EngineSettings> {
    let Some(path) = path else {
        return Ok(EngineSettings::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("open settings '{}'", path.display()))?;
    EngineSettings::from_json(&json).with_context(|| "parse settings JSON")
}

fn write_json(out: Option<&Path>, value: &impl serde::Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, json)
                .with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_place(args: PlaceArgs) -> anyhow::Result<()> {
    let graph = read_graph(&args.graph)?;
    let settings = read_settings(args.graph.settings.as_deref())?;
    let result = place_vertices(
        graph.connections(),
        settings.vertex_radius,
        &settings.placement,
    )?;
    write_json(args.graph.out.as_deref(), &result)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if !args.frame_ms.is_finite() || args.frame_ms <= 0.0 {
        anyhow::bail!("--frame-ms must be finite and > 0");
    }
    let graph = SharedGraph::new(read_graph(&args.graph)?);
    let settings = read_settings(args.graph.settings.as_deref())?;
    let clock = ManualClock::new(0.0);
    let mut engine = GraphEngine::new(
        graph,
        settings,
        Size::new(args.width, args.height),
        clock.now_ms(),
    )?;

    let mut last = FrameOutput::default();
    for _ in 0..args.frames {
        last = engine.tick(clock.now_ms())?;
        clock.advance(args.frame_ms);
    }
    engine.teardown();
    write_json(args.graph.out.as_deref(), &last)
}
