use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use sim_config::{load_resource_map_from_path, load_world_config};
use sim_core::Simulation;
use sim_types::{FieldLayer, ResourceMap, RoundMetrics, WorldConfig};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sim-cli")]
#[command(about = "Sugarscape cultivation simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct WorldArgs {
    /// World config TOML. Embedded defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Whitespace-delimited initial resource matrix. Two-peak landscape when omitted.
    #[arg(long)]
    map: Option<PathBuf>,
    #[arg(long, default_value_t = 100)]
    rounds: u32,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Run {
        #[command(flatten)]
        world: WorldArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Export {
        #[command(flatten)]
        world: WorldArgs,
        #[arg(long, value_enum, default_value_t = ExportFormat::Jsonl)]
        format: ExportFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Dump {
        #[command(flatten)]
        world: WorldArgs,
        #[arg(long, value_enum, default_value_t = LayerArg::Fertility)]
        layer: LayerArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Benchmark {
        #[command(flatten)]
        world: WorldArgs,
        #[arg(long, default_value_t = 4)]
        replicas: u32,
        #[arg(long)]
        population: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Jsonl,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayerArg {
    Resource,
    Fertility,
    Planted,
}

impl From<LayerArg> for FieldLayer {
    fn from(layer: LayerArg) -> Self {
        match layer {
            LayerArg::Resource => FieldLayer::Resource,
            LayerArg::Fertility => FieldLayer::Fertility,
            LayerArg::Planted => FieldLayer::Planted,
        }
    }
}

#[derive(Debug, Serialize)]
struct RunSummary {
    rounds: u32,
    seed: u64,
    final_round: u64,
    population: u32,
    gini: Option<f64>,
    mean_holdings: Option<f64>,
    mean_metabolism: Option<f64>,
    total_resource: u64,
    depopulated_at: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ReplicaResult {
    seed: u64,
    elapsed_ms: u128,
    final_metrics: RoundMetrics,
}

#[derive(Debug, Serialize)]
struct BenchmarkSummary {
    rounds: u32,
    replicas: u32,
    wall_ms: u128,
    avg_ms_per_round: f64,
    us_per_agent_round: f64,
    results: Vec<ReplicaResult>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "sim_cli=info,sim_core=info".to_owned()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { world, format, out } => run_command(world, format, out),
        Commands::Export { world, format, out } => export_command(world, format, out),
        Commands::Dump { world, layer, out } => dump_command(world, layer, out),
        Commands::Benchmark {
            world,
            replicas,
            population,
        } => benchmark_command(world, replicas, population),
    }
}

fn build_world(world: &WorldArgs) -> Result<Simulation> {
    let cfg = load_world_config(world.config.as_deref())?;
    let map = load_map(world)?;
    seeded_world(cfg, map.as_ref(), world.seed)
}

fn load_map(world: &WorldArgs) -> Result<Option<ResourceMap>> {
    world
        .map
        .as_deref()
        .map(load_resource_map_from_path)
        .transpose()
}

fn seeded_world(cfg: WorldConfig, map: Option<&ResourceMap>, seed: u64) -> Result<Simulation> {
    let sim = match map {
        Some(map) => Simulation::new(cfg, map.clone(), seed),
        None => Simulation::with_default_landscape(cfg, seed),
    }
    .with_context(|| format!("failed to build world with seed {seed}"))?;
    Ok(sim)
}

fn run_command(world: WorldArgs, format: OutputFormat, out: Option<PathBuf>) -> Result<()> {
    let mut sim = build_world(&world)?;
    sim.step_n(world.rounds);

    let last = sim.metrics().cloned().unwrap_or_default();
    let summary = RunSummary {
        rounds: world.rounds,
        seed: world.seed,
        final_round: sim.round(),
        population: last.population,
        gini: last.gini,
        mean_holdings: last.mean_holdings,
        mean_metabolism: last.mean_metabolism,
        total_resource: last.total_resource,
        depopulated_at: sim
            .history()
            .iter()
            .find(|record| record.population == 0)
            .map(|record| record.round),
    };

    let text = match format {
        OutputFormat::Pretty => format!(
            "rounds={} seed={} final_round={} population={} gini={} mean_holdings={} mean_metabolism={} total_resource={}",
            summary.rounds,
            summary.seed,
            summary.final_round,
            summary.population,
            fmt_stat(summary.gini),
            fmt_stat(summary.mean_holdings),
            fmt_stat(summary.mean_metabolism),
            summary.total_resource
        ),
        OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
    };
    write_output(text, out)
}

fn export_command(world: WorldArgs, format: ExportFormat, out: Option<PathBuf>) -> Result<()> {
    let mut sim = build_world(&world)?;
    sim.step_n(world.rounds);

    let payload = match format {
        ExportFormat::Jsonl => sim.export_metrics_jsonl()?,
        ExportFormat::Json => serde_json::to_string_pretty(sim.history())?,
    };
    info!(records = sim.history().len(), "exported round metrics");
    write_output(payload, out)
}

fn dump_command(world: WorldArgs, layer: LayerArg, out: Option<PathBuf>) -> Result<()> {
    let mut sim = build_world(&world)?;
    sim.step_n(world.rounds);

    let text = sim.dump_layer(layer.into());
    write_output(text.trim_end().to_owned(), out)
}

fn benchmark_command(world: WorldArgs, replicas: u32, population: Option<u32>) -> Result<()> {
    let mut cfg = load_world_config(world.config.as_deref())?;
    if let Some(v) = population {
        cfg.initial_population = v;
    }
    let map = load_map(&world)?;
    let rounds = world.rounds.max(1);
    let seed = world.seed;
    let replicas = replicas.max(1);

    let start = Instant::now();
    let results = (0..u64::from(replicas))
        .into_par_iter()
        .map(|offset| run_replica(&cfg, map.as_ref(), rounds, seed.wrapping_add(offset)))
        .collect::<Result<Vec<_>>>()?;
    let wall = start.elapsed();

    let total_ms: f64 = results.iter().map(|r| r.elapsed_ms as f64).sum();
    let agent_rounds = (cfg.initial_population.max(1) as f64)
        * (rounds as f64)
        * (replicas as f64);

    let summary = BenchmarkSummary {
        rounds,
        replicas,
        wall_ms: wall.as_millis(),
        avg_ms_per_round: total_ms / (rounds as f64 * replicas as f64),
        us_per_agent_round: total_ms * 1000.0 / agent_rounds,
        results,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_replica(
    cfg: &WorldConfig,
    map: Option<&ResourceMap>,
    rounds: u32,
    seed: u64,
) -> Result<ReplicaResult> {
    let mut sim = seeded_world(cfg.clone(), map, seed)?;
    let start = Instant::now();
    sim.step_n(rounds);
    let elapsed = start.elapsed();

    Ok(ReplicaResult {
        seed,
        elapsed_ms: elapsed.as_millis(),
        final_metrics: sim.metrics().cloned().unwrap_or_default(),
    })
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_owned(), |v| format!("{v:.3}"))
}

fn write_output(text: String, out: Option<PathBuf>) -> Result<()> {
    if let Some(path) = out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating output directory {}", parent.display())
            })?;
        }
        fs::write(&path, text).with_context(|| format!("failed writing {}", path.display()))?;
        info!("wrote output to {}", path.display());
    } else {
        println!("{text}");
    }
    Ok(())
}
