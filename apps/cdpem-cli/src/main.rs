use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use cdpem_app::{
    AppResult, CycleSource, Scenario, run_control, run_cycle_analysis, run_network, run_queue,
    run_tuner_with_progress, scenario_service,
};

#[derive(Parser)]
#[command(name = "cdpem-cli")]
#[command(about = "cdpem sandbox - estimation, control, cycles, queues and networks")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// Scenario YAML file (defaults are used when omitted)
    #[arg(short, long)]
    scenario: Option<PathBuf>,
    /// Seed overriding the scenario's
    #[arg(long)]
    seed: Option<u64>,
    /// Write the full report as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a scenario file holding every default
    Init {
        /// Path of the scenario YAML file to create
        scenario_path: PathBuf,
    },
    /// Validate scenario file syntax and values
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Run the closed estimation/control loop
    Simulate(RunArgs),
    /// Spectrum and dominant cycle of a series or simulated state
    Cycles(RunArgs),
    /// Simulate the single-server queue
    Queue(RunArgs),
    /// Degree and betweenness centrality of a network
    Network(RunArgs),
    /// Grid search over controller gains
    Tune(RunArgs),
}

fn main() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { scenario_path } => cmd_init(&scenario_path),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Simulate(args) => cmd_simulate(&args),
        Commands::Cycles(args) => cmd_cycles(&args),
        Commands::Queue(args) => cmd_queue(&args),
        Commands::Network(args) => cmd_network(&args),
        Commands::Tune(args) => cmd_tune(&args),
    }
}

fn load(args: &RunArgs) -> AppResult<Scenario> {
    let mut scenario = match &args.scenario {
        Some(path) => scenario_service::load_scenario(path)?,
        None => Scenario::default(),
    };
    if args.seed.is_some() {
        scenario.seed = args.seed;
    }
    scenario_service::validate_scenario(&scenario)?;
    Ok(scenario)
}

fn write_report<T: Serialize>(output: Option<&Path>, report: &T) -> AppResult<()> {
    if let Some(path) = output {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(io::BufWriter::new(file), report).map_err(io::Error::from)?;
        println!("  Report written to {}", path.display());
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.6}", v))
}

fn cmd_init(scenario_path: &Path) -> AppResult<()> {
    scenario_service::save_scenario(scenario_path, &Scenario::default())?;
    println!("✓ Wrote default scenario: {}", scenario_path.display());
    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = scenario_service::load_scenario(scenario_path)?;
    scenario_service::validate_scenario(&scenario)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_simulate(args: &RunArgs) -> AppResult<()> {
    let scenario = load(args)?;
    println!(
        "Running closed loop: {} periods, Kp={} Ki={} Kd={}",
        scenario.control.steps, scenario.control.kp, scenario.control.ki, scenario.control.kd
    );

    let report = run_control(&scenario)?;
    println!("✓ Simulation completed (seed {})", report.seed);
    println!("  Mean tracking error: {}", fmt_opt(report.metrics.mean_tracking_error));
    println!("  RMS tracking error:  {}", fmt_opt(report.metrics.rms_tracking_error));
    println!("  Final error:         {}", fmt_opt(report.metrics.final_error));
    println!("  Peak |u|:            {}", fmt_opt(report.metrics.peak_control));
    println!("  Mean |uEff - u|:     {}", fmt_opt(report.metrics.mean_channel_distortion));

    write_report(args.output.as_deref(), &report)
}

fn cmd_cycles(args: &RunArgs) -> AppResult<()> {
    let scenario = load(args)?;
    let report = run_cycle_analysis(&scenario)?;

    match report.source {
        CycleSource::Series => println!("✓ Spectrum of supplied series"),
        CycleSource::Simulated { seed } => {
            println!("✓ Spectrum of simulated state 0 (seed {})", seed)
        }
    }
    println!("  Samples: {}, bins: {}", report.samples, report.spectrum.len());
    match &report.dominant {
        Some(peak) => println!(
            "  Dominant cycle: period {:.3} (frequency {:.4}, amplitude {:.4})",
            peak.period, peak.frequency, peak.amplitude
        ),
        None => println!("  No cycle beyond the mean"),
    }

    write_report(args.output.as_deref(), &report)
}

fn cmd_queue(args: &RunArgs) -> AppResult<()> {
    let scenario = load(args)?;
    let report = run_queue(&scenario)?;
    let s = &report.summary;

    println!("✓ Queue simulated (seed {})", report.seed);
    println!("  Events: {} ({} arrivals, {} departures)", s.events, s.arrivals, s.departures);
    println!("  Max length: {}", s.max_length);
    println!("  Time-weighted mean length: {:.4}", s.time_weighted_mean_length);
    println!("  Utilization: {}", fmt_opt(s.utilization));
    println!("  Theoretical mean length: {}", fmt_opt(s.theoretical_mean_length));

    write_report(args.output.as_deref(), &report)
}

fn cmd_network(args: &RunArgs) -> AppResult<()> {
    let scenario = load(args)?;
    let report = run_network(&scenario)?;

    if report.synthetic {
        println!("✓ Synthetic supply chain");
    } else {
        println!("✓ Network from {} observed edges", report.edges.len());
    }
    println!("  {:<20} {:>10} {:>12}", "node", "degree", "betweenness");
    for node in &report.nodes {
        println!(
            "  {:<20} {:>10.4} {:>12.4}",
            node,
            report.centrality.degree.get(node).copied().unwrap_or(0.0),
            report.centrality.betweenness.get(node).copied().unwrap_or(0.0)
        );
    }

    write_report(args.output.as_deref(), &report)
}

fn cmd_tune(args: &RunArgs) -> AppResult<()> {
    let scenario = load(args)?;
    println!("Grid search: {} periods per configuration", scenario.tuner.steps);

    let result = run_tuner_with_progress(&scenario, |p| {
        print!(
            "\r[{}/{}] Kp={:.3} Ki={:.3} Kd={:.3} loss={:.6} best={:.6}",
            p.index + 1,
            p.total,
            p.gains.kp,
            p.gains.ki,
            p.gains.kd,
            p.loss,
            p.best_loss
        );
        let _ = io::stdout().flush();
    })?;
    clear_progress_line();

    match &result.best_gains {
        Some(gains) => {
            println!("✓ Best of {} configurations (seed {})", result.evaluated, result.seed);
            println!("  Kp={} Ki={} Kd={}", gains.kp, gains.ki, gains.kd);
            println!("  Loss: {:.6}", result.best_loss);
        }
        None => println!("✓ Grid is empty; nothing evaluated"),
    }

    write_report(args.output.as_deref(), &result)
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}
