use clap::{Parser, Subcommand, ValueEnum};
use da_core::Real;
use da_expr::Bindings;
use da_project::{compile, load, resolve_custom_variables, CompileOptions, Settings};
use da_sim::{OutputTable, SimulationClock, SimulationRunner, Simulator};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "da-cli")]
#[command(about = "Differential analyzer CLI - mechanical integrator machine simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a machine description and build it
    Validate {
        /// Path to the JSON or YAML description
        config_path: PathBuf,
    },
    /// Run a machine and export an output table
    Run {
        /// Path to the JSON or YAML description
        config_path: PathBuf,
        /// Number of ticks to run
        #[arg(long)]
        steps: u64,
        /// Motor rotation per tick, overriding the description
        #[arg(long)]
        motor_rate: Option<Real>,
        /// Index of the output table to export
        #[arg(long, default_value_t = 0)]
        table: usize,
        /// Pace the run at this many ticks per second
        #[arg(long)]
        realtime: Option<f64>,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Evaluate an expression
    Eval {
        expression: String,
        /// Variable binding, e.g. --var x=1.5
        #[arg(long = "var", value_parser = parse_binding)]
        vars: Vec<(String, Real)>,
    },
    /// Resolve a block of custom variables
    Vars {
        /// File holding `name = expr` statements
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Run {
            config_path,
            steps,
            motor_rate,
            table,
            realtime,
            format,
            output,
        } => cmd_run(
            &config_path,
            steps,
            motor_rate,
            table,
            realtime,
            format,
            output.as_deref(),
        ),
        Commands::Eval { expression, vars } => cmd_eval(&expression, vars),
        Commands::Vars { path } => cmd_vars(&path),
    }
}

fn parse_binding(s: &str) -> Result<(String, Real), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    let value = value
        .trim()
        .parse::<Real>()
        .map_err(|e| format!("bad value for '{}': {e}", name.trim()))?;
    Ok((name.trim().to_string(), value))
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating machine: {}", config_path.display());
    let config = load(config_path)?;
    let sim = compile(&config, &CompileOptions::default())?;
    println!("✓ Machine is valid");
    println!("  Shafts: {}", sim.shafts().len());
    println!("  Devices: {}", sim.devices().len());
    println!("  Output tables: {}", sim.output_tables().count());
    let floating = sim.graph().unconnected_shafts().count();
    if floating > 0 {
        println!("  Unconnected shafts: {floating}");
    }
    Ok(())
}

fn cmd_run(
    config_path: &Path,
    steps: u64,
    motor_rate: Option<Real>,
    table: usize,
    realtime: Option<f64>,
    format: Format,
    output: Option<&Path>,
) -> CliResult<()> {
    let config = load(config_path)?;
    let options = CompileOptions {
        motor_rotation: motor_rate,
    };
    let mut sim = compile(&config, &options)?;

    let started = Instant::now();
    match realtime {
        Some(rate) => sim = run_paced(sim, steps, rate)?,
        None => sim.run(steps)?,
    }
    info!(ticks = sim.tick(), elapsed = ?started.elapsed(), "run complete");

    let rendered = match format {
        Format::Csv => table_csv(sim.output_table(table)?),
        Format::Json => serde_json::to_string_pretty(&TableExport::from(sim.output_table(table)?))?,
    };

    if let Some(path) = output {
        std::fs::write(path, rendered)?;
        println!("✓ Ran {} ticks, exported table {} to {}", sim.tick(), table, path.display());
    } else {
        print!("{rendered}");
    }
    Ok(())
}

/// Drive the simulator from the wall clock until `steps` ticks have run.
fn run_paced(sim: Simulator, steps: u64, ticks_per_second: f64) -> CliResult<Simulator> {
    let clock = SimulationClock::from_frequency(ticks_per_second)?;
    let frame = Duration::from_secs_f64(clock.tick_period().min(0.05));
    let mut runner = SimulationRunner::new(sim, clock, Some(steps));
    runner.run();

    let mut last = Instant::now();
    while !runner.has_finished() {
        std::thread::sleep(frame);
        let now = Instant::now();
        runner.advance((now - last).as_secs_f64())?;
        last = now;
    }
    Ok(runner.into_simulator())
}

#[derive(Serialize)]
struct TableExport<'a> {
    x: &'a [Real],
    y1: &'a [Real],
    #[serde(skip_serializing_if = "Option::is_none")]
    y2: Option<&'a [Real]>,
}

impl<'a> From<&'a OutputTable> for TableExport<'a> {
    fn from(table: &'a OutputTable) -> Self {
        Self {
            x: table.x_history(),
            y1: table.y1_history(),
            y2: table.y2_history(),
        }
    }
}

fn table_csv(table: &OutputTable) -> String {
    let mut csv = String::from(if table.y2_history().is_some() {
        "x,y1,y2\n"
    } else {
        "x,y1\n"
    });
    for i in 0..table.len() {
        csv.push_str(&format!("{},{}", table.x_history()[i], table.y1_history()[i]));
        if let Some(y2) = table.y2_history() {
            csv.push_str(&format!(",{}", y2[i]));
        }
        csv.push('\n');
    }
    csv
}

fn cmd_eval(expression: &str, vars: Vec<(String, Real)>) -> CliResult<()> {
    let bindings: Bindings = vars.into_iter().collect();
    println!("{}", da_expr::eval_str(expression, &bindings)?);
    Ok(())
}

fn cmd_vars(path: &Path) -> CliResult<()> {
    let settings = Settings {
        custom_variables: Some(std::fs::read_to_string(path)?),
    };
    let chain = resolve_custom_variables(&settings)?;
    if chain.values.is_empty() {
        println!("No variables defined");
    }
    for (name, value) in &chain.values {
        println!("  {name} = {value}");
    }
    Ok(())
}
