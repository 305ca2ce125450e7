// Maximum-power point of a PV module or array from the command line
// Prints Vmp, Imp and Pmax for one irradiance / temperature pair

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{info, LevelFilter};

use pv_rs::config::SimulationConfig;
use pv_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
use pv_rs::physics::OperatingCondition;
use pv_rs::solver::SolverMethod;
use pv_rs::{PvError, PvSolver};

/// Single-diode maximum-power-point solver
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Irradiance G in W/m²
    #[arg(short = 'g', long, default_value_t = 1000.0, allow_negative_numbers = true)]
    irradiance: f64,

    /// Cell temperature T in °C
    #[arg(short, long, default_value_t = 25.0, allow_negative_numbers = true)]
    temperature: f64,

    /// Panels in series (overrides the configuration file)
    #[arg(short, long)]
    series: Option<u32>,

    /// Strings in parallel (overrides the configuration file)
    #[arg(short, long)]
    parallel: Option<u32>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of voltage samples (overrides the configuration file)
    #[arg(long)]
    samples: Option<usize>,

    /// Root-finding method: newton or secant
    #[arg(short, long)]
    method: Option<SolverMethod>,

    /// Write the full I–V curve to this CSV file
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Errors only
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Level forced by `--quiet` / `--verbose`; `None` defers to `RUST_LOG`
    fn log_level(&self) -> Option<LevelFilter> {
        match (self.quiet, self.verbose) {
            (true, _) => Some(LevelFilter::Error),
            (false, 0) => None,
            (false, 1) => Some(LevelFilter::Debug),
            (false, _) => Some(LevelFilter::Trace),
        }
    }

    fn simulation_config(&self) -> Result<SimulationConfig, PvError> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(series) = self.series {
            config.layout.series = series;
        }
        if let Some(parallel) = self.parallel {
            config.layout.parallel = parallel;
        }
        if let Some(samples) = self.samples {
            config.sweep.samples = samples;
        }
        if let Some(method) = self.method {
            config.solver.method = method;
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.simulation_config()?;
    let solver = PvSolver::from_config(&config)?;

    info!(
        "{} x {} array, {} samples, {} solver",
        config.layout.series, config.layout.parallel, config.sweep.samples, config.solver.method
    );

    let Some(path) = &args.csv else {
        println!("{}", solver.solve(args.irradiance, args.temperature)?);
        return Ok(());
    };

    let (mpp, curve) = solver.solve_with_curve(args.irradiance, args.temperature)?;
    println!("{}", mpp);

    let condition = OperatingCondition::new(args.irradiance, args.temperature)?;

    let mut metadata = CsvMetadata::from_condition(
        "Single diode",
        config.solver.method.solver().name(),
        &condition,
    );
    metadata.layout = Some((config.layout.series, config.layout.parallel));
    metadata.mpp = Some(mpp);

    CsvExporter::new(CsvConfig::default().with_metadata(metadata))
        .export_curve(&curve, None, path)?;
    info!("I-V curve written to {}", path.display());

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = args.log_level() {
        logger.filter_level(level);
    }
    logger.init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
