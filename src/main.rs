use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;

use crewplan::planning::{plan_request, validator};
use crewplan::{PlannerConfig, Result};

/// Crewplan - turn a content-marketing brief into a sequenced, costed task plan
#[derive(Parser, Debug)]
#[command(name = "crewplan")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    CREWPLAN_LOG=<filter>    Log filter (e.g. crewplan=trace), overrides --debug")]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Build a plan from a JSON request file and print it as JSON
    Plan {
        /// Path to the request JSON
        request: PathBuf,

        /// Planner configuration (defaults to ~/.crewplan/crewplan.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Schedule tasks on the calendar from this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Pretty-print the plan
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Configuration file to load instead of the default location
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    crewplan::log::init(cli.debug);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error[{}]: {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Plan {
            request,
            config,
            start_date,
            pretty,
        } => run_plan(request, config, start_date, pretty),
        Command::Config { config } => run_config(config),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load(&path),
        None => PlannerConfig::load_default(),
    }
}

fn run_plan(
    request: PathBuf,
    config: Option<PathBuf>,
    start_date: Option<NaiveDate>,
    pretty: bool,
) -> Result<()> {
    let config = load_config(config)?;
    debug!(path = %request.display(), "reading request");
    let text = fs::read_to_string(&request)?;
    let mut request = validator::parse_request(&text)?;
    if start_date.is_some() {
        request.project_start_date = start_date;
    }

    let plan = plan_request(&request, &config)?;
    let json = if pretty {
        plan.to_json_pretty()?
    } else {
        plan.to_json()?
    };
    println!("{}", json);
    Ok(())
}

fn run_config(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
