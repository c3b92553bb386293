use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use wsgate_core::{build_receipt, run_gate, GatePlan};
use wsgate_types::{Ceiling, OUTCOME_RANKING, UNKNOWN_OUTCOME, UNKNOWN_RANK};

#[derive(Parser)]
#[command(name = "wsgate")]
#[command(about = "Conformance gate for WebSocket fuzzing-suite reports", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a generated fuzzing report against the tolerance ceiling.
    Gate(GateArgs),

    /// Print the canonical outcome ranking.
    Outcomes(OutcomesArgs),
}

#[derive(Parser, Debug)]
struct GateArgs {
    /// Path to the fuzzing client's configuration file; its `outdir` field
    /// locates the generated index.json report.
    #[arg(long, default_value = "fuzzingclient.json")]
    client_config: PathBuf,

    /// Maximum tolerated rank for the primary behavior outcome.
    #[arg(long, default_value_t = Ceiling::default().behavior)]
    max_behavior: usize,

    /// Maximum tolerated rank for the closing-handshake outcome.
    #[arg(long, default_value_t = Ceiling::default().close)]
    max_close: usize,

    /// Write a JSON receipt of the run.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct OutcomesArgs {
    #[arg(long, value_enum, default_value_t = OutcomesFormat::Text)]
    format: OutcomesFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutcomesFormat {
    Text,
    Json,
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Gate(args) => cmd_gate(args),
        Commands::Outcomes(args) => {
            cmd_outcomes(args)?;
            Ok(0)
        }
    }
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn cmd_gate(args: GateArgs) -> Result<i32> {
    let plan = GatePlan {
        client_config: args.client_config,
        ceiling: Ceiling {
            behavior: args.max_behavior,
            close: args.max_close,
        },
    };
    info!(
        config = %plan.client_config.display(),
        max_behavior = plan.ceiling.behavior,
        max_close = plan.ceiling.close,
        "evaluating fuzzing report"
    );

    let run = run_gate(&plan)?;
    print!("{}", run.transcript);

    if let Some(out) = &args.out {
        write_json(out, &build_receipt(&run.evaluation))?;
    }

    Ok(run.exit_code)
}

fn cmd_outcomes(args: OutcomesArgs) -> Result<()> {
    match args.format {
        OutcomesFormat::Text => {
            for (rank, name) in OUTCOME_RANKING.iter().enumerate() {
                println!("{rank}  {name}");
            }
            println!("{UNKNOWN_RANK}  {UNKNOWN_OUTCOME} (sentinel for unrecognized outcomes)");
        }
        OutcomesFormat::Json => {
            let ranking = serde_json::json!({
                "ranking": OUTCOME_RANKING,
                "unknown_rank": UNKNOWN_RANK,
            });
            println!("{}", serde_json::to_string_pretty(&ranking)?);
        }
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(value).context("serialize receipt")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
