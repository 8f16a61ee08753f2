//! fc-core - Feldman-Cousins confidence belts from the command line
//!
//! Subcommands:
//! - `expand`: build one belt for explicit per-channel rates
//! - `reject`: minimum signal that rejects the background-only hypothesis
//! - `separate`: scan two two-channel hypotheses for disjoint belts

use clap::{Args, Parser, Subcommand};
use fc_common::{Error, OutputFormat, Rate, Result, StructuredError};
use fc_core::config::{load_config, ScanConfig};
use fc_core::exit_codes::ExitCode;
use fc_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use fc_core::output::{write_block, BeltReport, RejectionReport, SeparationReport};
use fc_core::scan::{reject, separate, RejectOptions, SeparationOptions};
use fc_core::Region;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Feldman-Cousins confidence belts over Poisson event counts
#[derive(Parser)]
#[command(name = "fc-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to a config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for tie-breaking (reproducible belts)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "tsv")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the acceptance belt for explicit rates
    Expand(ExpandArgs),
    /// Find the minimum signal rejecting the background-only hypothesis
    Reject(RejectArgs),
    /// Scan two hypotheses for disjoint belts
    Separate(SeparateArgs),
}

#[derive(Args, Debug)]
struct ExpandArgs {
    /// Confidence level in (0, 1)
    #[arg(long)]
    cl: Option<f64>,

    /// Channel rate as SIGNAL or SIGNAL:BACKGROUND (repeat per channel)
    #[arg(long = "rate", short = 'r', required = true, value_parser = parse_rate)]
    rates: Vec<Rate>,

    /// Also print the next-step candidate points
    #[arg(long)]
    closest: bool,
}

#[derive(Args, Debug)]
struct RejectArgs {
    /// Expected background count
    background: f64,

    /// Confidence level in (0, 1)
    #[arg(long)]
    cl: Option<f64>,

    /// Signal increment per step
    #[arg(long)]
    step: Option<f64>,
}

#[derive(Args, Debug)]
struct SeparateArgs {
    /// Expected background count per channel
    background: f64,

    /// Confidence level in (0, 1)
    #[arg(long)]
    cl: Option<f64>,

    /// Violating-to-conserving signal ratio
    #[arg(long)]
    scale: Option<f64>,

    /// First signal
    #[arg(long, default_value_t = 1.0)]
    start: f64,

    /// Signals stay below this value
    #[arg(long, default_value_t = 100.0)]
    stop: f64,

    /// Signal increment
    #[arg(long, default_value_t = 1.0)]
    step: f64,

    /// Write point and candidate blocks for both hypotheses into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn parse_rate(s: &str) -> std::result::Result<Rate, String> {
    let (signal, background) = match s.split_once(':') {
        Some((sig, bak)) => (sig, bak),
        None => (s, "0"),
    };
    let signal: f64 = signal
        .trim()
        .parse()
        .map_err(|e| format!("bad signal '{}': {}", signal, e))?;
    let background: f64 = background
        .trim()
        .parse()
        .map_err(|e| format!("bad background '{}': {}", background, e))?;
    Rate::new(signal, background).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    // Without -v/-q the FC_LOG and RUST_LOG variables decide the level
    let cli_level = (cli.global.verbose > 0 || cli.global.quiet)
        .then(|| LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet));
    let log_config = LogConfig::from_env(cli_level, cli.global.log_format);
    init_logging(&log_config);

    let exit_code = match run(&cli) {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = ExitCode::from(&err);
            report_error(&cli.global, &err, code);
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> Result<()> {
    let resolved = load_config(cli.global.config.as_deref())?;
    debug!(source = %resolved.source, path = ?resolved.path, "configuration loaded");
    let mut config = resolved.config;
    if let Some(seed) = cli.global.seed {
        config.seed = Some(seed);
    }

    match &cli.command {
        Commands::Expand(args) => run_expand(&cli.global, &config, args),
        Commands::Reject(args) => run_reject(&cli.global, &config, args),
        Commands::Separate(args) => run_separate(&cli.global, &config, args),
    }
}

fn region(config: &ScanConfig, order: usize, offset: u64) -> Region {
    Region::from_seed(order, config.seed.map(|s| s.wrapping_add(offset)))
        .with_max_iterations(config.max_iterations)
}

fn run_expand(global: &GlobalOpts, config: &ScanConfig, args: &ExpandArgs) -> Result<()> {
    let cl = args.cl.unwrap_or(config.confidence_level);
    let belt = region(config, args.rates.len(), 0).expand(cl, &args.rates)?;
    info!(capacity = belt.capacity(), "belt expanded");

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match global.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &BeltReport::new(&belt, args.closest))?;
            writeln!(out)?;
        }
        OutputFormat::Tsv => {
            write_block(&mut out, &belt.points())?;
            if args.closest {
                write_block(&mut out, &belt.closest())?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn run_reject(global: &GlobalOpts, config: &ScanConfig, args: &RejectArgs) -> Result<()> {
    let mut opts = RejectOptions::from_config(args.background, config);
    if let Some(cl) = args.cl {
        opts.confidence_level = cl;
    }
    if let Some(step) = args.step {
        opts.step = step;
    }

    let outcome = reject::minimum_signal(&mut region(config, 1, 0), &opts)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match global.format {
        OutputFormat::Json => {
            let report = RejectionReport::new(&outcome, opts.confidence_level);
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Tsv => {
            writeln!(
                out,
                "For background of {} mean signal is {}",
                outcome.background, outcome.signal
            )?;
            writeln!(
                out,
                "Confidence belt ({}%) is contained between {} and {}",
                opts.confidence_level * 100.0,
                outcome.lower,
                outcome.upper
            )?;
        }
    }
    Ok(())
}

fn run_separate(global: &GlobalOpts, config: &ScanConfig, args: &SeparateArgs) -> Result<()> {
    let mut opts = SeparationOptions::from_config(args.background, config);
    if let Some(cl) = args.cl {
        opts.confidence_level = cl;
    }
    if let Some(scale) = args.scale {
        opts.scale = scale;
    }
    opts.start = args.start;
    opts.stop = args.stop;
    opts.step = args.step;

    let mut asymmetric = region(config, 2, 0);
    let mut symmetric = region(config, 2, 1);
    let rows = separate::scan(&mut asymmetric, &mut symmetric, &opts)?;

    if let Some(dir) = &args.output_dir {
        write_separation_files(dir, &rows)?;
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match global.format {
        OutputFormat::Json => {
            let reports: Vec<SeparationReport> = rows.iter().map(SeparationReport::from).collect();
            serde_json::to_writer_pretty(&mut out, &reports)?;
            writeln!(out)?;
        }
        OutputFormat::Tsv => {
            for (index, row) in rows.iter().enumerate() {
                writeln!(out, "{}\t{}\t{}", index, row.signal, row.distinguishable)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn write_separation_files(dir: &Path, rows: &[separate::SeparationRow]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let open = |name: &str| -> Result<BufWriter<File>> {
        Ok(BufWriter::new(File::create(dir.join(name))?))
    };
    let mut asym_points = open("asymmetric_points.dat")?;
    let mut asym_closest = open("asymmetric_closest.dat")?;
    let mut sym_points = open("symmetric_points.dat")?;
    let mut sym_closest = open("symmetric_closest.dat")?;

    for row in rows {
        write_block(&mut asym_points, &row.asymmetric.points())?;
        write_block(&mut asym_closest, &row.asymmetric.closest())?;
        write_block(&mut sym_points, &row.symmetric.points())?;
        write_block(&mut sym_closest, &row.symmetric.closest())?;
    }
    for file in [
        &mut asym_points,
        &mut asym_closest,
        &mut sym_points,
        &mut sym_closest,
    ] {
        file.flush()?;
    }
    info!(dir = %dir.display(), "separation blocks written");
    Ok(())
}

fn report_error(global: &GlobalOpts, err: &Error, code: ExitCode) {
    match global.format {
        OutputFormat::Json => {
            let mut structured = StructuredError::from(err);
            structured
                .context
                .insert("exit_code".to_string(), serde_json::json!(code.code_name()));
            eprintln!("{}", structured.to_json());
        }
        OutputFormat::Tsv => {
            eprintln!("✗ {}", err.headline());
            eprintln!("  Reason: {}", err);
            eprintln!("  Fix: {}", err.remediation());
        }
    }
}
