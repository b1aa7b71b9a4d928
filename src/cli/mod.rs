//! Command-line interface.
//!
//! `mismatch-lint check <paths…>` scans Java sources and prints findings;
//! `mismatch-lint config` prints the configuration that would apply.

pub mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{self, LintConfig};
use crate::engine::CancellationToken;
use crate::error::{MismatchError, Result};
use crate::scan::{ScanOptions, ScanPipeline};

/// Find Java containers that are only ever queried or only ever updated.
#[derive(Debug, Parser)]
#[command(name = "mismatch-lint", version, about)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check Java files or directories
    Check(CheckArgs),
    /// Print the effective configuration as YAML
    Config {
        /// Project root used for config discovery
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Explicit config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Files or directories to check
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Config file (default: discovered from the first path)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Walk every occurrence even after both roles are seen
    #[arg(long)]
    pub no_early_exit: bool,

    /// Cancel the scan after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Worker threads (default: one per core)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Check files one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Exit status: 0 when clean, 1 when findings were reported.
pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Check(args) => Ok(if check(&args)? {
            ExitCode::from(1)
        } else {
            ExitCode::SUCCESS
        }),
        Command::Config { root, config } => {
            let config = resolve_config(config.as_deref(), &root)?;
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Run a scan and print the results. `Ok(true)` when anything was found.
fn check(args: &CheckArgs) -> Result<bool> {
    let root = args
        .paths
        .first()
        .map(|p| project_root(p))
        .unwrap_or_else(|| PathBuf::from("."));
    let config = resolve_config(args.config.as_deref(), &root)?;
    let options = scan_options(args, &config);

    let mut pipeline = ScanPipeline::new(&config, options)?;
    let show_progress =
        !args.no_progress && args.format == OutputFormat::Text && console::Term::stderr().is_term();
    if show_progress {
        pipeline = pipeline.with_progress(progress_bar());
    }

    let cancel = CancellationToken::new();
    if let Some(secs) = args.timeout_secs {
        let timer = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            timer.cancel();
        });
    }

    let result = match pipeline.run(&args.paths, &cancel) {
        Err(MismatchError::Cancelled) if args.timeout_secs.is_some() => {
            return Err(MismatchError::Other(format!(
                "scan timed out after {}s",
                args.timeout_secs.unwrap_or_default()
            )));
        }
        other => other?,
    };

    match args.format {
        OutputFormat::Text => print!("{}", output::render_text(&result)),
        OutputFormat::Json => println!("{}", output::render_json(&result)?),
    }
    Ok(result.has_findings())
}

/// Options from the config file, overridden by flags.
fn scan_options(args: &CheckArgs, config: &LintConfig) -> ScanOptions {
    let mut options = ScanOptions::from_config(config);
    if args.no_early_exit {
        options.early_exit = false;
    }
    if args.sequential {
        options.parallel = false;
    }
    options.jobs = args.jobs;
    options
}

fn resolve_config(explicit: Option<&Path>, root: &Path) -> Result<LintConfig> {
    match explicit {
        Some(path) => config::load(path),
        None => config::discover(root),
    }
}

/// Directory used for config discovery: the path itself, or a file's parent.
fn project_root(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        path.to_path_buf()
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} files [{elapsed_precise}]")
    {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
