use std::process::ExitCode;

use clap::Parser;
use mismatch_lint::cli::{self, Cli};
use mismatch_lint::observability;

fn main() -> ExitCode {
    let cli = Cli::parse();
    observability::init_logging(cli.verbose);

    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", console::style("error:").red().bold());
            ExitCode::from(2)
        }
    }
}
