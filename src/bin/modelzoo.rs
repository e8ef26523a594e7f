use std::{path::PathBuf, process::ExitCode};

use clap::Parser;

use modelzoo::{ValidateOptions, validate_catalog};

#[derive(Parser, Debug)]
#[command(name = "modelzoo", version, about = "Validate a model catalog tree")]
struct Cli {
    /// Also attempt to deserialize each model artifact.
    #[arg(long)]
    strict: bool,

    /// Catalog root (defaults to the current directory).
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            // Fatal sweep errors (missing models/ dir, I/O) share the
            // one-line-per-error output contract.
            println!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let opts = ValidateOptions { strict: cli.strict };
    let report = validate_catalog(&cli.root, &opts)?;

    if report.is_valid() {
        println!("OK: catalog validation passed");
        return Ok(true);
    }
    for error in report.errors() {
        println!("ERROR: {error}");
    }
    Ok(false)
}
