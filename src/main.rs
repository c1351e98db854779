use std::process::ExitCode;

use clap::Parser;
use defectql::cli::CliArgs;

fn main() -> ExitCode {
    match defectql::run(CliArgs::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("defectql: {err:#}");
            ExitCode::FAILURE
        }
    }
}
