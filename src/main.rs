//! Binary entrypoint for the `projspec` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env is fine; the store root and log filter have defaults.
    let _ = dotenvy::dotenv();
    match projspec::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
