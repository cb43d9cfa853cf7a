//! Binary crate for the `metar` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Mapping failures to process exit statuses
//! - Wiring stdout/stderr into a fetch session

use std::process::ExitCode;

use metar_core::PROGRAM_NAME;

mod cli;
mod exit;
mod logging;

fn main() -> ExitCode {
    logging::init();

    let cmd = match cli::Cli::parse_or_status(std::env::args_os(), &mut std::io::stderr()) {
        Ok(cmd) => cmd,
        Err(status) => return ExitCode::from(status),
    };

    // One request in flight at a time, so a current-thread runtime is enough.
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("{PROGRAM_NAME}: failed to start async runtime: {err}");
            return ExitCode::from(exit::EX_SOFTWARE);
        }
    };

    ExitCode::from(runtime.block_on(cmd.run()))
}
