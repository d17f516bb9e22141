//! Cardfolio - Command-line tool for rendering collection gallery sheets

use std::process::ExitCode;

use cardfolio::cli;

fn main() -> ExitCode {
    cli::run()
}
