//! Tokensync - Command-line tool for syncing Figma design tokens into CSS and JS

use std::process::ExitCode;

use tokensync::cli;

fn main() -> ExitCode {
    cli::run()
}
