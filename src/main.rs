//! yaml-tmpl CLI entry point
//!
//! Parses the command line, runs the requested command and turns any failure into a
//! coloured error message with an exit status of 1.

use anyhow::Result;
use clap::Parser;
use yaml_tmpl::cli;
use yaml_tmpl::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
