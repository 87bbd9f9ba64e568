#![allow(clippy::print_stderr)]

use clap::Parser;
use colored::Colorize;
use std::io::IsTerminal;

use esup_cli::args::CliArgs;
use esup_cli::driver::{self, EXIT_FAILURE};

fn main() {
    // Initialize tracing if ESUP_LOG or RUST_LOG is set (zero cost otherwise).
    esup_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();

    if let Err(err) = driver::run(&args, &mut stdin, &mut stdout) {
        let label = if std::io::stderr().is_terminal() {
            "Error:".red().bold().to_string()
        } else {
            "Error:".to_string()
        };
        eprintln!("{label} {err:#}");
        std::process::exit(EXIT_FAILURE);
    }
}
