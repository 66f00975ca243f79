mod app;
mod banner;
mod cli;
mod commands;
mod config;
mod fetcher;
mod model;
mod provider;
mod render;
mod session;
mod theme;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::prelude::*;

fn default_filter(verbose: u8, quiet: bool) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    format!("warn,improv={level}")
}

fn init_tracing(verbose: u8, quiet: bool) {
    // RUST_LOG wins over the verbosity flags.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbose, quiet).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
