//! gdrom CLI
//!
//! Command-line interface for inspecting and converting Dreamcast GD-ROM
//! images.

mod cli_types;
mod commands;
mod error;
mod spinner;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;

use cli_types::{Cli, Commands};
use commands::convert::{ConvertArgs, run_convert};
use commands::info::run_info;
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logger(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Info { path, json } => run_info(&path, json),
        Commands::Convert {
            src,
            dst,
            gdemu,
            trim,
            gdi_file,
            no_gdi_file,
        } => run_convert(ConvertArgs {
            src,
            dst,
            gdemu,
            trim,
            gdi_file,
            no_gdi_file,
            quiet: cli.quiet,
        }),
    };

    if let Err(e) = result {
        log::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Plain messages on stderr. `RUST_LOG` overrides the level picked here.
fn init_logger(quiet: bool, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}
