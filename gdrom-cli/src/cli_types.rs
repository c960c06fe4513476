//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gdrom")]
#[command(about = "Inspect and convert Dreamcast GD-ROM images", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the track layout and boot metadata of an image
    Info {
        /// Directory or .zip archive holding the image
        path: PathBuf,

        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Copy an image, converting redump-style track layouts
    Convert {
        /// Directory or .zip archive holding the image
        src: PathBuf,

        /// Destination directory, or a .zip archive to create
        dst: PathBuf,

        /// Name tracks trackNN.raw / trackNN.bin for GDEMU
        #[arg(long)]
        gdemu: bool,

        /// Write the GDI file without column alignment
        #[arg(long)]
        trim: bool,

        /// Name of the GDI file to write
        #[arg(long, value_name = "NAME", conflicts_with = "no_gdi_file")]
        gdi_file: Option<String>,

        /// Do not write a GDI file
        #[arg(long)]
        no_gdi_file: bool,
    },
}
