use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "targo: directory trees to tar archives and back", long_about = None)]
pub struct Cli {
    /// Log every archived/extracted entry (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum InPlaceCommands {
    /// Archive DIR into DIR.tar and remove DIR
    Create { dir: PathBuf },
    /// Extract ARCHIVE next to itself and remove ARCHIVE
    Extract { archive: PathBuf },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a tar archive from a directory.
    /// A trailing `/` on DIR stores only its contents.
    Create {
        out: PathBuf,
        dir: PathBuf,

        /// Fixed timestamps and ownership for reproducible output
        #[arg(long)]
        deterministic: bool,
    },

    /// Extract an archive into a destination directory
    Extract { archive: PathBuf, dest: PathBuf },

    /// List archive contents
    List {
        archive: PathBuf,

        /// show kind, mode and size
        #[arg(long)]
        long: bool,
    },

    #[command(subcommand)]
    /// Create or extract, replacing the source
    Inplace(InPlaceCommands),
}
