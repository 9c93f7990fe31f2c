pub mod handlers;

use crate::presentation::cli::{Cli, Commands, InPlaceCommands};
use targo_core::error::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Create {
            out,
            dir,
            deterministic,
        } => handlers::handle_create(out, dir, deterministic),
        Commands::Extract { archive, dest } => handlers::handle_extract(archive, dest),
        Commands::List { archive, long } => handlers::handle_list(archive, long),
        Commands::Inplace(cmd) => match cmd {
            InPlaceCommands::Create { dir } => handlers::handle_create_in_place(dir),
            InPlaceCommands::Extract { archive } => handlers::handle_extract_in_place(archive),
        },
    }
}
