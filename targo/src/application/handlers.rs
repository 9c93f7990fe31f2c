use std::path::PathBuf;

use targo_core::error::Result;
use targo_core::{
    CreateOptions, EntryKind, create_in_place, create_with, extract, extract_in_place, list,
};

pub fn handle_create(out: PathBuf, dir: PathBuf, deterministic: bool) -> Result<()> {
    let opts = CreateOptions { deterministic };
    create_with(&out, &dir, &opts)?;
    eprintln!("create: {} -> {}", dir.display(), out.display());
    Ok(())
}

pub fn handle_extract(archive: PathBuf, dest: PathBuf) -> Result<()> {
    extract(&dest, &archive)?;
    eprintln!("extract: {} -> {}", archive.display(), dest.display());
    Ok(())
}

pub fn handle_list(archive: PathBuf, long: bool) -> Result<()> {
    let entries = list(&archive)?;
    if long {
        for e in entries {
            match (e.kind, e.link_target) {
                (EntryKind::Symlink, Some(t)) => println!(
                    "{:<5} {:>6o}  {:>12}  {} -> {}",
                    e.kind.as_str(),
                    e.mode,
                    e.size,
                    e.name,
                    t.display()
                ),
                _ => println!(
                    "{:<5} {:>6o}  {:>12}  {}",
                    e.kind.as_str(),
                    e.mode,
                    e.size,
                    e.name
                ),
            }
        }
    } else {
        for e in entries {
            println!("{}", e.name);
        }
    }
    Ok(())
}

pub fn handle_create_in_place(dir: PathBuf) -> Result<()> {
    create_in_place(&dir)?;
    eprintln!("inplace create: {}", dir.display());
    Ok(())
}

pub fn handle_extract_in_place(archive: PathBuf) -> Result<()> {
    extract_in_place(&archive)?;
    eprintln!("inplace extract: {}", archive.display());
    Ok(())
}
