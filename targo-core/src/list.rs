use crate::domain::{EntryKind, ListedEntry};
use crate::error::{Result, TargoError};
use std::fs::{self, File};
use std::path::Path;
use tar::Archive;

/// Read every header of `archive` in stream order without extracting anything.
pub fn list(archive: &Path) -> Result<Vec<ListedEntry>> {
    if fs::metadata(archive)?.is_dir() {
        return Err(TargoError::IsADirectory(archive.to_path_buf()));
    }
    let mut ar = Archive::new(File::open(archive)?);
    let mut out = Vec::new();
    for entry in ar.entries()? {
        let entry = entry?;
        let path = entry.path()?;
        let kind = EntryKind::from_record(entry.header().entry_type(), &path);
        let name = path.to_string_lossy().into_owned();
        let link_target = match kind {
            EntryKind::Symlink => entry.link_name()?.map(|t| t.into_owned()),
            _ => None,
        };
        out.push(ListedEntry {
            name,
            kind,
            mode: entry.header().mode()?,
            size: entry.header().size()?,
            link_target,
        });
    }
    Ok(out)
}
