use crate::error::{Result, TargoError};
use crate::pack::writer::create;
use crate::read::extract::extract;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Suffix appended to a directory name by [`create_in_place`].
pub const ARCHIVE_SUFFIX: &str = ".tar";

/// Archive `dir` into `dir` + [`ARCHIVE_SUFFIX`], then remove `dir`.
///
/// On failure the source directory is left alone, though a partial archive
/// may remain next to it.
pub fn create_in_place(dir: &Path) -> Result<()> {
    let archive = archive_path_for(dir);
    create(&archive, dir)?;
    fs::remove_dir_all(dir)?;
    info!(archive = %archive.display(), removed = %dir.display(), "created in place");
    Ok(())
}

/// Extract `archive` next to itself, then remove it.
///
/// The archive must have a file extension: `/x/y.tar` is extracted into `/x`.
pub fn extract_in_place(archive: &Path) -> Result<()> {
    let dest = extract_dest_for(archive)?;
    extract(&dest, archive)?;
    fs::remove_file(archive)?;
    info!(dest = %dest.display(), removed = %archive.display(), "extracted in place");
    Ok(())
}

/// `dir` without trailing separators, plus the archive suffix. Stripping keeps
/// `y/` from producing `y/.tar` inside the tree about to be removed.
pub fn archive_path_for(dir: &Path) -> PathBuf {
    let mut name = dir.components().collect::<PathBuf>().into_os_string();
    name.push(ARCHIVE_SUFFIX);
    PathBuf::from(name)
}

/// Directory an in-place extraction writes into: the parent of `archive`.
///
/// The file name must carry an extension, which is everything from its last
/// `.` on. Dot-files count, so `/x/.tar` extracts into `/x`.
pub fn extract_dest_for(archive: &Path) -> Result<PathBuf> {
    let has_ext = archive
        .file_name()
        .is_some_and(|n| n.as_encoded_bytes().contains(&b'.'));
    if !has_ext {
        return Err(TargoError::InvalidArgument(format!(
            "expected a file extension ({})",
            archive.display()
        )));
    }
    // stripping the extension never changes which directory the name lives in
    let dest = match archive.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(dest)
}
