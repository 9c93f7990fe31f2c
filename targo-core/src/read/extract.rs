use crate::domain::EntryKind;
use crate::error::{Result, TargoError};

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tar::{Archive, Entry};
use tracing::{debug, warn};

/// Unpack the tar archive at `archive` under `dest`, creating `dest` first.
///
/// Records are processed strictly in stream order. A failure to create a
/// directory or file aborts and leaves whatever was extracted so far; a
/// failure to create a symlink is logged and extraction continues. Records
/// whose path runs through a symlink extracted earlier are refused.
pub fn extract(dest: &Path, archive: &Path) -> Result<()> {
    if fs::metadata(archive)?.is_dir() {
        return Err(TargoError::IsADirectory(archive.to_path_buf()));
    }

    fs::create_dir_all(dest)?;

    let f = File::open(archive)?;
    let mut ar = Archive::new(f);
    // normalized names of symlinks created so far
    let mut links: HashSet<PathBuf> = HashSet::new();

    for entry in ar.entries()? {
        let mut entry = entry?;
        let rel = entry.path()?.into_owned();
        let kind = EntryKind::from_record(entry.header().entry_type(), &rel);
        let outp = safe_join(dest, &rel)?;
        let norm = normalized(&rel);
        if let Some(link) = norm.ancestors().skip(1).find(|a| links.contains(*a)) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{} would be written through symlink {}",
                    rel.display(),
                    link.display()
                ),
            )
            .into());
        }

        match kind {
            EntryKind::Directory => {
                let mode = entry.header().mode()?;
                create_dir(&outp, mode)?;
            }
            EntryKind::Symlink => {
                let target = entry
                    .link_name()?
                    .map(|t| t.into_owned())
                    .unwrap_or_default();
                if let Err(e) = symlink(&target, &outp) {
                    warn!(path = %outp.display(), target = %target.display(), error = %e,
                        "could not create symlink");
                    continue;
                }
                links.insert(norm);
            }
            EntryKind::Regular => {
                write_file(&outp, &mut entry)?;
            }
            EntryKind::Unsupported => {
                debug!(name = %rel.display(), "skipping metadata record");
                continue;
            }
        }
        debug!(name = %rel.display(), kind = kind.as_str(), "extracted");
    }

    Ok(())
}

/// Join an archive name onto `root`, refusing names that could land outside it.
fn safe_join(root: &Path, rel: &Path) -> Result<PathBuf> {
    let escapes = rel.components().any(|c| {
        matches!(
            c,
            Component::Prefix(_) | Component::RootDir | Component::ParentDir
        )
    });
    if escapes || rel.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsafe path in archive: {}", rel.display()),
        )
        .into());
    }
    Ok(root.join(rel))
}

/// Only the normal components; `safe_join` already refused everything else.
fn normalized(rel: &Path) -> PathBuf {
    rel.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn create_dir(path: &Path, _mode: u32) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(_mode & 0o7777);
    }
    builder.create(path)
}

fn write_file<R: Read>(path: &Path, entry: &mut Entry<'_, R>) -> io::Result<()> {
    let mut out = File::create(path)?;
    let want = entry.header().size()?;
    let got = io::copy(entry, &mut out)?;
    if got != want {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("{}: expected {want} bytes, got {got}", path.display()),
        ));
    }
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::ErrorKind::Unsupported.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_join_accepts_nested_and_dot_names() {
        let root = Path::new("/dest");
        assert_eq!(
            safe_join(root, Path::new("a/b/")).unwrap(),
            PathBuf::from("/dest/a/b/")
        );
        assert_eq!(
            safe_join(root, Path::new("./a")).unwrap(),
            PathBuf::from("/dest/./a")
        );
    }

    #[test]
    fn safe_join_rejects_escaping_names() {
        let root = Path::new("/dest");
        for bad in ["/etc/passwd", "../up", "a/../../up", ""] {
            let err = safe_join(root, Path::new(bad)).unwrap_err();
            assert!(
                matches!(err, TargoError::Io(ref e) if e.kind() == io::ErrorKind::InvalidData),
                "{bad:?} was accepted"
            );
        }
    }

    #[test]
    fn refuses_directory_archive() {
        let td = tempfile::tempdir().unwrap();
        let err = extract(&td.path().join("out"), td.path()).unwrap_err();
        assert!(matches!(err, TargoError::IsADirectory(_)));
        assert!(!td.path().join("out").exists());
    }

    #[test]
    fn missing_archive_is_io_error() {
        let td = tempfile::tempdir().unwrap();
        let err = extract(&td.path().join("out"), &td.path().join("nope.tar")).unwrap_err();
        assert!(matches!(err, TargoError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn creates_destination_with_ancestors() {
        let td = tempfile::tempdir().unwrap();
        let archive = td.path().join("empty.tar");
        tar::Builder::new(File::create(&archive).unwrap())
            .into_inner()
            .unwrap();

        let dest = td.path().join("a/b/c");
        extract(&dest, &archive).unwrap();
        assert!(dest.is_dir());
        // idempotent for an already existing destination
        extract(&dest, &archive).unwrap();
    }
}
