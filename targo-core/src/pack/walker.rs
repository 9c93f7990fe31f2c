use std::ffi::OsString;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::EntryKind;
use crate::pack::link::link_target;

/// A filesystem object that will become one archive record.
#[derive(Debug)]
pub struct SourceEntry {
    /// Where it lives on disk.
    pub path: PathBuf,
    /// Name inside the archive; directories end in `/`.
    pub name: PathBuf,
    pub kind: EntryKind,
    pub metadata: Metadata,
    /// Only set for symlinks.
    pub link_target: Option<PathBuf>,
}

/// Why an object was left out of the archive.
#[derive(Debug)]
pub enum Skipped {
    Unsupported(PathBuf),
    Unreadable {
        path: Option<PathBuf>,
        source: walkdir::Error,
    },
    UnreadableLink(PathBuf),
}

/// Walk errors never abort the build: they surface here as `Skip`, while the
/// writer propagates its own errors with `?`.
#[derive(Debug)]
pub enum Step {
    Emit(SourceEntry),
    Skip(Skipped),
}

pub struct Walker {
    inner: walkdir::IntoIter,
    base: PathBuf,
}

/// Depth-first walk of `src`, parents first, siblings sorted by file name.
///
/// With a trailing separator (or a root without a final component such as
/// `.`), only the contents are walked and become top-level entries. Otherwise
/// the root itself is the single top-level entry.
pub fn walk(src: &Path) -> Walker {
    let contents_only = has_trailing_separator(src) || src.file_name().is_none();
    let (base, min_depth) = if contents_only {
        (src.to_path_buf(), 1)
    } else {
        (src.parent().map(Path::to_path_buf).unwrap_or_default(), 0)
    };
    let inner = WalkDir::new(src)
        .follow_links(false)
        .min_depth(min_depth)
        .sort_by_file_name()
        .into_iter();
    Walker { inner, base }
}

impl Iterator for Walker {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let entry = match self.inner.next()? {
            Ok(e) => e,
            Err(source) => {
                let path = source.path().map(Path::to_path_buf);
                return Some(Step::Skip(Skipped::Unreadable { path, source }));
            }
        };

        let kind = EntryKind::from_file_type(entry.file_type());
        let target = match kind {
            EntryKind::Unsupported => {
                return Some(Step::Skip(Skipped::Unsupported(entry.into_path())));
            }
            EntryKind::Symlink => match link_target(entry.path()) {
                Some(t) => Some(t),
                None => return Some(Step::Skip(Skipped::UnreadableLink(entry.into_path()))),
            },
            EntryKind::Directory | EntryKind::Regular => None,
        };

        let metadata = match entry.metadata() {
            Ok(md) => md,
            Err(source) => {
                let path = Some(entry.into_path());
                return Some(Step::Skip(Skipped::Unreadable { path, source }));
            }
        };

        let rel = entry.path().strip_prefix(&self.base).unwrap_or(entry.path());
        let name = archive_name(rel, kind);
        Some(Step::Emit(SourceEntry {
            path: entry.into_path(),
            name,
            kind,
            metadata,
            link_target: target,
        }))
    }
}

fn has_trailing_separator(p: &Path) -> bool {
    p.as_os_str()
        .as_encoded_bytes()
        .last()
        .is_some_and(|b| std::path::is_separator(*b as char))
}

fn archive_name(rel: &Path, kind: EntryKind) -> PathBuf {
    let mut name = OsString::from(rel.as_os_str());
    if kind == EntryKind::Directory {
        name.push("/");
    }
    PathBuf::from(name)
}
