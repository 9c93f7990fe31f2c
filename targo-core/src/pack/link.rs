use std::fs;
use std::path::{Path, PathBuf};

type Attempt = fn(&Path) -> Option<PathBuf>;

/// Tried in order; the first one that yields a target wins.
const ATTEMPTS: [Attempt; 2] = [resolved_relative, raw_link_text];

/// Target to record for the symlink at `link`.
///
/// Prefers the fully resolved target re-expressed relative to the link's own
/// directory, so the archive stays self-contained when the tree is moved.
/// Broken links (or anything that cannot be relativized) fall back to the
/// link text as stored on disk. `None` means the link could not even be read.
pub fn link_target(link: &Path) -> Option<PathBuf> {
    ATTEMPTS.iter().find_map(|attempt| attempt(link))
}

fn resolved_relative(link: &Path) -> Option<PathBuf> {
    let target = fs::canonicalize(link).ok()?;
    let dir = match link.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir = fs::canonicalize(dir).ok()?;
    let rel = pathdiff::diff_paths(&target, &dir)?;
    if rel.as_os_str().is_empty() {
        // link points at its own directory
        return Some(PathBuf::from("."));
    }
    Some(rel)
}

fn raw_link_text(link: &Path) -> Option<PathBuf> {
    fs::read_link(link).ok()
}
