#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, PartialEq, Eq)]
pub enum Node {
    Dir,
    File(Vec<u8>),
    Link(PathBuf),
}

/// Everything below `root` keyed by relative path, links not followed.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Node> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            let ft = e.file_type();
            let node = if ft.is_symlink() {
                Node::Link(fs::read_link(e.path()).unwrap())
            } else if ft.is_dir() {
                Node::Dir
            } else {
                Node::File(fs::read(e.path()).unwrap())
            };
            (rel, node)
        })
        .collect()
}

/// A small tree under `parent/name`: files of assorted sizes, nested
/// directories and relative symlinks.
pub fn sample_tree(parent: &Path, name: &str) -> PathBuf {
    let root = parent.join(name);
    fs::create_dir_all(root.join("sub/deeper")).unwrap();
    fs::create_dir_all(root.join("empty_dir")).unwrap();
    fs::write(root.join("a.txt"), b"Hello, this is the first file.\n").unwrap();
    fs::write(root.join("empty.bin"), b"").unwrap();
    let big: Vec<u8> = (0..1500u32).map(|i| (i % 251) as u8).collect();
    fs::write(root.join("sub/big.dat"), big).unwrap();
    fs::write(root.join("sub/deeper/c.txt"), b"c").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::symlink;
        symlink("sub/deeper/c.txt", root.join("to_c")).unwrap();
        symlink("sub", root.join("to_sub")).unwrap();
        symlink("../a.txt", root.join("sub/up_a")).unwrap();
    }
    root
}

pub fn names(archive: &Path) -> Vec<String> {
    targo_core::list(archive)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect()
}
