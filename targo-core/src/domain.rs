// targo_core/src/domain.rs
use std::fs::FileType;
use std::path::{Path, PathBuf};

use tar::EntryType;

/// What a filesystem object or archive record is, as far as targo cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Regular,
    Symlink,
    /// Pipes, sockets, devices on the way in; metadata-only records on the way out.
    Unsupported,
}

impl EntryKind {
    /// Classify an lstat'ed file type. Never follows links.
    pub fn from_file_type(ft: FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::Regular
        } else {
            EntryKind::Unsupported
        }
    }

    /// Classify an archive record. Anything that is not a directory, a
    /// symlink or a pax global header is extracted as a regular file.
    pub fn from_entry_type(et: EntryType) -> Self {
        match et {
            EntryType::Directory => EntryKind::Directory,
            EntryType::Symlink => EntryKind::Symlink,
            EntryType::XGlobalHeader => EntryKind::Unsupported,
            _ => EntryKind::Regular,
        }
    }

    /// Like [`EntryKind::from_entry_type`], but also honors the pre-POSIX
    /// convention of marking directories with a trailing `/` on a plain
    /// file record.
    pub fn from_record(et: EntryType, name: &Path) -> Self {
        match Self::from_entry_type(et) {
            EntryKind::Regular if name.as_os_str().as_encoded_bytes().ends_with(b"/") => {
                EntryKind::Directory
            }
            kind => kind,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Directory => "dir",
            EntryKind::Regular => "file",
            EntryKind::Symlink => "link",
            EntryKind::Unsupported => "other",
        }
    }
}

/// One header as read back from an archive by [`crate::list`].
#[derive(Clone, Debug)]
pub struct ListedEntry {
    pub name: String,
    pub kind: EntryKind,
    pub mode: u32,
    pub size: u64,
    pub link_target: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn classifies_without_following_links() {
        let td = tempfile::tempdir().unwrap();
        let dir = td.path().join("d");
        let file = td.path().join("f");
        fs::create_dir(&dir).unwrap();
        fs::write(&file, b"x").unwrap();

        let kind = |p: &std::path::Path| {
            EntryKind::from_file_type(fs::symlink_metadata(p).unwrap().file_type())
        };
        assert_eq!(kind(&dir), EntryKind::Directory);
        assert_eq!(kind(&file), EntryKind::Regular);

        #[cfg(unix)]
        {
            let link = td.path().join("l");
            std::os::unix::fs::symlink(&dir, &link).unwrap();
            assert_eq!(kind(&link), EntryKind::Symlink);
        }
    }

    #[test]
    fn foreign_record_types_extract_as_files() {
        assert_eq!(EntryKind::from_entry_type(EntryType::Directory), EntryKind::Directory);
        assert_eq!(EntryKind::from_entry_type(EntryType::Symlink), EntryKind::Symlink);
        assert_eq!(EntryKind::from_entry_type(EntryType::Regular), EntryKind::Regular);
        assert_eq!(EntryKind::from_entry_type(EntryType::Link), EntryKind::Regular);
        assert_eq!(EntryKind::from_entry_type(EntryType::Fifo), EntryKind::Regular);
        assert_eq!(
            EntryKind::from_entry_type(EntryType::XGlobalHeader),
            EntryKind::Unsupported
        );
    }

    #[test]
    fn legacy_slash_marks_directories() {
        assert_eq!(
            EntryKind::from_record(EntryType::Regular, Path::new("old/")),
            EntryKind::Directory
        );
        assert_eq!(
            EntryKind::from_record(EntryType::Regular, Path::new("old")),
            EntryKind::Regular
        );
        assert_eq!(
            EntryKind::from_record(EntryType::Symlink, Path::new("ln/")),
            EntryKind::Symlink
        );
    }
}
