use crate::domain::EntryKind;
use crate::error::{Result, TargoError};
use crate::pack::walker::{SourceEntry, Skipped, Step, walk};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use tar::{Builder, EntryType, Header, HeaderMode};
use tracing::{debug, warn};

#[derive(Clone, Debug, Default)]
pub struct CreateOptions {
    /// When true, write fixed mtime/uid/gid and normalized permissions so
    /// identical trees produce byte-identical archives.
    pub deterministic: bool,
}

/// Reads exactly `remaining` bytes from the inner reader, failing if it ends
/// early. The header already promised that many bytes.
struct ExactReader<R: Read> {
    inner: R,
    remaining: u64,
}
impl<R: Read> ExactReader<R> {
    fn new(inner: R, len: u64) -> Self {
        Self {
            inner,
            remaining: len,
        }
    }
}
impl<R: Read> Read for ExactReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let want = buf.len().min(self.remaining.min(usize::MAX as u64) as usize);
        let n = self.inner.read(&mut buf[..want])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file shrank while being archived",
            ));
        }
        self.remaining -= n as u64;
        Ok(n)
    }
}

fn mode_from(_md: &fs::Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        _md.permissions().mode() & 0o7777
    }
    #[cfg(not(unix))]
    {
        if _md.is_dir() { 0o755 } else { 0o644 }
    }
}

/// Raw bytes of an archive name, `/`-separated.
fn name_bytes(p: &Path) -> Vec<u8> {
    let mut b = p.as_os_str().as_encoded_bytes().to_vec();
    if cfg!(windows) {
        for c in b.iter_mut().filter(|c| **c == b'\\') {
            *c = b'/';
        }
    }
    b
}

fn fill_truncated(slot: &mut [u8], bytes: &[u8]) {
    slot.fill(0);
    let n = bytes.len().min(slot.len());
    slot[..n].copy_from_slice(&bytes[..n]);
}

/// Build a tar archive at `dest` from the directory `src`.
///
/// A trailing separator on `src` puts the directory's contents at the archive
/// root; without one the directory itself is the single top-level entry.
pub fn create(dest: &Path, src: &Path) -> Result<()> {
    create_with(dest, src, &CreateOptions::default())
}

pub fn create_with(dest: &Path, src: &Path, opts: &CreateOptions) -> Result<()> {
    if !fs::metadata(src)?.is_dir() {
        return Err(TargoError::NotADirectory(src.to_path_buf()));
    }

    let out = File::create(dest)?;
    let mut builder = Builder::new(out);

    for step in walk(src) {
        match step {
            Step::Emit(entry) => append_entry(&mut builder, &entry, opts)?,
            Step::Skip(skipped) => log_skip(&skipped),
        }
    }

    // end-of-archive blocks
    builder.into_inner()?.flush()?;
    Ok(())
}

fn append_entry<W: Write>(
    builder: &mut Builder<W>,
    entry: &SourceEntry,
    opts: &CreateOptions,
) -> Result<()> {
    let (entry_type, size) = match entry.kind {
        EntryKind::Directory => (EntryType::Directory, 0),
        EntryKind::Symlink => (EntryType::Symlink, 0),
        EntryKind::Regular => (EntryType::Regular, entry.metadata.len()),
        EntryKind::Unsupported => return Ok(()),
    };

    let mut header = Header::new_ustar();
    if opts.deterministic {
        header.set_metadata_in_mode(&entry.metadata, HeaderMode::Deterministic);
    } else {
        header.set_metadata_in_mode(&entry.metadata, HeaderMode::Complete);
        header.set_mode(mode_from(&entry.metadata));
    }
    header.set_entry_type(entry_type);
    header.set_size(size);

    // Anything that does not fit the ustar fields travels in a pax record.
    let mut pax: Vec<(&str, Vec<u8>)> = Vec::new();
    if header.set_path(&entry.name).is_err() {
        let bytes = name_bytes(&entry.name);
        if let Some(ustar) = header.as_ustar_mut() {
            // a failed split may have left half the name here
            ustar.prefix.fill(0);
        }
        fill_truncated(&mut header.as_old_mut().name, &bytes);
        pax.push(("path", bytes));
    }
    if let Some(target) = &entry.link_target {
        let bytes = name_bytes(target);
        // set_link_name rebuilds the text from components, dropping `.` and `//`
        let verbatim = header.set_link_name(target).is_ok()
            && header.link_name_bytes().as_deref() == Some(bytes.as_slice());
        if !verbatim {
            fill_truncated(&mut header.as_old_mut().linkname, &bytes);
            pax.push(("linkpath", bytes));
        }
    }
    if !pax.is_empty() {
        builder.append_pax_extensions(pax.iter().map(|(k, v)| (*k, v.as_slice())))?;
    }
    header.set_cksum();

    match entry.kind {
        EntryKind::Regular => {
            let f = File::open(&entry.path)?;
            builder.append(&header, ExactReader::new(f, size))?;
        }
        _ => builder.append(&header, io::empty())?,
    }
    debug!(name = %entry.name.display(), kind = entry.kind.as_str(), size, "archived");
    Ok(())
}

fn log_skip(skipped: &Skipped) {
    match skipped {
        Skipped::Unsupported(path) => {
            debug!(path = %path.display(), "skipping unsupported file type")
        }
        Skipped::Unreadable { path, source } => match path {
            Some(p) => warn!(path = %p.display(), error = %source, "skipping unreadable entry"),
            None => warn!(error = %source, "skipping unreadable entry"),
        },
        Skipped::UnreadableLink(path) => {
            warn!(path = %path.display(), "skipping symlink that cannot be read")
        }
    }
}
