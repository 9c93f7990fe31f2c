#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod inplace;

pub mod pack {
    pub mod link;
    pub mod walker;
    pub mod writer;
}

pub mod read {
    pub mod extract;
}

pub mod list;

// Re-exports: stable API surface
pub use domain::{EntryKind, ListedEntry};
pub use error::{Result, TargoError};
pub use inplace::{ARCHIVE_SUFFIX, create_in_place, extract_in_place};
pub use list::list;
pub use pack::writer::{CreateOptions, create, create_with};
pub use read::extract::extract;
