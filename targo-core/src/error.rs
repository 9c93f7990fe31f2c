use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TargoError {
    #[error("given path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("given path is a directory: {}", .0.display())]
    IsADirectory(PathBuf),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, TargoError>;
