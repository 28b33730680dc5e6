// crates/collect_content/src/lib.rs

//! Gathers the material a prompt is built from: file contents, directory
//! listings, repository state and captured command output.

mod directory;
mod files;
mod fix;
mod git;
mod language;

pub use directory::{list_directory, DirectoryStrategy};
pub use files::{collect_files, FileInfo, SizeLimits};
pub use fix::{read_fix_file, FixInfo};
pub use git::{git_info, git_root, GitInfo};
pub use language::language_for_path;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("total content size {total} bytes exceeds max_total_bytes ({limit})")]
    TotalLimit { total: u64, limit: u64 },

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("fix file not found: {0}")]
    FixNotFound(PathBuf),

    #[error("fix file is empty: {0}")]
    FixEmpty(PathBuf),
}

impl CollectError {
    /// The file or directory the error is about, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            CollectError::NotFound(path)
            | CollectError::FixNotFound(path)
            | CollectError::FixEmpty(path)
            | CollectError::Read { path, .. } => Some(path.as_path()),
            CollectError::Walk(err) => err.path(),
            CollectError::TotalLimit { .. } => None,
        }
    }
}
