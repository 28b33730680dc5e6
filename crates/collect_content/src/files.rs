// crates/collect_content/src/files.rs

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::language::language_for_path;
use crate::CollectError;

/// One file included in the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileInfo {
    pub path: String,
    pub content: String,
    pub size: u64,
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub max_file_size: u64,
    pub max_total: u64,
    pub allow_oversize: bool,
}

impl SizeLimits {
    /// Negative limits clamp to zero.
    pub fn new(max_file_size_bytes: i64, max_total_bytes: i64, allow_oversize: bool) -> Self {
        Self {
            max_file_size: u64::try_from(max_file_size_bytes).unwrap_or(0),
            max_total: u64::try_from(max_total_bytes).unwrap_or(0),
            allow_oversize,
        }
    }
}

/// Reads every path into a [`FileInfo`], honouring `limits`.
///
/// Oversized and binary files are skipped with a warning. Going past the
/// total budget is an error unless oversize content is allowed.
pub fn collect_files(paths: &[PathBuf], limits: &SizeLimits) -> Result<Vec<FileInfo>, CollectError> {
    let mut collected = Vec::new();
    let mut total: u64 = 0;

    for path in paths {
        let metadata = fs::metadata(path).map_err(|source| read_error(path, source))?;
        if metadata.is_dir() {
            log::warn!("skipping directory {} (use --directory)", path.display());
            continue;
        }

        let size = metadata.len();
        if size > limits.max_file_size && !limits.allow_oversize {
            log::warn!(
                "skipping {}: {} bytes exceeds max_file_size_bytes ({})",
                path.display(),
                size,
                limits.max_file_size
            );
            continue;
        }

        let bytes = fs::read(path).map_err(|source| read_error(path, source))?;
        if bytes.contains(&0) {
            log::warn!("skipping binary file {}", path.display());
            continue;
        }

        total += size;
        if total > limits.max_total && !limits.allow_oversize {
            return Err(CollectError::TotalLimit {
                total,
                limit: limits.max_total,
            });
        }

        log::debug!("collected {} ({} bytes)", path.display(), size);
        collected.push(FileInfo {
            path: path.display().to_string(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
            size,
            language: language_for_path(path).to_string(),
        });
    }

    Ok(collected)
}

fn read_error(path: &Path, source: io::Error) -> CollectError {
    if source.kind() == io::ErrorKind::NotFound {
        CollectError::NotFound(path.to_path_buf())
    } else {
        CollectError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}
