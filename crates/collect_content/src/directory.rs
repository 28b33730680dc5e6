// crates/collect_content/src/directory.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::{DirEntry, WalkDir};

use crate::git::git_output;
use crate::CollectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStrategy {
    /// Files git knows about, honouring `.gitignore`.
    Git,
    /// Every non-hidden file below the directory.
    Filesystem,
}

impl FromStr for DirectoryStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "git" => Ok(DirectoryStrategy::Git),
            "filesystem" => Ok(DirectoryStrategy::Filesystem),
            other => Err(format!("unknown directory strategy '{}'", other)),
        }
    }
}

impl fmt::Display for DirectoryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DirectoryStrategy::Git => "git",
            DirectoryStrategy::Filesystem => "filesystem",
        })
    }
}

/// Lists the files under `dir`, sorted, as paths joined onto `dir`.
pub fn list_directory(dir: &Path, strategy: DirectoryStrategy) -> Result<Vec<PathBuf>, CollectError> {
    if !dir.is_dir() {
        return Err(CollectError::NotFound(dir.to_path_buf()));
    }

    if strategy == DirectoryStrategy::Git {
        match list_git_files(dir) {
            Some(files) => return Ok(files),
            None => log::warn!(
                "{} is not a git repository, falling back to filesystem listing",
                dir.display()
            ),
        }
    }
    list_filesystem(dir)
}

fn list_git_files(dir: &Path) -> Option<Vec<PathBuf>> {
    // NUL-separated output keeps non-ASCII names unquoted.
    let listing = git_output(dir, &["ls-files", "-z", "--cached", "--others", "--exclude-standard"])?;
    let mut files: Vec<PathBuf> = listing
        .split('\0')
        .filter(|name| !name.is_empty())
        .map(|name| dir.join(name))
        // Deleted but still-indexed files show up in --cached.
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files.dedup();
    Some(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn list_filesystem(dir: &Path) -> Result<Vec<PathBuf>, CollectError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_strategy_parse() {
        assert_eq!("GIT".parse::<DirectoryStrategy>().unwrap(), DirectoryStrategy::Git);
        assert_eq!(
            "filesystem".parse::<DirectoryStrategy>().unwrap(),
            DirectoryStrategy::Filesystem
        );
        assert!("svn".parse::<DirectoryStrategy>().is_err());
    }

    #[test]
    fn test_filesystem_skips_hidden_entries() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join(".hidden")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "").unwrap();
        fs::write(dir.path().join(".env"), "").unwrap();
        fs::write(dir.path().join(".hidden/secret.txt"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let files = list_directory(dir.path(), DirectoryStrategy::Filesystem).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(rel, vec![PathBuf::from("README.md"), PathBuf::from("src/lib.rs")]);
    }

    #[test]
    fn test_git_strategy_falls_back_outside_repository() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let files = list_directory(dir.path(), DirectoryStrategy::Git).unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt")]);
    }

    #[test]
    fn test_missing_directory() {
        let err = list_directory(Path::new("/no/such/dir"), DirectoryStrategy::Filesystem).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
