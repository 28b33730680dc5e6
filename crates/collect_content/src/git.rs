// crates/collect_content/src/git.rs

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Repository state exposed to templates as `.Git`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GitInfo {
    pub is_repo: bool,
    pub root: String,
    pub branch: String,
    pub commit: String,
    pub dirty: bool,
}

/// Runs `git <args>` in `dir`; `None` when git is missing or exits non-zero.
pub(crate) fn git_output(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// The top-level directory of the repository containing `dir`.
pub fn git_root(dir: &Path) -> Option<PathBuf> {
    git_output(dir, &["rev-parse", "--show-toplevel"])
        .filter(|root| !root.is_empty())
        .map(PathBuf::from)
}

/// Describes the repository at `dir`. Outside a repository every field is empty.
pub fn git_info(dir: &Path) -> GitInfo {
    let root = match git_root(dir) {
        Some(root) => root,
        None => {
            log::debug!("{} is not inside a git repository", dir.display());
            return GitInfo::default();
        }
    };

    // Both fail in a repository without commits.
    let branch = git_output(dir, &["rev-parse", "--abbrev-ref", "HEAD"]).unwrap_or_default();
    let commit = git_output(dir, &["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    let dirty = git_output(dir, &["status", "--porcelain"])
        .map(|status| !status.trim().is_empty())
        .unwrap_or(false);

    GitInfo {
        is_repo: true,
        root: root.display().to_string(),
        branch,
        commit,
        dirty,
    }
}
