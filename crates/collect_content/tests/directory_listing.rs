// crates/collect_content/tests/directory_listing.rs

use collect_content::{collect_files, list_directory, DirectoryStrategy, SizeLimits};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn new_git_repo() -> TempDir {
    let td = TempDir::new().expect("tempdir");
    assert!(Command::new("git")
        .args(["-c", "init.defaultBranch=main", "init"])
        .current_dir(td.path())
        .stdout(Stdio::null())
        .status()
        .expect("git init")
        .success());
    td
}

fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().display().to_string())
        .collect()
}

#[test]
fn test_git_strategy_honours_gitignore() {
    let repo = new_git_repo();
    fs::write(repo.path().join(".gitignore"), "target/\n*.log\n").unwrap();
    fs::create_dir_all(repo.path().join("target")).unwrap();
    fs::create_dir_all(repo.path().join("src")).unwrap();
    fs::write(repo.path().join("target/out.bin"), "x").unwrap();
    fs::write(repo.path().join("debug.log"), "x").unwrap();
    fs::write(repo.path().join("src/main.rs"), "fn main() {}").unwrap();

    let files = list_directory(repo.path(), DirectoryStrategy::Git).unwrap();
    assert_eq!(relative(repo.path(), &files), vec![".gitignore", "src/main.rs"]);

    let fs_files = list_directory(repo.path(), DirectoryStrategy::Filesystem).unwrap();
    assert_eq!(
        relative(repo.path(), &fs_files),
        vec!["debug.log", "src/main.rs", "target/out.bin"]
    );
}

#[test]
fn test_git_strategy_keeps_non_ascii_names() {
    let repo = new_git_repo();
    fs::write(repo.path().join("café.rs"), "fn cafe() {}").unwrap();
    fs::write(repo.path().join("plain.rs"), "fn plain() {}").unwrap();
    fs::create_dir_all(repo.path().join("données")).unwrap();
    fs::write(repo.path().join("données/naïve.md"), "notes").unwrap();

    let git_files = list_directory(repo.path(), DirectoryStrategy::Git).unwrap();
    let fs_files = list_directory(repo.path(), DirectoryStrategy::Filesystem).unwrap();
    assert_eq!(
        relative(repo.path(), &git_files),
        vec!["café.rs", "données/naïve.md", "plain.rs"]
    );
    assert_eq!(git_files.len(), fs_files.len());
}

#[test]
fn test_listing_feeds_collection() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.py"), "print('a')\n").unwrap();
    fs::write(dir.path().join("b.go"), "package b\n").unwrap();

    let paths = list_directory(dir.path(), DirectoryStrategy::Filesystem).unwrap();
    let files = collect_files(&paths, &SizeLimits::new(65536, 262144, false)).unwrap();
    let langs: Vec<_> = files.iter().map(|f| f.language.as_str()).collect();
    assert_eq!(langs, vec!["python", "go"]);
}
