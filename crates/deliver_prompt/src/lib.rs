// crates/deliver_prompt/src/lib.rs

mod clipboard;

pub use clipboard::{Clipboard, CopyCommand, SystemClipboard};

use anyhow::{anyhow, bail, Context, Result};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

pub const FILE_PREFIX: &str = "file:";

/// Where the assembled prompt goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Clipboard,
    Stdout,
    Editor,
    File(PathBuf),
}

impl OutputTarget {
    pub fn parse(target: &str) -> Result<Self> {
        target.parse()
    }
}

impl FromStr for OutputTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(path) = s.strip_prefix(FILE_PREFIX) {
            if path.trim().is_empty() {
                bail!("file target requires a path (file:<path>)");
            }
            return Ok(OutputTarget::File(PathBuf::from(path)));
        }
        match s {
            "clipboard" => Ok(OutputTarget::Clipboard),
            "stdout" => Ok(OutputTarget::Stdout),
            "editor" => Ok(OutputTarget::Editor),
            other => Err(anyhow!(
                "unknown target '{}' (expected clipboard, stdout, editor or file:<path>)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Clipboard => f.write_str("clipboard"),
            OutputTarget::Stdout => f.write_str("stdout"),
            OutputTarget::Editor => f.write_str("editor"),
            OutputTarget::File(path) => write!(f, "{}{}", FILE_PREFIX, path.display()),
        }
    }
}

/// Sends `text` to `target`.
///
/// `editor` is only used for [`OutputTarget::Editor`], `clipboard` only for
/// [`OutputTarget::Clipboard`], and `stdout` only for [`OutputTarget::Stdout`].
pub fn deliver(
    text: &str,
    target: &OutputTarget,
    editor: &str,
    clipboard: &dyn Clipboard,
    stdout: &mut dyn Write,
) -> Result<()> {
    match target {
        OutputTarget::Clipboard => clipboard.copy(text),
        OutputTarget::Stdout => {
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
            Ok(())
        }
        OutputTarget::File(path) => write_file(path, text),
        OutputTarget::Editor => open_in_editor(text, editor).map(|path| {
            log::info!("prompt saved to {}", path.display());
        }),
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Writes `text` to a kept temporary `.md` file and waits for `editor` to exit.
///
/// `editor` may carry arguments, e.g. `code --wait`.
pub fn open_in_editor(text: &str, editor: &str) -> Result<PathBuf> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow!("no editor configured"))?;
    let args: Vec<&str> = parts.collect();

    let mut file = tempfile::Builder::new()
        .prefix("prompter-")
        .suffix(".md")
        .tempfile()
        .context("Failed to create temporary file for editor")?;
    file.write_all(text.as_bytes())
        .context("Failed to write temporary file for editor")?;
    let (_, path) = file
        .keep()
        .map_err(|e| anyhow!("Failed to keep temporary file: {}", e))?;

    let status = Command::new(program)
        .args(&args)
        .arg(&path)
        .status()
        .map_err(|e| anyhow!("Failed to launch editor '{}': {}", program, e))?;
    if !status.success() {
        bail!("editor '{}' exited with status {}", program, status);
    }
    Ok(path)
}
