// crates/collect_content/src/fix.rs

use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::CollectError;

const COMMAND_MARKER: &str = "$ ";

/// Captured command output exposed to templates as `.Fix`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FixInfo {
    pub enabled: bool,
    pub file: String,
    pub command: String,
    pub output: String,
    pub raw: String,
}

/// Reads a fix file. An optional first line `$ <command>` names the command
/// that produced the rest of the file.
pub fn read_fix_file(path: &Path) -> Result<FixInfo, CollectError> {
    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CollectError::FixNotFound(path.to_path_buf())
        } else {
            CollectError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    if raw.trim().is_empty() {
        return Err(CollectError::FixEmpty(path.to_path_buf()));
    }

    let (command, output) = split_command(&raw);
    Ok(FixInfo {
        enabled: true,
        file: path.display().to_string(),
        command,
        output,
        raw,
    })
}

fn split_command(raw: &str) -> (String, String) {
    let (first, rest) = match raw.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (raw, ""),
    };
    match first.trim_end_matches('\r').strip_prefix(COMMAND_MARKER) {
        Some(command) => (command.trim().to_string(), rest.trim_end().to_string()),
        None => (String::new(), raw.trim_end().to_string()),
    }
}
