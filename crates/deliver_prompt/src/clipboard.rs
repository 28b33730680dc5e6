// crates/deliver_prompt/src/clipboard.rs

use anyhow::{anyhow, Result};
use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Copy text to the clipboard.
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<()>;
}

/// A program that reads the clipboard contents from stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl CopyCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Tries each known clipboard utility in turn; the first one that can be
/// spawned decides the outcome.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    commands: Vec<CopyCommand>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self {
            commands: vec![
                CopyCommand::new("pbcopy", &[]),
                CopyCommand::new("wl-copy", &[]),
                CopyCommand::new("xclip", &["-selection", "clipboard"]),
                CopyCommand::new("xsel", &["--clipboard", "--input"]),
                CopyCommand::new("clip.exe", &[]),
            ],
        }
    }
}

impl SystemClipboard {
    pub fn with_commands(commands: Vec<CopyCommand>) -> Self {
        Self { commands }
    }

    fn program_names(&self) -> String {
        self.commands
            .iter()
            .map(|c| c.program.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        for command in &self.commands {
            let spawned = Command::new(&command.program)
                .args(&command.args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            let mut child = match spawned {
                Ok(child) => child,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    log::debug!("clipboard utility {} not available", command.program);
                    continue;
                }
                Err(err) => return Err(anyhow!("Error running {}: {}", command.program, err)),
            };

            // The child is reaped even when writing fails; stdin drops before the wait.
            let written = match child.stdin.take() {
                Some(mut stdin) => stdin.write_all(text.as_bytes()).map_err(|e| e.to_string()),
                None => Err("stdin not captured".to_string()),
            };
            let status = child
                .wait()
                .map_err(|e| anyhow!("Failed to wait on {}: {}", command.program, e))?;
            if let Err(err) = written {
                return Err(anyhow!(
                    "Failed to write to {}: {} ({})",
                    command.program,
                    err,
                    status
                ));
            }
            if !status.success() {
                return Err(anyhow!("{} exited with status {}", command.program, status));
            }
            log::debug!("copied {} bytes with {}", text.len(), command.program);
            return Ok(());
        }

        Err(anyhow!(
            "no clipboard utility found (tried {})",
            self.program_names()
        ))
    }
}
