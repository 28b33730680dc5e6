// crates/prompter_errors/src/recovery.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::{ErrorKind, PrompterError};

const TEMPLATE_SKIP_HINT: &str =
    "Template not found. Run 'prompter --help' for template setup or omit template flags.";
const CLIPBOARD_HINT: &str =
    "Clipboard failed. Try --target stdout or run 'prompter --help' for options.";

fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("prompter"))
}

/// Turns any error into a [`PrompterError`] and applies the recovery step for its category.
///
/// The error is always returned; only its guidance may change.
pub fn recover_from_error(err: anyhow::Error) -> PrompterError {
    recover_with_config_dir(err, default_config_dir().as_deref())
}

/// Like [`recover_from_error`] with an explicit config directory for configuration errors.
pub fn recover_with_config_dir(err: anyhow::Error, config_dir: Option<&Path>) -> PrompterError {
    let mut err = match err.downcast::<PrompterError>() {
        Ok(err) => err,
        Err(other) => {
            let message = format!("{:#}", other);
            return PrompterError::unknown(message, other.into());
        }
    };

    match err.kind() {
        ErrorKind::Configuration => recover_configuration(&mut err, config_dir),
        ErrorKind::Template => {
            if mentions(err.message(), "not found") || mentions(&err.cause_text(), "not found") {
                err.set_guidance(TEMPLATE_SKIP_HINT);
            }
        }
        ErrorKind::Output => {
            if mentions(err.message(), "clipboard") {
                err.set_guidance(CLIPBOARD_HINT);
            }
        }
        _ => {}
    }
    err
}

/// Creates the config directory when it is missing and reports the outcome in the guidance.
fn recover_configuration(err: &mut PrompterError, config_dir: Option<&Path>) {
    let dir = match config_dir {
        Some(dir) => dir,
        None => return,
    };
    if dir.exists() {
        return;
    }
    match fs::create_dir_all(dir) {
        Ok(()) => {
            log::debug!("created config directory {}", dir.display());
            err.set_guidance(format!(
                "Config directory created at {}. Run 'prompter --help' for configuration options.",
                dir.display()
            ));
        }
        Err(create_err) => {
            log::warn!("could not create config directory {}: {}", dir.display(), create_err);
            err.set_guidance(format!(
                "Could not create config directory {}: {}. Run 'prompter --help' for configuration help.",
                dir.display(),
                create_err
            ));
        }
    }
}

fn mentions(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(needle)
}

/// True for a template error caused by a missing template, and for a clipboard output error.
pub fn is_recoverable_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<PrompterError>()
        .map(PrompterError::is_recoverable)
        .unwrap_or(false)
}

impl PrompterError {
    pub fn is_recoverable(&self) -> bool {
        match self.kind() {
            ErrorKind::Template => mentions(&self.cause_text(), "not found"),
            ErrorKind::Output => mentions(self.message(), "clipboard"),
            _ => false,
        }
    }
}
