// crates/prompter_errors/src/lib.rs

//! Categorized errors that carry an actionable next step for the user.

mod guidance;
mod recovery;

pub use guidance::HELP_GENERIC;
pub use recovery::{is_recoverable_error, recover_from_error, recover_with_config_dir};

use guidance::*;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Template,
    ContentCollection,
    FixMode,
    Output,
    Validation,
    /// Anything that did not come through one of the constructors.
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Template => "template error",
            ErrorKind::ContentCollection => "content collection error",
            ErrorKind::FixMode => "fix mode error",
            ErrorKind::Output => "output error",
            ErrorKind::Validation => "validation error",
            ErrorKind::Unknown => "unknown error",
        };
        f.write_str(label)
    }
}

/// Rendered as `<category>: <message>`, followed by a blank line and the guidance when there is one.
#[derive(Debug, Error)]
#[error("{kind}: {message}{}", guidance_block(.guidance))]
pub struct PrompterError {
    kind: ErrorKind,
    message: String,
    guidance: String,
    #[source]
    cause: Option<BoxError>,
}

fn guidance_block(guidance: &str) -> String {
    if guidance.is_empty() {
        String::new()
    } else {
        format!("\n\n{}", guidance)
    }
}

impl PrompterError {
    pub fn configuration(message: impl Into<String>, cause: Option<BoxError>) -> Self {
        let message = message.into();
        let guidance = pick(CONFIGURATION_RULES, &message, "", CONFIGURATION_FALLBACK);
        Self {
            kind: ErrorKind::Configuration,
            message,
            guidance,
            cause,
        }
    }

    pub fn template(name: &str, cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self {
            kind: ErrorKind::Template,
            message: format!("failed to process template '{}'", name),
            guidance: pick(TEMPLATE_RULES, &cause.to_string(), name, TEMPLATE_FALLBACK),
            cause: Some(cause),
        }
    }

    pub fn content_collection(path: &str, cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self {
            kind: ErrorKind::ContentCollection,
            message: format!("failed to collect content from '{}'", path),
            guidance: pick(CONTENT_RULES, &cause.to_string(), path, CONTENT_FALLBACK),
            cause: Some(cause),
        }
    }

    pub fn fix_mode(file: &str, cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self {
            kind: ErrorKind::FixMode,
            message: format!("fix mode failed with file '{}'", file),
            guidance: pick(FIX_MODE_RULES, &cause.to_string(), file, FIX_MODE_FALLBACK),
            cause: Some(cause),
        }
    }

    pub fn output(target: &str, cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self {
            kind: ErrorKind::Output,
            message: format!("failed to output to target '{}'", target),
            guidance: pick(OUTPUT_RULES, &cause.to_string(), target, OUTPUT_FALLBACK),
            cause: Some(cause),
        }
    }

    pub fn validation(field: &str, value: impl fmt::Display, reason: &str) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: format!("validation failed for {}: {} ({})", field, value, reason),
            guidance: pick(VALIDATION_RULES, "", field, VALIDATION_FALLBACK),
            cause: None,
        }
    }

    pub(crate) fn unknown(message: String, cause: BoxError) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message,
            guidance: HELP_GENERIC.to_string(),
            cause: Some(cause),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn guidance(&self) -> &str {
        &self.guidance
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// The cause rendered with its whole source chain, or an empty string.
    pub(crate) fn cause_text(&self) -> String {
        let mut text = String::new();
        let mut next = self.cause().map(|c| c as &(dyn StdError + 'static));
        while let Some(err) = next {
            if !text.is_empty() {
                text.push_str(": ");
            }
            text.push_str(&err.to_string());
            next = err.source();
        }
        text
    }

    pub(crate) fn set_guidance(&mut self, guidance: impl Into<String>) {
        self.guidance = guidance.into();
    }

    /// `<category>: <message>`, without guidance.
    pub fn summary(&self) -> String {
        format!("{}: {}", self.kind, self.message)
    }
}
