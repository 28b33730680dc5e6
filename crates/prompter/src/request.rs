// crates/prompter/src/request.rs

use std::path::PathBuf;

use prompter_errors::PrompterError;

/// Template name that disables a template, including the configured default.
pub const NONE_TEMPLATE: &str = "none";

/// What the user asked for in one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRequest {
    pub base_prompt: String,
    pub pre_template: Option<String>,
    pub post_template: Option<String>,
    pub files: Vec<PathBuf>,
    pub directory: Option<PathBuf>,
    pub fix: bool,
    pub interactive: bool,
    pub target: Option<String>,
    pub editor: Option<String>,
    pub config_path: Option<PathBuf>,
    /// Names of `[custom_template.<name>]` entries switched on for this run.
    pub custom_templates: Vec<String>,
}

impl PromptRequest {
    /// A base prompt is required unless fix mode or interactive mode can supply the content.
    pub fn validate(&self) -> Result<(), PrompterError> {
        if self.base_prompt.trim().is_empty() && !self.fix && !self.interactive {
            return Err(PrompterError::validation(
                "base_prompt",
                "",
                "a base prompt is required unless --fix or --interactive is used",
            ));
        }
        Ok(())
    }

    pub fn enables_custom(&self, name: &str) -> bool {
        self.custom_templates.iter().any(|n| n == name)
    }
}

pub fn is_none_template(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(NONE_TEMPLATE)
}

/// Picks the template to apply: the requested one, else the configured default.
///
/// `none` in either place means no template.
pub fn effective_template(requested: Option<&str>, default: &str) -> Option<String> {
    let chosen = match requested.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => default.trim(),
    };
    if chosen.is_empty() || is_none_template(chosen) {
        None
    } else {
        Some(chosen.to_string())
    }
}
