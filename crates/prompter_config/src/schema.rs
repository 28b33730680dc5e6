// crates/prompter_config/src/schema.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::paths::expand_path;

pub const DEFAULT_MAX_FILE_SIZE_BYTES: i64 = 65_536;
pub const DEFAULT_MAX_TOTAL_BYTES: i64 = 262_144;
pub const DEFAULT_DIRECTORY_STRATEGY: &str = "git";
pub const DEFAULT_TARGET: &str = "clipboard";
pub const DEFAULT_EDITOR: &str = "vi";
pub const DEFAULT_FIX_FILE: &str = "~/.cache/prompter/fix.log";
pub const DEFAULT_GLOBAL_PROMPTS: &str = "~/.config/prompter/prompts";
pub const DEFAULT_LOCAL_PROMPTS: &str = ".prompter/prompts";

pub const VALID_DIRECTORY_STRATEGIES: &[&str] = &["git", "filesystem"];
pub const VALID_TARGETS: &[&str] = &["clipboard", "stdout", "editor"];
pub const FILE_TARGET_PREFIX: &str = "file:";

/// A named template declared in the config file under `[custom_template.<name>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTemplate {
    pub location: String,
    #[serde(default)]
    pub interactive: bool,
    /// Long CLI flag that enables the template (without the leading `--`).
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub shorthand: String,
    /// `pre` or `post`.
    #[serde(rename = "type", default = "default_custom_kind")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

fn default_custom_kind() -> String {
    "pre".to_string()
}

impl CustomTemplate {
    pub fn is_post(&self) -> bool {
        self.kind.eq_ignore_ascii_case("post")
    }
}

/// The fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub prompts_location: String,
    pub local_prompts_location: String,
    pub editor: String,
    pub default_pre: String,
    pub default_post: String,
    pub fix_file: String,
    pub directory_strategy: String,
    pub target: String,
    pub interactive_default: bool,
    pub max_file_size_bytes: i64,
    pub max_total_bytes: i64,
    pub allow_oversize: bool,
    #[serde(default)]
    pub custom_template: BTreeMap<String, CustomTemplate>,
}

impl Default for Config {
    /// Built-in defaults, the lowest precedence layer.
    fn default() -> Self {
        Self::defaults_with(|key| std::env::var(key).ok())
    }
}

impl Config {
    /// Built-in defaults, reading `$EDITOR` through `lookup`.
    pub fn defaults_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            prompts_location: default_prompts_location(),
            local_prompts_location: DEFAULT_LOCAL_PROMPTS.to_string(),
            editor: lookup("EDITOR")
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EDITOR.to_string()),
            default_pre: String::new(),
            default_post: String::new(),
            fix_file: DEFAULT_FIX_FILE.to_string(),
            directory_strategy: DEFAULT_DIRECTORY_STRATEGY.to_string(),
            target: DEFAULT_TARGET.to_string(),
            interactive_default: false,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            allow_oversize: false,
            custom_template: BTreeMap::new(),
        }
    }

    /// Expands `~` in every path-valued setting.
    pub(crate) fn expand_paths(&mut self) {
        self.prompts_location = expand_path(&self.prompts_location);
        self.local_prompts_location = expand_path(&self.local_prompts_location);
        self.fix_file = expand_path(&self.fix_file);
        if let Some(path) = self.target.strip_prefix(FILE_TARGET_PREFIX) {
            self.target = format!("{}{}", FILE_TARGET_PREFIX, expand_path(path));
        }
        for template in self.custom_template.values_mut() {
            template.location = expand_path(&template.location);
        }
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// `./prompts` when it exists in the working directory, else the per-user location.
fn default_prompts_location() -> String {
    if let Ok(cwd) = std::env::current_dir() {
        let local = cwd.join("prompts");
        if local.is_dir() {
            return local.display().to_string();
        }
    }
    DEFAULT_GLOBAL_PROMPTS.to_string()
}

pub(crate) fn is_valid_target(target: &str) -> bool {
    target.starts_with(FILE_TARGET_PREFIX) || VALID_TARGETS.contains(&target)
}

pub(crate) fn is_valid_strategy(strategy: &str) -> bool {
    VALID_DIRECTORY_STRATEGIES.contains(&strategy)
}
