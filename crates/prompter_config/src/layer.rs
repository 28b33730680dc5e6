// crates/prompter_config/src/layer.rs

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::schema::{Config, CustomTemplate};
use crate::ConfigError;

pub const ENV_PREFIX: &str = "PROMPTER_";

/// Every key that can be set from the environment or with `set_flag`.
pub const SCALAR_KEYS: &[&str] = &[
    "prompts_location",
    "local_prompts_location",
    "editor",
    "default_pre",
    "default_post",
    "fix_file",
    "directory_strategy",
    "target",
    "interactive_default",
    "max_file_size_bytes",
    "max_total_bytes",
    "allow_oversize",
];

/// `editor` -> `PROMPTER_EDITOR`.
pub fn env_var_name(key: &str) -> String {
    format!("{}{}", ENV_PREFIX, key.to_ascii_uppercase())
}

/// A partial configuration; only present fields override lower layers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigLayer {
    pub prompts_location: Option<String>,
    pub local_prompts_location: Option<String>,
    pub editor: Option<String>,
    pub default_pre: Option<String>,
    pub default_post: Option<String>,
    pub fix_file: Option<String>,
    pub directory_strategy: Option<String>,
    pub target: Option<String>,
    pub interactive_default: Option<bool>,
    pub max_file_size_bytes: Option<i64>,
    pub max_total_bytes: Option<i64>,
    pub allow_oversize: Option<bool>,
    #[serde(default)]
    pub custom_template: BTreeMap<String, CustomTemplate>,
}

impl ConfigLayer {
    /// Unknown top-level keys are logged and skipped.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        let table: toml::Table = toml::from_str(source)?;
        for key in unknown_keys(&table) {
            log::warn!("ignoring unknown configuration key '{}'", key);
        }
        toml::from_str(source)
    }

    /// Reads `PROMPTER_<KEY>` for every scalar key through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn from_env<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layer = ConfigLayer::default();
        for key in SCALAR_KEYS {
            let var = env_var_name(key);
            if let Some(value) = lookup(&var).filter(|v| !v.is_empty()) {
                layer.set(key, &value).map_err(|err| match err {
                    ConfigError::InvalidValue { value, reason, .. } => ConfigError::InvalidValue {
                        key: var.clone(),
                        value,
                        reason,
                    },
                    other => other,
                })?;
            }
        }
        Ok(layer)
    }

    /// Parses `raw` into the typed field named `key`. Hyphens in `key` are treated as underscores.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let key = key.trim().replace('-', "_");
        let text = || Some(raw.to_string());
        match key.as_str() {
            "prompts_location" => self.prompts_location = text(),
            "local_prompts_location" => self.local_prompts_location = text(),
            "editor" => self.editor = text(),
            "default_pre" => self.default_pre = text(),
            "default_post" => self.default_post = text(),
            "fix_file" => self.fix_file = text(),
            "directory_strategy" => self.directory_strategy = text(),
            "target" => self.target = text(),
            "interactive_default" => self.interactive_default = Some(parse_bool(&key, raw)?),
            "allow_oversize" => self.allow_oversize = Some(parse_bool(&key, raw)?),
            "max_file_size_bytes" => self.max_file_size_bytes = Some(parse_int(&key, raw)?),
            "max_total_bytes" => self.max_total_bytes = Some(parse_int(&key, raw)?),
            _ => return Err(ConfigError::UnknownKey(key)),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &ConfigLayer::default()
    }
}

fn unknown_keys(table: &toml::Table) -> Vec<&str> {
    table
        .keys()
        .map(String::as_str)
        .filter(|key| *key != "custom_template" && !SCALAR_KEYS.contains(key))
        .collect()
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_int(key: &str, raw: &str) -> Result<i64, ConfigError> {
    raw.trim().parse::<i64>().map_err(|err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

impl Config {
    pub fn apply_layer(&mut self, layer: &ConfigLayer) {
        if let Some(location) = layer.prompts_location.as_ref() {
            self.prompts_location = location.clone();
        }
        if let Some(location) = layer.local_prompts_location.as_ref() {
            self.local_prompts_location = location.clone();
        }
        if let Some(editor) = layer.editor.as_ref() {
            self.editor = editor.clone();
        }
        if let Some(pre) = layer.default_pre.as_ref() {
            self.default_pre = pre.clone();
        }
        if let Some(post) = layer.default_post.as_ref() {
            self.default_post = post.clone();
        }
        if let Some(fix_file) = layer.fix_file.as_ref() {
            self.fix_file = fix_file.clone();
        }
        if let Some(strategy) = layer.directory_strategy.as_ref() {
            self.directory_strategy = strategy.clone();
        }
        if let Some(target) = layer.target.as_ref() {
            self.target = target.clone();
        }
        if let Some(interactive) = layer.interactive_default {
            self.interactive_default = interactive;
        }
        if let Some(size) = layer.max_file_size_bytes {
            self.max_file_size_bytes = size;
        }
        if let Some(size) = layer.max_total_bytes {
            self.max_total_bytes = size;
        }
        if let Some(allow) = layer.allow_oversize {
            self.allow_oversize = allow;
        }
        for (name, template) in &layer.custom_template {
            self.custom_template.insert(name.clone(), template.clone());
        }
    }
}
