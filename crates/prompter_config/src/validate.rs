// crates/prompter_config/src/validate.rs

use crate::schema::{is_valid_strategy, is_valid_target, Config, VALID_DIRECTORY_STRATEGIES};
use crate::ConfigError;

/// Checks the invariants a resolved configuration must hold.
pub fn validate_config(config: Option<&Config>) -> Result<(), ConfigError> {
    let config = config.ok_or(ConfigError::Missing)?;

    if config.max_file_size_bytes < 0 {
        return Err(ConfigError::Invalid(format!(
            "max_file_size_bytes must be non-negative, got {}",
            config.max_file_size_bytes
        )));
    }
    if config.max_total_bytes < 0 {
        return Err(ConfigError::Invalid(format!(
            "max_total_bytes must be non-negative, got {}",
            config.max_total_bytes
        )));
    }
    if !is_valid_strategy(&config.directory_strategy) {
        return Err(ConfigError::Invalid(format!(
            "invalid directory_strategy '{}' (expected one of: {})",
            config.directory_strategy,
            VALID_DIRECTORY_STRATEGIES.join(", ")
        )));
    }
    if !is_valid_target(&config.target) {
        return Err(ConfigError::Invalid(format!(
            "invalid target '{}' (expected clipboard, stdout, editor or file:<path>)",
            config.target
        )));
    }

    for (name, template) in &config.custom_template {
        if template.location.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "custom_template.{} requires a location",
                name
            )));
        }
        let kind = template.kind.to_ascii_lowercase();
        if kind != "pre" && kind != "post" {
            return Err(ConfigError::Invalid(format!(
                "custom_template.{} has invalid type '{}' (expected pre or post)",
                name, template.kind
            )));
        }
    }

    Ok(())
}
