// crates/prompter_config/src/paths.rs

use std::path::PathBuf;

pub const APP_DIR: &str = "prompter";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOCAL_CONFIG_FILE_NAME: &str = ".prompter.toml";

/// Replaces a leading `~` (alone or followed by `/`) with the home directory.
///
/// Everything else, including `~user/...`, is returned unchanged.
pub fn expand_path(path: &str) -> String {
    let home = match dirs::home_dir() {
        Some(home) => home,
        None => return path.to_string(),
    };
    if path == "~" {
        return home.display().to_string();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest).display().to_string(),
        None => path.to_string(),
    }
}

/// `~/.config/prompter`, the per-user configuration directory.
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(APP_DIR))
}

/// Candidate config files, highest priority first.
pub fn default_config_paths() -> Vec<PathBuf> {
    default_config_paths_with(|key| std::env::var(key).ok())
}

pub(crate) fn default_config_paths_with<F>(lookup: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let mut paths = Vec::new();
    if let Some(xdg) = lookup("XDG_CONFIG_HOME").filter(|v| !v.trim().is_empty()) {
        paths.push(PathBuf::from(xdg).join(APP_DIR).join(CONFIG_FILE_NAME));
    }
    if let Some(dir) = user_config_dir() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if !paths.contains(&candidate) {
            paths.push(candidate);
        }
    }
    paths.push(PathBuf::from(LOCAL_CONFIG_FILE_NAME));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_variants() {
        let home = dirs::home_dir().expect("home directory");
        assert_eq!(expand_path("~"), home.display().to_string());
        assert_eq!(
            expand_path("~/test/path"),
            home.join("test/path").display().to_string()
        );
        assert_eq!(expand_path("/absolute/path"), "/absolute/path");
        assert_eq!(expand_path("relative/path"), "relative/path");
        assert_eq!(expand_path("~user/path"), "~user/path");
        assert_eq!(expand_path(""), "");
    }

    #[test]
    fn test_default_config_paths_order() {
        let paths = default_config_paths_with(|key| match key {
            "XDG_CONFIG_HOME" => Some("/xdg".to_string()),
            _ => None,
        });
        assert_eq!(paths[0], PathBuf::from("/xdg/prompter/config.toml"));
        assert_eq!(paths.last().unwrap(), &PathBuf::from(".prompter.toml"));
    }

    #[test]
    fn test_default_config_paths_without_xdg() {
        let paths = default_config_paths_with(|_| None);
        assert!(paths[0].ends_with(".config/prompter/config.toml"));
        assert_eq!(paths.len(), 2);
    }
}
