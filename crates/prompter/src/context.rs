// crates/prompter/src/context.rs

use chrono::{DateTime, Local};
use collect_content::{FileInfo, FixInfo, GitInfo};
use prompter_config::Config;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Fields of [`TemplateData`] that templates index like maps.
pub const MAP_FIELDS: &[&str] = &["Env", "Config"];

/// The data every template is rendered against.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateData {
    pub prompt: String,
    /// RFC 3339 local time.
    pub now: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(rename = "CWD")]
    pub cwd: String,
    pub files: Vec<FileInfo>,
    pub git: GitInfo,
    pub fix: FixInfo,
    pub config: serde_json::Value,
    pub env: BTreeMap<String, String>,
}

impl TemplateData {
    pub fn new(prompt: &str, cwd: &Path, now: DateTime<Local>) -> Self {
        Self {
            prompt: prompt.to_string(),
            now: now.to_rfc3339(),
            date: now.format("%Y-%m-%d").to_string(),
            cwd: cwd.display().to_string(),
            files: Vec::new(),
            git: GitInfo::default(),
            fix: FixInfo::default(),
            config: serde_json::Value::Object(Default::default()),
            env: BTreeMap::new(),
        }
    }

    pub fn with_files(mut self, files: Vec<FileInfo>) -> Self {
        self.files = files;
        self
    }

    pub fn with_git(mut self, git: GitInfo) -> Self {
        self.git = git;
        self
    }

    pub fn with_fix(mut self, fix: FixInfo) -> Self {
        self.fix = fix;
        self
    }

    pub fn with_config(mut self, config: &Config) -> serde_json::Result<Self> {
        self.config = serde_json::to_value(config)?;
        Ok(self)
    }

    pub fn with_env<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env = vars.into_iter().collect();
        self
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_field_names_match_template_paths() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        let data = TemplateData::new("fix it", Path::new("/work"), now)
            .with_env(vec![("SHELL".to_string(), "/bin/zsh".to_string())])
            .with_config(&Config::default())
            .unwrap();
        let value = data.to_value().unwrap();

        assert_eq!(value["Prompt"], "fix it");
        assert_eq!(value["Date"], "2024-03-09");
        assert_eq!(value["CWD"], "/work");
        assert_eq!(value["Git"]["IsRepo"], false);
        assert_eq!(value["Fix"]["Enabled"], false);
        assert_eq!(value["Env"]["SHELL"], "/bin/zsh");
        assert_eq!(value["Config"]["target"], "clipboard");
        assert!(value["Now"].as_str().unwrap().starts_with("2024-03-09T12:30:00"));
    }
}
