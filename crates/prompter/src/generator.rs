// crates/prompter/src/generator.rs

use std::path::{Path, PathBuf};

use prompter_config::{Config, CustomTemplate};
use prompter_errors::PrompterError;
use template_helpers::md_fence;
use template_resolver::{Template, TemplateResolver};

use crate::context::{TemplateData, MAP_FIELDS};
use crate::request::{effective_template, PromptRequest};

/// Assembles the final prompt text from a request and its render context.
pub struct PromptGenerator<'a> {
    config: &'a Config,
    resolver: &'a TemplateResolver,
    cwd: PathBuf,
}

impl<'a> PromptGenerator<'a> {
    pub fn new(config: &'a Config, resolver: &'a TemplateResolver, cwd: &Path) -> Self {
        Self {
            config,
            resolver,
            cwd: cwd.to_path_buf(),
        }
    }

    /// Sections, in order: pre-template, enabled custom pre-templates, base
    /// prompt, fix output, files, enabled custom post-templates, post-template.
    /// Empty sections are dropped and the rest joined with blank lines.
    pub fn generate(&self, request: &PromptRequest, data: &TemplateData) -> Result<String, PrompterError> {
        let value = data
            .to_value()
            .map_err(|err| PrompterError::template("context", err))?;
        let (custom_pre, custom_post): (Vec<_>, Vec<_>) = self
            .config
            .custom_template
            .iter()
            .filter(|(name, _)| request.enables_custom(name))
            .partition(|(_, template)| !template.is_post());

        let mut sections = Vec::new();

        if let Some(name) = effective_template(request.pre_template.as_deref(), &self.config.default_pre) {
            sections.push(self.render_named(&name, &value)?);
        }
        for (name, template) in custom_pre {
            sections.push(self.render_custom(name, template, &value)?);
        }

        sections.push(data.prompt.trim().to_string());
        if data.fix.enabled {
            sections.push(fix_section(&data.fix.command, &data.fix.output));
        }
        for file in &data.files {
            sections.push(format!(
                "### {}\n\n{}",
                file.path,
                md_fence(&file.language, file.content.trim_end())
            ));
        }

        for (name, template) in custom_post {
            sections.push(self.render_custom(name, template, &value)?);
        }
        if let Some(name) = effective_template(request.post_template.as_deref(), &self.config.default_post) {
            sections.push(self.render_named(&name, &value)?);
        }

        let prompt = sections
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        log::debug!("generated prompt of {} bytes", prompt.len());
        Ok(prompt)
    }

    fn render_named(&self, name: &str, value: &serde_json::Value) -> Result<String, PrompterError> {
        let template = self
            .resolver
            .load_template(name)
            .map_err(|err| PrompterError::template(name, err))?;
        render(name, &template, value)
    }

    /// A custom location is a file path (relative ones resolve against the
    /// working directory) or, failing that, a template name.
    fn render_custom(
        &self,
        name: &str,
        custom: &CustomTemplate,
        value: &serde_json::Value,
    ) -> Result<String, PrompterError> {
        let location = custom.location.as_str();
        let relative = self.cwd.join(location);
        let loaded = if !Path::new(location).is_absolute() && relative.is_file() {
            self.resolver.load_template_file(&relative)
        } else {
            self.resolver.load_template(location)
        };
        let template = loaded.map_err(|err| PrompterError::template(name, err))?;
        render(name, &template, value)
    }
}

fn render(name: &str, template: &Template, value: &serde_json::Value) -> Result<String, PrompterError> {
    log::debug!("rendering template '{}'", name);
    template
        .execute_with_maps(value, MAP_FIELDS)
        .map_err(|err| PrompterError::template(name, err))
}

fn fix_section(command: &str, output: &str) -> String {
    let heading = if command.is_empty() {
        "## Command output".to_string()
    } else {
        format!("## Output of `{}`", command)
    };
    format!("{}\n\n{}", heading, md_fence("", output.trim_end()))
}
