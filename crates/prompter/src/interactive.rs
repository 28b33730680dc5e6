// crates/prompter/src/interactive.rs

//! Line-oriented questions for anything the command line left out.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;

use prompter_config::Config;
use template_helpers::truncate;
use template_resolver::{TemplateKind, TemplateResolver, NONE_OPTION};

use crate::request::{PromptRequest, NONE_TEMPLATE};

const SUMMARY_PROMPT_WIDTH: usize = 60;

/// Asks questions on `output` and reads answers from `input`.
pub struct InteractiveCollector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveCollector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Fills in the missing parts of `request`. Returns `false` when the user
    /// declines the confirmation summary.
    pub fn collect(
        &mut self,
        request: &mut PromptRequest,
        resolver: &TemplateResolver,
        config: &Config,
        cwd: &Path,
    ) -> Result<bool> {
        if request.base_prompt.trim().is_empty() && !request.fix {
            request.base_prompt = self.ask_required("Enter your base prompt:")?;
        }

        if request.pre_template.is_none() {
            request.pre_template = Some(self.choose_template(
                resolver,
                TemplateKind::Pre,
                "Select a pre-template (prepended to prompt):",
            )?);
        }
        if request.post_template.is_none() {
            request.post_template = Some(self.choose_template(
                resolver,
                TemplateKind::Post,
                "Select a post-template (appended to prompt):",
            )?);
        }

        if request.directory.is_none()
            && request.files.is_empty()
            && self.confirm("Include current directory context in the prompt?", false)?
        {
            request.directory = Some(cwd.to_path_buf());
        }

        for (name, template) in &config.custom_template {
            if !template.interactive || request.enables_custom(name) {
                continue;
            }
            let question = if template.description.is_empty() {
                format!("Apply custom template '{}'?", name)
            } else {
                format!("Apply custom template '{}' ({})?", name, template.description)
            };
            if self.confirm(&question, false)? {
                request.custom_templates.push(name.clone());
            }
        }

        self.show_summary(request)?;
        self.confirm("Generate prompt with these settings?", true)
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read answer")?;
        if read == 0 {
            bail!("input closed before all questions were answered");
        }
        Ok(line.trim().to_string())
    }

    fn ask_required(&mut self, question: &str) -> Result<String> {
        loop {
            write!(self.output, "{} ", question)?;
            self.output.flush()?;
            let answer = self.read_line()?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.output, "A value is required.")?;
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            write!(self.output, "{} {} ", question, hint)?;
            self.output.flush()?;
            match self.read_line()?.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    /// Numbered menu; an empty answer takes the first option.
    fn select(&mut self, question: &str, options: &[String]) -> Result<String> {
        writeln!(self.output, "{}", question)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }
        loop {
            write!(self.output, "Choose [1-{}] (default 1): ", options.len())?;
            self.output.flush()?;
            let answer = self.read_line()?;
            if answer.is_empty() {
                return Ok(options[0].clone());
            }
            if let Some(option) = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i))
            {
                return Ok(option.clone());
            }
            if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(&answer)) {
                return Ok(option.clone());
            }
            writeln!(self.output, "Invalid choice '{}'.", answer)?;
        }
    }

    /// The selected template name, or `none` for the None option.
    fn choose_template(
        &mut self,
        resolver: &TemplateResolver,
        kind: TemplateKind,
        question: &str,
    ) -> Result<String> {
        let options = resolver
            .build_options_with_none(kind)
            .with_context(|| format!("failed to find {} templates", kind))?;
        let selected = self.select(question, &options)?;
        if selected == NONE_OPTION {
            Ok(NONE_TEMPLATE.to_string())
        } else {
            Ok(selected)
        }
    }

    fn show_summary(&mut self, request: &PromptRequest) -> Result<()> {
        writeln!(self.output, "\n=== Prompt Generation Summary ===")?;
        if request.fix {
            writeln!(self.output, "Mode: Fix mode (processing captured command output)")?;
        }
        if !request.base_prompt.is_empty() {
            let shown = truncate(SUMMARY_PROMPT_WIDTH, &request.base_prompt)
                .unwrap_or_else(|_| request.base_prompt.clone());
            writeln!(self.output, "Base prompt: {}", shown)?;
        }
        for (label, template) in [
            ("Pre-template", &request.pre_template),
            ("Post-template", &request.post_template),
        ] {
            if let Some(name) = template.as_deref().filter(|n| !n.eq_ignore_ascii_case(NONE_TEMPLATE)) {
                writeln!(self.output, "{}: {}", label, name)?;
            }
        }
        if !request.custom_templates.is_empty() {
            writeln!(self.output, "Custom templates: {}", request.custom_templates.join(", "))?;
        }
        if !request.files.is_empty() {
            let files: Vec<String> = request.files.iter().map(|f| f.display().to_string()).collect();
            writeln!(self.output, "Files: {}", files.join(", "))?;
        }
        if let Some(dir) = &request.directory {
            writeln!(self.output, "Directory: {}", dir.display())?;
        }
        if let Some(target) = &request.target {
            writeln!(self.output, "Output target: {}", target)?;
        }
        if let Some(editor) = &request.editor {
            writeln!(self.output, "Editor: {}", editor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompter_config::CustomTemplate;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn resolver_with(pre: &[&str], post: &[&str]) -> (tempfile::TempDir, TemplateResolver) {
        let dir = tempdir().unwrap();
        for (kind, names) in [("pre", pre), ("post", post)] {
            let d = dir.path().join(kind);
            fs::create_dir_all(&d).unwrap();
            for name in names {
                fs::write(d.join(name), "x").unwrap();
            }
        }
        let resolver = TemplateResolver::new(dir.path());
        (dir, resolver)
    }

    fn run(answers: &str, request: &mut PromptRequest, config: &Config) -> (bool, String) {
        let (_dir, resolver) = resolver_with(&["example.default.md", "plain.md"], &["review.md"]);
        let mut output = Vec::new();
        let proceed = InteractiveCollector::new(Cursor::new(answers.to_string()), &mut output)
            .collect(request, &resolver, config, Path::new("/work"))
            .unwrap();
        (proceed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_collects_everything_missing() {
        let mut request = PromptRequest {
            interactive: true,
            ..Default::default()
        };
        // prompt, pre (plain), post (None), directory yes, confirm default
        let (proceed, output) = run("Explain the parser\n3\n1\ny\n\n", &mut request, &Config::default());

        assert!(proceed);
        assert_eq!(request.base_prompt, "Explain the parser");
        assert_eq!(request.pre_template.as_deref(), Some("plain"));
        assert_eq!(request.post_template.as_deref(), Some("none"));
        assert_eq!(request.directory.as_deref(), Some(Path::new("/work")));
        assert!(output.contains("  1) example\n  2) None\n  3) plain"));
        assert!(output.contains("Base prompt: Explain the parser"));
        assert!(!output.contains("Post-template:"));
    }

    #[test]
    fn test_skips_provided_values_and_truncates_summary() {
        let long = "a".repeat(80);
        let mut request = PromptRequest {
            base_prompt: long,
            pre_template: Some("plain".into()),
            post_template: Some("review".into()),
            files: vec!["src/main.rs".into()],
            interactive: true,
            ..Default::default()
        };
        let (proceed, output) = run("n\n", &mut request, &Config::default());

        assert!(!proceed);
        assert!(!output.contains("Select a pre-template"));
        assert!(!output.contains("Include current directory"));
        assert!(output.contains(&format!("Base prompt: {}...\n", "a".repeat(57))));
        assert!(output.contains("Files: src/main.rs"));
    }

    #[test]
    fn test_invalid_choice_is_asked_again() {
        let mut request = PromptRequest {
            base_prompt: "x".into(),
            post_template: Some("none".into()),
            files: vec!["a".into()],
            interactive: true,
            ..Default::default()
        };
        let (_, output) = run("9\nplain\ny\n", &mut request, &Config::default());
        assert!(output.contains("Invalid choice '9'."));
        assert_eq!(request.pre_template.as_deref(), Some("plain"));
    }

    #[test]
    fn test_interactive_custom_templates() {
        let mut config = Config::default();
        config.custom_template.insert(
            "security".into(),
            CustomTemplate {
                location: "security.md".into(),
                interactive: true,
                flag: "security".into(),
                shorthand: String::new(),
                kind: "post".into(),
                description: "security checklist".into(),
            },
        );
        let mut request = PromptRequest {
            base_prompt: "x".into(),
            pre_template: Some("none".into()),
            post_template: Some("none".into()),
            directory: Some("/work".into()),
            interactive: true,
            ..Default::default()
        };
        let (proceed, output) = run("yes\ny\n", &mut request, &config);
        assert!(proceed);
        assert_eq!(request.custom_templates, vec!["security".to_string()]);
        assert!(output.contains("Apply custom template 'security' (security checklist)?"));
        assert!(output.contains("Custom templates: security"));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let (_dir, resolver) = resolver_with(&[], &[]);
        let mut request = PromptRequest {
            interactive: true,
            ..Default::default()
        };
        let err = InteractiveCollector::new(Cursor::new(String::new()), Vec::new())
            .collect(&mut request, &resolver, &Config::default(), Path::new("/"))
            .unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }
}
