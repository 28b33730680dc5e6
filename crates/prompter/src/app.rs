// crates/prompter/src/app.rs

use anyhow::{Context, Result};
use chrono::Local;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use collect_content::{
    collect_files, git_info, list_directory, read_fix_file, CollectError, DirectoryStrategy,
    FixInfo, SizeLimits,
};
use deliver_prompt::{deliver, Clipboard, OutputTarget};
use prompter_config::{Config, ConfigError, ConfigManager};
use prompter_errors::{is_recoverable_error, recover_from_error, PrompterError};
use template_resolver::{TemplateKind, TemplateResolver};

use crate::cli::CliOptions;
use crate::context::TemplateData;
use crate::generator::PromptGenerator;
use crate::interactive::InteractiveCollector;
use crate::request::PromptRequest;

/// The process streams and clipboard a run talks to.
pub struct AppIo<'a> {
    pub input: &'a mut dyn BufRead,
    pub stdout: &'a mut dyn Write,
    /// Questions, notices and warnings; stdout is kept for the prompt.
    pub stderr: &'a mut dyn Write,
    pub clipboard: &'a dyn Clipboard,
}

pub fn config_error(err: ConfigError) -> PrompterError {
    PrompterError::configuration(err.to_string(), Some(Box::new(err)))
}

/// Local prompts directory first, then the global one. Relative paths resolve against `cwd`.
pub fn template_roots(config: &Config, cwd: &Path) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for location in [&config.local_prompts_location, &config.prompts_location] {
        if location.trim().is_empty() {
            continue;
        }
        let root = cwd.join(location);
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

/// Runs one invocation after the command line has been parsed.
pub fn run(
    mut request: PromptRequest,
    options: CliOptions,
    manager: &mut ConfigManager,
    cwd: &Path,
    io: &mut AppIo,
) -> Result<()> {
    if let Some(target) = request.target.clone() {
        OutputTarget::parse(&target)
            .map_err(|err| PrompterError::validation("target", &target, &err.to_string()))?;
        manager.set_flag("target", &target).map_err(config_error)?;
    }
    if let Some(editor) = request.editor.clone() {
        manager.set_flag("editor", editor).map_err(config_error)?;
    }

    let config = manager.resolve().map_err(config_error)?;
    manager.validate(Some(&config)).map_err(config_error)?;
    if let Some(source) = manager.loaded_from() {
        log::debug!("using config file {}", source.display());
    }

    if options.print_config {
        let text = config
            .to_toml()
            .map_err(|err| config_error(ConfigError::from(err)))?;
        write!(io.stdout, "{}", text)?;
        return Ok(());
    }

    let resolver = TemplateResolver::with_roots(template_roots(&config, cwd));
    if options.list_templates {
        return list_templates(&resolver, &mut *io.stdout);
    }

    request.interactive |= config.interactive_default;
    if request.interactive {
        let proceed = InteractiveCollector::new(&mut *io.input, &mut *io.stderr)
            .collect(&mut request, &resolver, &config, cwd)
            .context("failed to collect inputs")?;
        if !proceed {
            writeln!(io.stderr, "Operation cancelled.")?;
            return Ok(());
        }
    }
    request.validate()?;

    let data = build_template_data(&request, &config, cwd)?;
    let prompt = PromptGenerator::new(&config, &resolver, cwd).generate(&request, &data)?;

    let target = OutputTarget::parse(&config.target)
        .map_err(|err| PrompterError::validation("target", &config.target, &err.to_string()))?;
    output_prompt(&prompt, &target, &config.editor, io)
}

fn collect_error(err: CollectError) -> PrompterError {
    let path = err
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "files".to_string());
    PrompterError::content_collection(&path, err)
}

fn build_template_data(request: &PromptRequest, config: &Config, cwd: &Path) -> Result<TemplateData> {
    let mut paths = request.files.clone();
    if let Some(dir) = &request.directory {
        let strategy: DirectoryStrategy = config.directory_strategy.parse().map_err(|reason: String| {
            PrompterError::validation("directory_strategy", &config.directory_strategy, &reason)
        })?;
        paths.extend(list_directory(dir, strategy).map_err(collect_error)?);
    }
    let limits = SizeLimits::new(
        config.max_file_size_bytes,
        config.max_total_bytes,
        config.allow_oversize,
    );
    let files = collect_files(&paths, &limits).map_err(collect_error)?;

    let fix = if request.fix {
        read_fix_file(Path::new(&config.fix_file))
            .map_err(|err| PrompterError::fix_mode(&config.fix_file, err))?
    } else {
        FixInfo::default()
    };

    let data = TemplateData::new(&request.base_prompt, cwd, Local::now())
        .with_files(files)
        .with_git(git_info(cwd))
        .with_fix(fix)
        .with_env(env_vars())
        .with_config(config)
        .context("failed to build template data")?;
    Ok(data)
}

/// The process environment, minus entries that are not valid UTF-8.
fn env_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os().filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

/// Delivers the prompt. A recoverable clipboard failure falls back to stdout with a warning.
fn output_prompt(prompt: &str, target: &OutputTarget, editor: &str, io: &mut AppIo) -> Result<()> {
    let err = match deliver(prompt, target, editor, io.clipboard, &mut *io.stdout) {
        Ok(()) => {
            match target {
                OutputTarget::Stdout => {}
                OutputTarget::Clipboard => writeln!(io.stderr, "Prompt copied to clipboard.")?,
                other => writeln!(io.stderr, "Prompt written to {}.", other)?,
            }
            return Ok(());
        }
        Err(err) => anyhow::Error::new(PrompterError::output(&target.to_string(), err)),
    };

    if *target != OutputTarget::Clipboard || !is_recoverable_error(&err) {
        return Err(err);
    }
    let recovered = recover_from_error(err);
    log::warn!("{}", recovered.summary());
    writeln!(
        io.stderr,
        "warning: {}; printing the prompt to stdout instead",
        recovered.summary()
    )?;
    deliver(prompt, &OutputTarget::Stdout, editor, io.clipboard, &mut *io.stdout)
        .map_err(|err| PrompterError::output("stdout", err))?;
    Ok(())
}

fn list_templates(resolver: &TemplateResolver, out: &mut dyn Write) -> Result<()> {
    for kind in TemplateKind::ALL {
        let names = resolver
            .find_templates(kind)
            .with_context(|| format!("failed to list {} templates", kind))?;
        let label = match kind {
            TemplateKind::Pre => "Pre",
            TemplateKind::Post => "Post",
        };
        writeln!(out, "{} templates:", label)?;
        if names.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for name in names {
            writeln!(out, "  {}", name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompter_errors::ErrorKind;
    use std::cell::RefCell;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    struct FakeClipboard {
        fail: bool,
        copied: RefCell<Option<String>>,
    }

    impl Clipboard for FakeClipboard {
        fn copy(&self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no clipboard utility found");
            }
            *self.copied.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    fn fake(fail: bool) -> FakeClipboard {
        FakeClipboard {
            fail,
            copied: RefCell::new(None),
        }
    }

    fn run_with(request: PromptRequest, clipboard: &FakeClipboard, cwd: &Path) -> (Result<()>, String, String) {
        let mut manager = ConfigManager::new();
        manager
            .set_flag("prompts_location", cwd.join("prompts").display())
            .unwrap();
        let mut input = Cursor::new(Vec::new());
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let result = {
            let mut io = AppIo {
                input: &mut input,
                stdout: &mut stdout,
                stderr: &mut stderr,
                clipboard,
            };
            run(request, CliOptions::default(), &mut manager, cwd, &mut io)
        };
        (
            result,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        )
    }

    #[test]
    fn test_clipboard_failure_falls_back_to_stdout() {
        let dir = tempdir().unwrap();
        let request = PromptRequest {
            base_prompt: "hello".into(),
            target: Some("clipboard".into()),
            ..Default::default()
        };
        let (result, stdout, stderr) = run_with(request, &fake(true), dir.path());
        result.unwrap();
        assert_eq!(stdout, "hello\n");
        assert!(stderr.contains("warning: output error"));
    }

    #[test]
    fn test_clipboard_success() {
        let dir = tempdir().unwrap();
        let clipboard = fake(false);
        let request = PromptRequest {
            base_prompt: "hello".into(),
            target: Some("clipboard".into()),
            ..Default::default()
        };
        let (result, stdout, stderr) = run_with(request, &clipboard, dir.path());
        result.unwrap();
        assert!(stdout.is_empty());
        assert_eq!(clipboard.copied.borrow().as_deref(), Some("hello"));
        assert!(stderr.contains("Prompt copied to clipboard."));
    }

    #[test]
    fn test_invalid_target_is_validation_error() {
        let dir = tempdir().unwrap();
        let request = PromptRequest {
            base_prompt: "hello".into(),
            target: Some("printer".into()),
            ..Default::default()
        };
        let (result, _, _) = run_with(request, &fake(false), dir.path());
        let err = result.unwrap_err().downcast::<PrompterError>().unwrap();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.guidance().starts_with("Invalid target"));
    }

    #[test]
    fn test_missing_fix_file_is_fix_mode_error() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new();
        manager
            .set_flag("fix_file", dir.path().join("missing.log").display())
            .unwrap();
        manager.set_flag("target", "stdout").unwrap();
        let request = PromptRequest {
            fix: true,
            ..Default::default()
        };
        let mut input = Cursor::new(Vec::new());
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let clipboard = fake(false);
        let mut io = AppIo {
            input: &mut input,
            stdout: &mut stdout,
            stderr: &mut stderr,
            clipboard: &clipboard,
        };
        let err = run(request, CliOptions::default(), &mut manager, dir.path(), &mut io)
            .unwrap_err()
            .downcast::<PrompterError>()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::FixMode);
        assert!(err.guidance().starts_with("Fix file not found"));
    }

    #[test]
    fn test_file_target_writes_prompt() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out/prompt.md");
        fs::create_dir_all(dir.path().join("prompts/pre")).unwrap();
        fs::write(dir.path().join("prompts/pre/intro.md"), "Intro").unwrap();
        let request = PromptRequest {
            base_prompt: "body".into(),
            pre_template: Some("intro".into()),
            target: Some(format!("file:{}", out.display())),
            ..Default::default()
        };
        let (result, stdout, _) = run_with(request, &fake(false), dir.path());
        result.unwrap();
        assert!(stdout.is_empty());
        assert_eq!(fs::read_to_string(out).unwrap(), "Intro\n\nbody");
    }

    #[test]
    fn test_template_roots_prefer_local() {
        let mut config = Config::default();
        config.local_prompts_location = ".prompter/prompts".into();
        config.prompts_location = "/global/prompts".into();
        let roots = template_roots(&config, Path::new("/work"));
        assert_eq!(
            roots,
            vec![PathBuf::from("/work/.prompter/prompts"), PathBuf::from("/global/prompts")]
        );
    }
}
