// crates/prompter/tests/cli.rs

#[cfg(test)]
mod integration_tests_cli {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use prompter_config::{env_var_name, SCALAR_KEYS};
    use std::env;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// A command isolated from the user's home, config files and PROMPTER_* variables.
    fn prompter(home: &TempDir, cwd: &Path) -> Command {
        let mut cmd = Command::cargo_bin("prompter").unwrap();
        cmd.current_dir(cwd)
            .env("HOME", home.path())
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("PROMPTER_LOG");
        for key in SCALAR_KEYS {
            cmd.env_remove(env_var_name(key));
        }
        cmd
    }

    fn workspace() -> (TempDir, TempDir) {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let pre = cwd.path().join(".prompter/prompts/pre");
        let post = cwd.path().join(".prompter/prompts/post");
        fs::create_dir_all(&pre).unwrap();
        fs::create_dir_all(&post).unwrap();
        fs::write(pre.join("intro.md"), "Context: {{ .Prompt }}").unwrap();
        fs::write(post.join("checklist.default.md"), "Check your work.").unwrap();
        (home, cwd)
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
    }

    #[cfg(unix)]
    /// `dir` first on PATH, so its scripts shadow real clipboard utilities.
    fn path_with(dir: &Path) -> String {
        format!("{}:{}", dir.display(), env::var("PATH").unwrap_or_default())
    }

    #[test]
    fn test_stdout_target_orders_sections() {
        let (home, cwd) = workspace();
        prompter(&home, cwd.path())
            .args(["Explain", "this", "--pre", "intro", "--target", "stdout"])
            .assert()
            .success()
            .stdout("Context: Explain this\n\nExplain this\n\nCheck your work.\n");
    }

    #[test]
    fn test_none_disables_default_post_template() {
        let (home, cwd) = workspace();
        prompter(&home, cwd.path())
            .args(["Hi", "--post", "none", "-t", "stdout"])
            .assert()
            .success()
            .stdout("Hi\n");
    }

    #[test]
    fn test_missing_base_prompt_is_validation_error() {
        let (home, cwd) = workspace();
        prompter(&home, cwd.path())
            .args(["-t", "stdout"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("validation error"))
            .stderr(predicate::str::contains("Base prompt required"));
    }

    #[test]
    fn test_missing_template_reports_guidance() {
        let (home, cwd) = workspace();
        prompter(&home, cwd.path())
            .args(["Hi", "--pre", "ghost", "-t", "stdout"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("template error: failed to process template 'ghost'"))
            .stderr(predicate::str::contains("omit template flags"));
    }

    #[test]
    fn test_print_config_reflects_environment() {
        let (home, cwd) = workspace();
        prompter(&home, cwd.path())
            .arg("--print-config")
            .env("PROMPTER_TARGET", "stdout")
            .env("PROMPTER_MAX_TOTAL_BYTES", "1024")
            .assert()
            .success()
            .stdout(predicate::str::contains("target = \"stdout\""))
            .stdout(predicate::str::contains("max_total_bytes = 1024"));
    }

    #[test]
    fn test_invalid_environment_value_fails() {
        let (home, cwd) = workspace();
        prompter(&home, cwd.path())
            .args(["Hi", "-t", "stdout"])
            .env("PROMPTER_MAX_FILE_SIZE_BYTES", "lots")
            .assert()
            .failure()
            .stderr(predicate::str::contains("configuration error"))
            .stderr(predicate::str::contains("PROMPTER_MAX_FILE_SIZE_BYTES"));
    }

    #[test]
    fn test_list_templates() {
        let (home, cwd) = workspace();
        prompter(&home, cwd.path())
            .arg("--list-templates")
            .assert()
            .success()
            .stdout("Pre templates:\n  intro\nPost templates:\n  checklist\n");
    }

    #[test]
    fn test_custom_template_flag_from_config_file() {
        let (home, cwd) = workspace();
        fs::write(cwd.path().join("security.md"), "Look for injection bugs.").unwrap();
        let config = cwd.path().join("prompter.toml");
        fs::write(
            &config,
            r#"
target = "stdout"
default_post = "none"

[custom_template.security]
location = "security.md"
flag = "security"
shorthand = "s"
type = "post"
description = "Security review checklist"
"#,
        )
        .unwrap();

        prompter(&home, cwd.path())
            .args(["--config", config.to_str().unwrap(), "Review", "-s"])
            .assert()
            .success()
            .stdout("Review\n\nLook for injection bugs.\n");

        prompter(&home, cwd.path())
            .args(["--config", config.to_str().unwrap(), "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--security"))
            .stdout(predicate::str::contains("Security review checklist"));
    }

    #[test]
    fn test_files_and_fix_output_are_included() {
        let (home, cwd) = workspace();
        fs::write(cwd.path().join("main.rs"), "fn main() {}\n").unwrap();
        let fix_file = cwd.path().join("fix.log");
        fs::write(&fix_file, "$ cargo build\nerror[E0425]: cannot find value\n").unwrap();

        prompter(&home, cwd.path())
            .args(["Fix it", "--post", "none", "--fix", "-f", "main.rs", "-t", "stdout"])
            .env("PROMPTER_FIX_FILE", &fix_file)
            .assert()
            .success()
            .stdout(
                "Fix it\n\n## Output of `cargo build`\n\n```\nerror[E0425]: cannot find value\n```\n\n\
                 ### main.rs\n\n```rust\nfn main() {}\n```\n",
            );
    }

    #[test]
    fn test_missing_file_is_content_collection_error() {
        let (home, cwd) = workspace();
        prompter(&home, cwd.path())
            .args(["Hi", "-f", "nope.rs", "-t", "stdout"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("content collection error"))
            .stderr(predicate::str::contains("nope.rs"));
    }

    #[test]
    fn test_directory_with_filesystem_strategy() {
        use assert_fs::prelude::*;

        let home = TempDir::new().unwrap();
        let cwd = assert_fs::TempDir::new().unwrap();
        cwd.child("src/a.py").write_str("print('a')\n").unwrap();
        cwd.child("src/.hidden").write_str("secret").unwrap();

        prompter(&home, cwd.path())
            .args(["Read", "-d", "src", "-t", "stdout"])
            .env("PROMPTER_DIRECTORY_STRATEGY", "filesystem")
            .assert()
            .success()
            .stdout("Read\n\n### src/a.py\n\n```python\nprint('a')\n```\n");
    }

    #[test]
    fn test_file_target_writes_prompt() {
        let (home, cwd) = workspace();
        let out = cwd.path().join("out/prompt.md");
        prompter(&home, cwd.path())
            .args(["Hi", "--post", "none", "-t"])
            .arg(format!("file:{}", out.display()))
            .assert()
            .success()
            .stdout("")
            .stderr(predicate::str::contains("Prompt written to file:"));
        assert_eq!(fs::read_to_string(&out).unwrap(), "Hi");
    }

    #[test]
    fn test_invalid_target_is_rejected() {
        let (home, cwd) = workspace();
        prompter(&home, cwd.path())
            .args(["Hi", "-t", "printer"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("validation failed for target"));
    }

    #[test]
    #[cfg(unix)]
    fn test_clipboard_target_uses_pbcopy() {
        let (home, cwd) = workspace();
        let bin = TempDir::new().unwrap();
        let clipboard_file = bin.path().join("clipboard.txt");
        write_script(
            bin.path(),
            "pbcopy",
            &format!("cat > \"{}\"", clipboard_file.display()),
        );

        prompter(&home, cwd.path())
            .args(["Copy", "me", "--post", "none"])
            .env("PATH", path_with(bin.path()))
            .assert()
            .success()
            .stdout("")
            .stderr(predicate::str::contains("Prompt copied to clipboard."));
        assert_eq!(fs::read_to_string(clipboard_file).unwrap(), "Copy me");
    }

    #[test]
    #[cfg(unix)]
    fn test_clipboard_failure_falls_back_to_stdout() {
        let (home, cwd) = workspace();
        let bin = TempDir::new().unwrap();
        write_script(bin.path(), "pbcopy", "cat > /dev/null\nexit 1");

        prompter(&home, cwd.path())
            .args(["Copy", "me", "--post", "none"])
            .env("PATH", path_with(bin.path()))
            .assert()
            .success()
            .stdout("Copy me\n")
            .stderr(predicate::str::contains("warning: output error"));
    }

    #[test]
    fn test_interactive_cancel_exits_cleanly() {
        let (home, cwd) = workspace();
        // base prompt, pre menu (None), post menu (default), skip directory, decline
        prompter(&home, cwd.path())
            .args(["-i", "-t", "stdout"])
            .write_stdin("Describe the module\n1\n\nn\nn\n")
            .assert()
            .success()
            .stdout("")
            .stderr(predicate::str::contains("=== Prompt Generation Summary ==="))
            .stderr(predicate::str::contains("Operation cancelled."));
    }

    #[test]
    fn test_interactive_answers_build_prompt() {
        let (home, cwd) = workspace();
        // pre menu: 1) None 2) intro; post menu: 1) checklist 2) None
        prompter(&home, cwd.path())
            .args(["-i", "-t", "stdout", "Summarize"])
            .write_stdin("intro\n2\nn\ny\n")
            .assert()
            .success()
            .stdout("Context: Summarize\n\nSummarize\n");
    }

    #[test]
    fn test_custom_templates_sharing_a_flag() {
        let (home, cwd) = workspace();
        fs::write(cwd.path().join("first.md"), "First checklist.").unwrap();
        fs::write(cwd.path().join("second.md"), "Second checklist.").unwrap();
        let config = cwd.path().join("prompter.toml");
        fs::write(
            &config,
            r#"
target = "stdout"
default_post = "none"

[custom_template.first]
location = "first.md"
flag = "review"
shorthand = "r"
type = "post"

[custom_template.second]
location = "second.md"
flag = "review"
shorthand = "r"
type = "post"
"#,
        )
        .unwrap();

        prompter(&home, cwd.path())
            .args(["--config", config.to_str().unwrap(), "Check", "-r"])
            .assert()
            .success()
            .stdout("Check\n\nFirst checklist.\n")
            .stderr(predicate::str::contains("reuses flag --review"));
    }

    #[test]
    fn test_unknown_config_key_is_a_warning() {
        let (home, cwd) = workspace();
        let config = cwd.path().join("prompter.toml");
        fs::write(&config, "target = \"stdout\"\ndefault_post = \"none\"\ncolour = \"red\"\n").unwrap();

        prompter(&home, cwd.path())
            .args(["--config", config.to_str().unwrap(), "Hi"])
            .assert()
            .success()
            .stdout("Hi\n")
            .stderr(predicate::str::contains("ignoring unknown configuration key 'colour'"));
    }

    #[test]
    fn test_unset_env_var_renders_empty() {
        let (home, cwd) = workspace();
        fs::write(
            cwd.path().join(".prompter/prompts/pre/env.md"),
            "[{{ .Env.PROMPTER_TEST_UNSET }}]",
        )
        .unwrap();
        prompter(&home, cwd.path())
            .args(["Hi", "--pre", "env", "--post", "none", "-t", "stdout"])
            .env_remove("PROMPTER_TEST_UNSET")
            .assert()
            .success()
            .stdout("[]\n\nHi\n");
    }
}
