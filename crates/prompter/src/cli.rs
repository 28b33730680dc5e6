// crates/prompter/src/cli.rs

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use prompter_config::CustomTemplate;

use crate::request::PromptRequest;

const CUSTOM_ID_PREFIX: &str = "custom:";

/// Long names and short flags owned by the built-in arguments.
const RESERVED_LONGS: &[&str] = &[
    "pre",
    "post",
    "file",
    "directory",
    "fix",
    "target",
    "editor",
    "config",
    "interactive",
    "list-templates",
    "print-config",
    "verbose",
    "help",
    "version",
];
const RESERVED_SHORTS: &[char] = &['f', 'd', 't', 'e', 'c', 'i', 'v', 'h', 'V'];

/// Flags that only affect how the run behaves, not what it generates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub list_templates: bool,
    pub print_config: bool,
    pub verbose: bool,
}

pub fn build_cli(custom_templates: &BTreeMap<String, CustomTemplate>) -> Command {
    let mut cmd = Command::new("prompter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds an AI prompt from templates, files and command output")
        .arg(
            Arg::new("base_prompt")
                .value_name("PROMPT")
                .help("Base prompt text")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("pre")
                .long("pre")
                .num_args(1)
                .help("Template prepended to the prompt ('none' to disable the default)"),
        )
        .arg(
            Arg::new("post")
                .long("post")
                .num_args(1)
                .help("Template appended to the prompt ('none' to disable the default)"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .action(ArgAction::Append)
                .help("Include a file (repeatable)"),
        )
        .arg(
            Arg::new("directory")
                .short('d')
                .long("directory")
                .num_args(1)
                .help("Include the files of a directory"),
        )
        .arg(
            Arg::new("fix")
                .long("fix")
                .help("Include captured command output from the fix file")
                .action(ArgAction::SetTrue)
                .default_value("false"),
        )
        .arg(
            Arg::new("target")
                .short('t')
                .long("target")
                .num_args(1)
                .help("Output target: clipboard, stdout, editor or file:<path>"),
        )
        .arg(
            Arg::new("editor")
                .short('e')
                .long("editor")
                .num_args(1)
                .help("Editor used by the editor target"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .num_args(1)
                .help("Path to a config file"),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Ask for anything missing")
                .action(ArgAction::SetTrue)
                .default_value("false"),
        )
        .arg(
            Arg::new("list_templates")
                .long("list-templates")
                .help("List available templates and exit")
                .action(ArgAction::SetTrue)
                .default_value("false"),
        )
        .arg(
            Arg::new("print_config")
                .long("print-config")
                .help("Print the resolved configuration and exit")
                .action(ArgAction::SetTrue)
                .default_value("false"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue)
                .default_value("false"),
        );

    // Templates register in name order; a later template loses a clashing flag.
    let mut used_longs: HashSet<String> = HashSet::new();
    let mut used_shorts: HashSet<char> = HashSet::new();
    for (name, template) in custom_templates {
        let flag = template.flag.trim();
        if flag.is_empty() {
            continue;
        }
        if RESERVED_LONGS.contains(&flag) {
            log::warn!("custom template '{}' uses reserved flag --{}; ignoring it", name, flag);
            continue;
        }
        if !used_longs.insert(flag.to_string()) {
            log::warn!(
                "custom template '{}' reuses flag --{} of another template; ignoring it",
                name,
                flag
            );
            continue;
        }
        let help = if template.description.is_empty() {
            format!("Apply the '{}' custom {}-template", name, template.kind.to_lowercase())
        } else {
            template.description.clone()
        };
        let mut arg = Arg::new(format!("{}{}", CUSTOM_ID_PREFIX, name))
            .long(flag.to_string())
            .help(help)
            .action(ArgAction::SetTrue);
        if let Some(short) = single_char(&template.shorthand) {
            if RESERVED_SHORTS.contains(&short) {
                log::warn!("custom template '{}' uses reserved shorthand -{}; ignoring it", name, short);
            } else if !used_shorts.insert(short) {
                log::warn!(
                    "custom template '{}' reuses shorthand -{} of another template; ignoring it",
                    name,
                    short
                );
            } else {
                arg = arg.short(short);
            }
        }
        cmd = cmd.arg(arg);
    }

    cmd
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Finds `-c/--config` before clap runs, so custom template flags can be registered.
pub fn prescan_config_path(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }
        if arg == "-c" || arg == "--config" {
            return iter.next().map(PathBuf::from);
        }
        if let Some(value) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(value));
        }
        if let Some(value) = arg.strip_prefix("-c").filter(|v| !v.is_empty() && !arg.starts_with("--")) {
            return Some(PathBuf::from(value.trim_start_matches('=')));
        }
    }
    None
}

pub fn prescan_verbose(args: &[String]) -> bool {
    args.iter()
        .skip(1)
        .take_while(|a| a.as_str() != "--")
        .any(|a| a == "-v" || a == "--verbose")
}

pub fn options_from_matches(matches: &ArgMatches) -> CliOptions {
    CliOptions {
        list_templates: matches.get_flag("list_templates"),
        print_config: matches.get_flag("print_config"),
        verbose: matches.get_flag("verbose"),
    }
}

pub fn request_from_matches(
    matches: &ArgMatches,
    custom_templates: &BTreeMap<String, CustomTemplate>,
) -> PromptRequest {
    let base_prompt = matches
        .get_many::<String>("base_prompt")
        .unwrap_or_default()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let enabled = custom_templates
        .keys()
        .filter(|name| {
            let id = format!("{}{}", CUSTOM_ID_PREFIX, name);
            matches
                .try_get_one::<bool>(&id)
                .ok()
                .flatten()
                .copied()
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    PromptRequest {
        base_prompt,
        pre_template: matches.get_one::<String>("pre").cloned(),
        post_template: matches.get_one::<String>("post").cloned(),
        files: matches
            .get_many::<String>("file")
            .unwrap_or_default()
            .map(PathBuf::from)
            .collect(),
        directory: matches.get_one::<String>("directory").map(PathBuf::from),
        fix: matches.get_flag("fix"),
        interactive: matches.get_flag("interactive"),
        target: matches.get_one::<String>("target").cloned(),
        editor: matches.get_one::<String>("editor").cloned(),
        config_path: matches.get_one::<String>("config").map(PathBuf::from),
        custom_templates: enabled,
    }
}
