// crates/prompter_errors/src/guidance.rs

//! Ordered guidance tables. The first rule that matches wins; every
//! comparison ignores case.

pub const HELP_GENERIC: &str = "Run 'prompter --help' for usage information.";

/// How a rule inspects a piece of text.
#[derive(Debug, Clone, Copy)]
pub enum Match {
    /// Any of the needles appears somewhere in the text.
    Contains(&'static [&'static str]),
    Exact(&'static str),
    Prefix(&'static str),
}

impl Match {
    fn test(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        match self {
            Match::Contains(needles) => needles.iter().any(|n| text.contains(n)),
            Match::Exact(value) => text == *value,
            Match::Prefix(prefix) => text.starts_with(prefix),
        }
    }
}

/// Which input a rule looks at.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// The category's primary text: the message for configuration errors, the cause otherwise.
    Text(Match),
    /// The thing the error is about: template name, output target or field name.
    Subject(Match),
}

/// `{subject}` in `guidance` is replaced with the subject when the rule fires.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub trigger: Trigger,
    pub guidance: &'static str,
}

const NOT_FOUND: &[&str] = &["not found", "does not exist"];
const PATH_MISSING: &[&str] = &["not found", "does not exist", "no such file"];

pub const CONFIGURATION_FALLBACK: &str =
    "Run 'prompter --help' for usage information and configuration options.";
pub const CONFIGURATION_RULES: &[Rule] = &[
    Rule {
        trigger: Trigger::Text(Match::Contains(&["permission"])),
        guidance: "Check file permissions for your configuration directory. Run 'prompter --help' for more information.",
    },
    Rule {
        trigger: Trigger::Text(Match::Contains(NOT_FOUND)),
        guidance: "Configuration file not found. Run 'prompter --help' to see default locations and options.",
    },
];

pub const TEMPLATE_FALLBACK: &str = "Run 'prompter --help' for template usage and configuration.";
pub const TEMPLATE_RULES: &[Rule] = &[
    Rule {
        trigger: Trigger::Text(Match::Contains(&["not found"])),
        guidance: "Template '{subject}' not found. Run 'prompter --help' for template setup.",
    },
    Rule {
        trigger: Trigger::Text(Match::Contains(&["parse", "syntax"])),
        guidance: "Template '{subject}' has syntax errors. Run 'prompter --help' for template format.",
    },
];

pub const CONTENT_FALLBACK: &str = "Run 'prompter --help' for file and directory usage options.";
pub const CONTENT_RULES: &[Rule] = &[
    Rule {
        trigger: Trigger::Text(Match::Contains(&["permission"])),
        guidance: "Permission denied accessing '{subject}'. Run 'prompter --help' for usage.",
    },
    Rule {
        trigger: Trigger::Text(Match::Contains(PATH_MISSING)),
        guidance: "Path '{subject}' not found. Run 'prompter --help' for usage.",
    },
];

pub const FIX_MODE_FALLBACK: &str = "Run 'prompter --help' for fix mode usage and examples.";
pub const FIX_MODE_RULES: &[Rule] = &[
    Rule {
        trigger: Trigger::Text(Match::Contains(PATH_MISSING)),
        guidance: "Fix file not found. Run 'prompter --help' for fix mode setup.",
    },
    Rule {
        trigger: Trigger::Text(Match::Contains(&["empty"])),
        guidance: "Fix file is empty. Run 'prompter --help' for fix mode usage.",
    },
];

pub const OUTPUT_FALLBACK: &str = "Run 'prompter --help' for output target options.";
pub const OUTPUT_RULES: &[Rule] = &[
    Rule {
        trigger: Trigger::Subject(Match::Exact("clipboard")),
        guidance: "Clipboard access failed. Try --target stdout or run 'prompter --help' for options.",
    },
    Rule {
        trigger: Trigger::Subject(Match::Prefix("file:")),
        guidance: "File write failed. Run 'prompter --help' for output options.",
    },
    Rule {
        trigger: Trigger::Text(Match::Contains(&["editor"])),
        guidance: "Editor launch failed. Run 'prompter --help' for editor configuration.",
    },
];

pub const VALIDATION_FALLBACK: &str = HELP_GENERIC;
pub const VALIDATION_RULES: &[Rule] = &[
    Rule {
        trigger: Trigger::Subject(Match::Exact("base_prompt")),
        guidance: "Base prompt required in non-interactive mode. Run 'prompter --help' for options.",
    },
    Rule {
        trigger: Trigger::Subject(Match::Exact("target")),
        guidance: "Invalid target. Run 'prompter --help' for valid output targets.",
    },
    Rule {
        trigger: Trigger::Subject(Match::Exact("config_path")),
        guidance: "Invalid config path. Run 'prompter --help' for configuration options.",
    },
    Rule {
        trigger: Trigger::Subject(Match::Exact("template_name")),
        guidance: "Invalid template name. Run 'prompter --help' for template usage.",
    },
];

/// Returns the guidance of the first matching rule, or `fallback`.
pub fn pick(rules: &[Rule], text: &str, subject: &str, fallback: &str) -> String {
    rules
        .iter()
        .find(|rule| match rule.trigger {
            Trigger::Text(m) => m.test(text),
            Trigger::Subject(m) => m.test(subject),
        })
        .map(|rule| rule.guidance.replace("{subject}", subject))
        .unwrap_or_else(|| fallback.to_string())
}
