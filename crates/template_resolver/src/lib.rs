// crates/template_resolver/src/lib.rs

//! Discovers prompt templates under `<prompts>/pre` and `<prompts>/post` and
//! resolves user-supplied names to compiled templates.

mod naming;

pub use naming::{classify_template_name, DEFAULT_MARKER};
pub use template_engine::{Template, TemplateError};

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use walkdir::WalkDir;

/// Only files with this extension are treated as templates.
pub const TEMPLATE_EXTENSION: &str = "md";

/// Menu entry that stands for "no template".
pub const NONE_OPTION: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Pre,
    Post,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 2] = [TemplateKind::Pre, TemplateKind::Post];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Pre => "pre",
            TemplateKind::Post => "post",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pre" => Ok(TemplateKind::Pre),
            "post" => Ok(TemplateKind::Post),
            other => Err(format!("unknown template kind '{}' (expected pre or post)", other)),
        }
    }
}

/// A template file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub path: PathBuf,
    pub stem: String,
    pub display_name: String,
    pub is_default: bool,
}

impl TemplateEntry {
    fn from_path(path: PathBuf) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?.to_string();
        let (display_name, is_default) = classify_template_name(&stem);
        Some(Self {
            path,
            stem,
            display_name,
            is_default,
        })
    }

    /// Case-insensitive match on the stem, or on the display name for default templates.
    pub fn matches(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.stem.to_lowercase() == wanted
            || (self.is_default && self.display_name.to_lowercase() == wanted)
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("template '{name}' not found")]
    NotFound { name: String },

    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Lists the template files directly inside `dir`, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn discover_templates(dir: &Path) -> io::Result<Vec<TemplateEntry>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let is_template = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == TEMPLATE_EXTENSION)
            .unwrap_or(false);
        if !is_template {
            continue;
        }
        if let Some(template) = TemplateEntry::from_path(path) {
            entries.push(template);
        }
    }
    Ok(entries)
}

/// Splits entries into (defaults, regulars), keeping the input order in each.
fn partition_defaults(entries: Vec<TemplateEntry>) -> (Vec<TemplateEntry>, Vec<TemplateEntry>) {
    entries.into_iter().partition(|e| e.is_default)
}

/// Resolves templates across one or more prompt roots; earlier roots win.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    roots: Vec<PathBuf>,
}

impl TemplateResolver {
    pub fn new(prompts_location: impl Into<PathBuf>) -> Self {
        Self {
            roots: vec![prompts_location.into()],
        }
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn entries(&self, kind: TemplateKind) -> io::Result<Vec<TemplateEntry>> {
        let mut all = Vec::new();
        for root in &self.roots {
            all.extend(discover_templates(&root.join(kind.as_str()))?);
        }
        Ok(all)
    }

    /// Display names for `kind`: default templates first, then regular ones.
    pub fn find_templates(&self, kind: TemplateKind) -> io::Result<Vec<String>> {
        let (defaults, regulars) = partition_defaults(self.entries(kind)?);
        Ok(defaults
            .into_iter()
            .chain(regulars)
            .map(|e| e.display_name)
            .collect())
    }

    /// Menu options for `kind`: defaults, then [`NONE_OPTION`], then regulars.
    pub fn build_options_with_none(&self, kind: TemplateKind) -> io::Result<Vec<String>> {
        let (defaults, regulars) = partition_defaults(self.entries(kind)?);
        let mut options: Vec<String> = defaults.into_iter().map(|e| e.display_name).collect();
        options.push(NONE_OPTION.to_string());
        options.extend(regulars.into_iter().map(|e| e.display_name));
        Ok(options)
    }

    /// Finds the file a template name refers to without loading it.
    pub fn find_template_path(&self, name: &str) -> io::Result<Option<PathBuf>> {
        let name = name
            .strip_suffix(&format!(".{}", TEMPLATE_EXTENSION))
            .unwrap_or(name);
        for root in &self.roots {
            for kind in TemplateKind::ALL {
                let found = discover_templates(&root.join(kind.as_str()))?
                    .into_iter()
                    .find(|entry| entry.matches(name));
                if let Some(entry) = found {
                    log::debug!("template '{}' resolved to {}", name, entry.path.display());
                    return Ok(Some(entry.path));
                }
            }
        }
        Ok(None)
    }

    /// Loads and compiles a template.
    ///
    /// An absolute path is read directly; anything else is looked up by name in
    /// the `pre` then `post` directories of each root.
    pub fn load_template(&self, name: &str) -> Result<Template, ResolveError> {
        let path = Path::new(name);
        if path.is_absolute() {
            return self.load_template_file(path);
        }

        let found = self
            .find_template_path(name)
            .map_err(|source| ResolveError::Read {
                path: self.roots.first().cloned().unwrap_or_default(),
                source,
            })?;
        match found {
            Some(path) => self.load_template_file(&path),
            None => Err(ResolveError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Reads and compiles the template stored at `path`.
    pub fn load_template_file(&self, path: &Path) -> Result<Template, ResolveError> {
        let source = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ResolveError::NotFound {
                    name: path.display().to_string(),
                }
            } else {
                ResolveError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Template::parse(&name, &source)?)
    }
}
