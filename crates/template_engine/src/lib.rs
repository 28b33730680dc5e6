// crates/template_engine/src/lib.rs

//! A small Go-template style engine for prompt fragments.
//!
//! Supported syntax:
//!
//! * `{{ .Field.Sub }}`, `{{ . }}`, `{{ $.Root }}`
//! * string (`"..."`, `` `raw` ``), integer and boolean literals
//! * function calls `{{ fn a b }}`, sub-calls `(fn a)` and pipelines `{{ .X | fn a }}`
//! * `{{ if }}` / `{{ else if }}` / `{{ else }}` / `{{ end }}`
//! * `{{ range }}` / `{{ else }}` / `{{ end }}`
//! * comments `{{/* ... */}}` and trim markers `{{- ` / ` -}}`
//!
//! A template is compiled once by [`Template::parse`] and can be executed any
//! number of times. Execution either yields the complete output or an error;
//! partial output is never returned.

mod exec;
mod functions;
mod lexer;
mod parser;
mod timefmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {name}:{line}: syntax error: {message}")]
    Parse {
        name: String,
        line: usize,
        message: String,
    },

    #[error("template {name}: execution failed: {message}")]
    Execute { name: String, message: String },

    #[error("template data could not be serialized: {0}")]
    Data(#[from] serde_json::Error),
}

/// A compiled template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<parser::Node>,
}

impl Template {
    /// Compiles `source`. `name` is only used in error messages.
    pub fn parse(name: &str, source: &str) -> Result<Self, TemplateError> {
        let to_error = |(line, message): (usize, String)| TemplateError::Parse {
            name: name.to_string(),
            line,
            message,
        };
        let items = lexer::lex(source).map_err(to_error)?;
        let nodes = parser::parse(items).map_err(to_error)?;
        Ok(Self {
            name: name.to_string(),
            nodes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders the template with `data` serialized as the root value.
    pub fn execute<T: Serialize>(&self, data: &T) -> Result<String, TemplateError> {
        self.execute_with_maps(data, &[])
    }

    /// Like [`Template::execute`], treating the root fields named in `map_fields`
    /// as maps: `{{ .Env.UNSET }}` renders empty instead of failing.
    pub fn execute_with_maps<T: Serialize>(
        &self,
        data: &T,
        map_fields: &[&str],
    ) -> Result<String, TemplateError> {
        let root = serde_json::to_value(data)?;
        let mut out = String::new();
        exec::Exec::new(&root, map_fields)
            .render(&self.nodes, &root, &mut out)
            .map_err(|message| TemplateError::Execute {
                name: self.name.clone(),
                message,
            })?;
        Ok(out)
    }
}
