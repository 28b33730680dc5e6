// crates/template_engine/src/exec.rs

use serde_json::Value;

use crate::functions::{self, is_truthy, render_value, type_name};
use crate::parser::{Command, Node, Pipeline, Term};

/// Walks a parsed tree against `root`, writing into `out`.
pub(crate) struct Exec<'a> {
    root: &'a Value,
    /// Root fields holding maps; a missing key below them is empty, not an error.
    map_fields: &'a [&'a str],
}

impl<'a> Exec<'a> {
    pub(crate) fn new(root: &'a Value, map_fields: &'a [&'a str]) -> Self {
        Self { root, map_fields }
    }

    pub(crate) fn render(&self, nodes: &[Node], dot: &Value, out: &mut String) -> Result<(), String> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Action(pipe) => {
                    let value = self.eval_at(pipe, dot)?;
                    out.push_str(&render_value(&value));
                }
                Node::If { cond, then, otherwise } => {
                    if is_truthy(&self.eval_at(cond, dot)?) {
                        self.render(then, dot, out)?;
                    } else {
                        self.render(otherwise, dot, out)?;
                    }
                }
                Node::Range { pipe, body, otherwise } => {
                    let items: Vec<Value> = match self.eval_at(pipe, dot)? {
                        Value::Null => Vec::new(),
                        Value::Array(list) => list,
                        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
                        other => {
                            return Err(format!(
                                "line {}: range can't iterate over {}",
                                pipe.line,
                                type_name(&other)
                            ))
                        }
                    };
                    if items.is_empty() {
                        self.render(otherwise, dot, out)?;
                    }
                    for item in &items {
                        self.render(body, item, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluates a top-level pipeline, tagging failures with its line.
    fn eval_at(&self, pipe: &Pipeline, dot: &Value) -> Result<Value, String> {
        self.eval_pipeline(pipe, dot)
            .map_err(|e| format!("line {}: {}", pipe.line, e))
    }

    fn eval_pipeline(&self, pipe: &Pipeline, dot: &Value) -> Result<Value, String> {
        let mut piped: Option<Value> = None;
        for cmd in &pipe.commands {
            piped = Some(self.eval_command(cmd, dot, piped.take())?);
        }
        Ok(piped.unwrap_or(Value::Null))
    }

    fn eval_command(&self, cmd: &Command, dot: &Value, piped: Option<Value>) -> Result<Value, String> {
        match cmd.terms.first() {
            Some(Term::Func(name)) => {
                let mut args = cmd.terms[1..]
                    .iter()
                    .map(|t| self.eval_term(t, dot))
                    .collect::<Result<Vec<_>, _>>()?;
                if let Some(value) = piped {
                    args.push(value);
                }
                functions::call(name, &args)
            }
            Some(term) => {
                if cmd.terms.len() > 1 || piped.is_some() {
                    return Err("can't give argument to non-function".to_string());
                }
                self.eval_term(term, dot)
            }
            None => Err("empty command".to_string()),
        }
    }

    fn eval_term(&self, term: &Term, dot: &Value) -> Result<Value, String> {
        match term {
            Term::Str(s) => Ok(Value::String(s.clone())),
            Term::Int(n) => Ok(Value::from(*n)),
            Term::Bool(b) => Ok(Value::Bool(*b)),
            Term::Field(path) if std::ptr::eq(dot, self.root) => self.lookup_root(path),
            Term::Field(path) => lookup(dot, path, false),
            Term::Root(path) => self.lookup_root(path),
            Term::Func(name) => functions::call(name, &[]),
            Term::Sub(pipe) => self.eval_pipeline(pipe, dot),
        }
    }

    fn lookup_root(&self, path: &[String]) -> Result<Value, String> {
        let in_map = path
            .first()
            .is_some_and(|field| self.map_fields.contains(&field.as_str()));
        lookup(self.root, path, in_map)
    }
}

/// Follows `path` from `start`. With `in_map`, only the first segment must exist.
fn lookup(start: &Value, path: &[String], in_map: bool) -> Result<Value, String> {
    let mut current = start;
    for (depth, segment) in path.iter().enumerate() {
        current = match current {
            Value::Object(map) => match map.get(segment) {
                Some(value) => value,
                None if in_map && depth > 0 => return Ok(Value::Null),
                None => return Err(format!("can't evaluate field {}: no such field", segment)),
            },
            other => {
                return Err(format!(
                    "can't evaluate field {} in type {}",
                    segment,
                    type_name(other)
                ))
            }
        };
    }
    Ok(current.clone())
}
