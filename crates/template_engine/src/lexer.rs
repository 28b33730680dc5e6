// crates/template_engine/src/lexer.rs

//! Splits template source into literal text and `{{ ... }}` actions.
//!
//! Trim markers (`{{- ` / ` -}}`) are applied here, and comments
//! (`{{/* ... */}}`) never leave the lexer.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Str(String),
    Int(i64),
    /// `.a.b` relative to the current dot; an empty path is `.` itself.
    Field(Vec<String>),
    /// `$` or `$.a.b`, always relative to the root data.
    Root(Vec<String>),
    Ident(String),
    Pipe,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item {
    Text(String),
    Action { line: usize, tokens: Vec<Token> },
}

/// A lexing failure: the 1-based line plus a message.
pub(crate) type LexError = (usize, String);

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:(?P<str>"(?:[^"\\]|\\.)*")|(?P<raw>`[^`]*`)|(?P<num>-?[0-9]+)|(?P<root>\$(?:\.[A-Za-z_][A-Za-z0-9_]*)*)|(?P<field>(?:\.[A-Za-z_][A-Za-z0-9_]*)+|\.)|(?P<ident>[A-Za-z_][A-Za-z0-9_]*)|(?P<punct>[|()]))"#,
    )
    .unwrap()
});

pub(crate) fn lex(src: &str) -> Result<Vec<Item>, LexError> {
    let mut items = Vec::new();
    let mut rest = src;
    let mut offset = 0;
    let mut trim_next = false;

    loop {
        let start = match rest.find("{{") {
            Some(start) => start,
            None => {
                let text = if trim_next { rest.trim_start() } else { rest };
                if !text.is_empty() {
                    items.push(Item::Text(text.to_string()));
                }
                return Ok(items);
            }
        };

        let line = line_at(src, offset + start);
        let mut text = &rest[..start];
        if trim_next {
            text = text.trim_start();
        }

        let after_open = &rest[start + 2..];
        let close = find_close(after_open).ok_or((line, "unclosed action".to_string()))?;
        let mut inner = &after_open[..close];

        let trim_left = inner.starts_with('-') && inner[1..].starts_with(char::is_whitespace);
        if trim_left {
            inner = &inner[1..];
            text = text.trim_end();
        }
        let trim_right =
            inner.ends_with('-') && inner[..inner.len() - 1].ends_with(char::is_whitespace);
        if trim_right {
            inner = &inner[..inner.len() - 1];
        }

        if !text.is_empty() {
            items.push(Item::Text(text.to_string()));
        }

        let body = inner.trim();
        if body.starts_with("/*") {
            if !body.ends_with("*/") || body.len() < 4 {
                return Err((line, "unclosed comment".to_string()));
            }
        } else {
            let tokens = tokenize(body).map_err(|msg| (line, msg))?;
            if tokens.is_empty() {
                return Err((line, "missing value for command".to_string()));
            }
            items.push(Item::Action { line, tokens });
        }

        trim_next = trim_right;
        let consumed = start + 2 + close + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }
}

fn line_at(src: &str, byte_offset: usize) -> usize {
    src[..byte_offset].matches('\n').count() + 1
}

/// Finds the `}}` closing the current action, skipping over quoted strings.
fn find_close(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut in_str = false;
    let mut in_raw = false;
    while i < bytes.len() {
        let b = bytes[i];
        if in_str {
            match b {
                b'\\' => i += 1,
                b'"' => in_str = false,
                _ => {}
            }
        } else if in_raw {
            if b == b'`' {
                in_raw = false;
            }
        } else {
            match b {
                b'"' => in_str = true,
                b'`' => in_raw = true,
                b'}' if bytes.get(i + 1) == Some(&b'}') => return Some(i),
                _ => {}
            }
        }
        i += 1;
    }
    None
}

fn tokenize(body: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut rest = body.trim_start();

    while !rest.is_empty() {
        let caps = TOKEN_RE.captures(rest).ok_or_else(|| {
            let c = rest.chars().next().unwrap_or(' ');
            format!("unexpected {:?} in command", c)
        })?;

        let whole = caps.get(0).map(|m| m.as_str()).unwrap_or("");
        let token = if let Some(m) = caps.name("str") {
            Token::Str(unquote(m.as_str())?)
        } else if let Some(m) = caps.name("raw") {
            let raw = m.as_str();
            Token::Str(raw[1..raw.len() - 1].to_string())
        } else if let Some(m) = caps.name("num") {
            let n = m
                .as_str()
                .parse::<i64>()
                .map_err(|e| format!("bad number {}: {}", m.as_str(), e))?;
            Token::Int(n)
        } else if let Some(m) = caps.name("root") {
            Token::Root(split_path(&m.as_str()[1..]))
        } else if let Some(m) = caps.name("field") {
            Token::Field(split_path(m.as_str()))
        } else if let Some(m) = caps.name("ident") {
            Token::Ident(m.as_str().to_string())
        } else {
            match whole {
                "|" => Token::Pipe,
                "(" => Token::LParen,
                _ => Token::RParen,
            }
        };

        tokens.push(token);
        rest = rest[whole.len()..].trim_start();
    }

    Ok(tokens)
}

fn split_path(path: &str) -> Vec<String> {
    path.split('.')
        .filter(|seg| !seg.is_empty())
        .map(str::to_string)
        .collect()
}

fn unquote(quoted: &str) -> Result<String, String> {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => return Err(format!("unknown escape sequence \\{}", other)),
            None => return Err("unterminated escape sequence".to_string()),
        }
    }
    Ok(out)
}
