// crates/template_helpers/src/lib.rs

//! Text helpers exposed to prompt templates.
//!
//! * `truncate` – clip a string to a maximum length with a trailing `...`
//! * `md_fence` – wrap a body in a triple‑backtick block
//! * `indent`   – pad every non‑empty line
//! * `dedent`   – strip the common leading spaces

/// Returns `s` unchanged when it has at most `max_len` characters, otherwise the
/// first `max_len - 3` characters followed by `"..."`.
///
/// Lengths are counted in characters so multi-byte text is never split.
///
/// # Errors
///
/// Returns `Err(String)` when `max_len` is smaller than 3 (there is no room for
/// the ellipsis).
pub fn truncate(max_len: usize, s: &str) -> Result<String, String> {
    if max_len < 3 {
        return Err(format!(
            "truncate: maxLen must be at least 3, got {}",
            max_len
        ));
    }
    if s.chars().count() <= max_len {
        return Ok(s.to_string());
    }
    let head: String = s.chars().take(max_len - 3).collect();
    Ok(format!("{}...", head))
}

/// Wraps `body` in a fenced Markdown code block. An empty `lang` yields a bare fence.
pub fn md_fence(lang: &str, body: &str) -> String {
    format!("```{}\n{}\n```", lang, body)
}

/// Prefixes every non-empty line of `s` with `n` spaces. Empty lines stay empty.
pub fn indent(n: usize, s: &str) -> String {
    let pad = " ".repeat(n);
    s.split('\n')
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes the smallest leading-space count shared by all non-blank lines.
pub fn dedent(s: &str) -> String {
    let min_indent = s
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(leading_spaces)
        .min()
        .unwrap_or(0);

    if min_indent == 0 {
        return s.to_string();
    }

    s.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line
            } else {
                &line[min_indent..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}
