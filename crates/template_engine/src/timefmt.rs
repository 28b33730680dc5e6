// crates/template_engine/src/timefmt.rs

//! Go reference-time layouts (`2006-01-02 15:04:05`) rendered through chrono.

use chrono::DateTime;
use std::fmt::Write;

/// Layout elements and their strftime equivalents. The longest match wins.
const LAYOUT_ELEMENTS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Jan", "%b"),
    ("Monday", "%A"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("2006", "%Y"),
    ("06", "%y"),
    ("01", "%m"),
    ("1", "%-m"),
    ("02", "%d"),
    ("_2", "%e"),
    ("2", "%-d"),
    ("15", "%H"),
    ("03", "%I"),
    ("3", "%-I"),
    ("04", "%M"),
    ("4", "%-M"),
    ("05", "%S"),
    ("5", "%-S"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("-07:00", "%:z"),
    ("Z07:00", "%:z"),
    ("-0700", "%z"),
    (".000000000", "%.9f"),
    (".000000", "%.6f"),
    (".000", "%.3f"),
];

pub(crate) fn layout_to_strftime(layout: &str) -> String {
    let mut out = String::with_capacity(layout.len() * 2);
    let mut rest = layout;
    while let Some(c) = rest.chars().next() {
        let element = LAYOUT_ELEMENTS
            .iter()
            .filter(|(go, _)| rest.starts_with(go))
            .max_by_key(|(go, _)| go.len());
        match element {
            Some((go, spec)) => {
                out.push_str(spec);
                rest = &rest[go.len()..];
            }
            None => {
                if c == '%' {
                    out.push_str("%%");
                } else {
                    out.push(c);
                }
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

/// Formats an RFC 3339 timestamp with a Go layout.
pub(crate) fn format_time(layout: &str, timestamp: &str) -> Result<String, String> {
    let time = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|e| format!("can't parse {:?} as a time: {}", timestamp, e))?;
    let mut out = String::new();
    write!(out, "{}", time.format(&layout_to_strftime(layout)))
        .map_err(|_| format!("invalid time layout {:?}", layout))?;
    Ok(out)
}
