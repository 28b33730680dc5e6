// crates/template_resolver/src/naming.rs

/// Marker that promotes a template to the front of listings.
pub const DEFAULT_MARKER: &str = ".default";

/// Derives the display name of a template from its filename stem.
///
/// Returns `(display_name, is_default)`:
///
/// * `example.default`          → `("example", true)`
/// * `another.default.template` → `("another.template", true)`
/// * `regular`                  → `("regular", false)`
///
/// Only the first `.default.` occurrence is collapsed.
pub fn classify_template_name(stem: &str) -> (String, bool) {
    let infix = format!("{}.", DEFAULT_MARKER);

    let display = if stem.contains(&infix) {
        stem.replacen(&infix, ".", 1).trim_matches('.').to_string()
    } else if let Some(base) = stem.strip_suffix(DEFAULT_MARKER) {
        base.to_string()
    } else {
        return (stem.to_string(), false);
    };

    if display.is_empty() {
        // A bare `.default.md` keeps its stem rather than vanishing from menus.
        (stem.to_string(), true)
    } else {
        (display, true)
    }
}
