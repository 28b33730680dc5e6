// crates/collect_content/src/language.rs

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

static EXTENSION_LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("rs", "rust"),
        ("go", "go"),
        ("py", "python"),
        ("js", "javascript"),
        ("mjs", "javascript"),
        ("jsx", "jsx"),
        ("ts", "typescript"),
        ("tsx", "tsx"),
        ("swift", "swift"),
        ("m", "objectivec"),
        ("mm", "objectivec"),
        ("h", "c"),
        ("c", "c"),
        ("cc", "cpp"),
        ("cpp", "cpp"),
        ("hpp", "cpp"),
        ("java", "java"),
        ("kt", "kotlin"),
        ("rb", "ruby"),
        ("php", "php"),
        ("cs", "csharp"),
        ("sh", "bash"),
        ("bash", "bash"),
        ("zsh", "zsh"),
        ("toml", "toml"),
        ("yaml", "yaml"),
        ("yml", "yaml"),
        ("json", "json"),
        ("md", "markdown"),
        ("html", "html"),
        ("css", "css"),
        ("sql", "sql"),
        ("xml", "xml"),
        ("lua", "lua"),
    ]
    .into_iter()
    .collect()
});

static FILE_NAME_LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("Dockerfile", "dockerfile"),
        ("Makefile", "makefile"),
        ("makefile", "makefile"),
        ("CMakeLists.txt", "cmake"),
    ]
    .into_iter()
    .collect()
});

/// Guesses the fence language for `path`; empty when unknown.
pub fn language_for_path(path: &Path) -> &'static str {
    if let Some(lang) = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| FILE_NAME_LANGUAGES.get(n).copied())
    {
        return lang;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| EXTENSION_LANGUAGES.get(ext.to_ascii_lowercase().as_str()))
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_for_path() {
        assert_eq!(language_for_path(Path::new("src/main.rs")), "rust");
        assert_eq!(language_for_path(Path::new("App.SWIFT")), "swift");
        assert_eq!(language_for_path(Path::new("build/Dockerfile")), "dockerfile");
        assert_eq!(language_for_path(Path::new("notes.unknown")), "");
        assert_eq!(language_for_path(Path::new("LICENSE")), "");
    }
}
