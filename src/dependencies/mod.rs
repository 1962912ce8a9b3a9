//! Import classification.
//!
//! Each raw import is reduced to its top-level package token and bucketed
//! as standard library, known external package, or custom (first-party).
//! Classification is stateless; a file's [`DependencySet`] depends only on
//! its own raw imports and language.

pub mod stdlib;

use crate::core::{DependencySet, Language};

pub use stdlib::{is_known_framework, library_sets, KNOWN_FRAMEWORKS};

/// Bucket every raw import of one file.
pub fn classify<S: AsRef<str>>(raw_imports: &[S], language: Language) -> DependencySet {
    let (standard, external) = library_sets(language);
    let mut set = DependencySet::default();

    for raw in raw_imports {
        let Some(token) = top_level_token(raw.as_ref(), language) else {
            continue;
        };

        let bucket = if standard.contains(&token.as_str()) {
            &mut set.standard
        } else if external.contains(&token.as_str()) {
            &mut set.external
        } else {
            &mut set.custom
        };
        bucket.insert(token.clone());
        set.all.insert(token);
    }

    set
}

/// Reduce a raw import to the package token used for classification.
/// Returns `None` when nothing nameable remains (e.g. `from . import x`).
pub fn top_level_token(raw: &str, language: Language) -> Option<String> {
    let raw = raw.trim();
    let token = match language {
        Language::Python => raw
            .trim_start_matches('.')
            .split('.')
            .next()
            .map(str::to_string),
        Language::Rust => raw
            .split("::")
            .map(str::trim)
            .find(|segment| !matches!(*segment, "" | "crate" | "self" | "super"))
            .map(str::to_string),
        Language::Go => go_token(raw),
        _ => path_token(raw),
    };
    token.filter(|t| !t.is_empty())
}

// Host-qualified module paths keep `host/owner/repo`.
fn go_token(raw: &str) -> Option<String> {
    let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
    match segments.first() {
        Some(first) if first.contains('.') => Some(segments[..segments.len().min(3)].join("/")),
        Some(first) => Some(first.to_string()),
        None => None,
    }
}

// Slash-separated specifiers: `node:` builtins, relative segments skipped,
// scoped packages kept as `@scope/name`.
fn path_token(raw: &str) -> Option<String> {
    let raw = raw.strip_prefix("node:").unwrap_or(raw);
    let mut segments = raw
        .split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."));

    let first = segments.next()?;
    if first.starts_with('@') {
        return Some(match segments.next() {
            Some(name) => format!("{first}/{name}"),
            None => first.to_string(),
        });
    }
    Some(first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_python_scenario() {
        let deps = classify(&["os", "requests"], Language::Python);
        assert_eq!(deps.standard, set(&["os"]));
        assert_eq!(deps.external, set(&["requests"]));
        assert!(deps.custom.is_empty());
        assert_eq!(deps.all, set(&["os", "requests"]));
    }

    #[test]
    fn test_python_relative_and_dotted_imports() {
        let deps = classify(&[".mapper", "os.path", "components.parser", "."], Language::Python);
        assert_eq!(deps.standard, set(&["os"]));
        assert_eq!(deps.custom, set(&["components", "mapper"]));
    }

    #[test]
    fn test_rust_crate_relative_paths() {
        let deps = classify(
            &["std::collections::HashMap", "serde", "crate::mapper::Mapper", "super::util"],
            Language::Rust,
        );
        assert_eq!(deps.standard, set(&["std"]));
        assert_eq!(deps.external, set(&["serde"]));
        assert_eq!(deps.custom, set(&["mapper", "util"]));
    }

    #[test]
    fn test_javascript_specifiers() {
        let deps = classify(
            &["node:fs/promises", "react", "@tanstack/react-query/devtools", "../lib/api", "./styles.css"],
            Language::TypeScript,
        );
        assert_eq!(deps.standard, set(&["fs"]));
        assert_eq!(deps.external, set(&["@tanstack/react-query", "react"]));
        assert_eq!(deps.custom, set(&["lib", "styles.css"]));
    }

    #[test]
    fn test_go_host_qualified_paths() {
        let deps = classify(
            &["fmt", "net/http", "github.com/gin-gonic/gin/binding", "example.com/me/app/internal"],
            Language::Go,
        );
        assert_eq!(deps.standard, set(&["fmt", "net"]));
        assert_eq!(deps.external, set(&["github.com/gin-gonic/gin"]));
        assert_eq!(deps.custom, set(&["example.com/me/app"]));
    }

    #[test]
    fn test_classification_is_case_sensitive_and_deduplicated() {
        let deps = classify(&["OS", "os", "os"], Language::Python);
        assert_eq!(deps.standard, set(&["os"]));
        assert_eq!(deps.custom, set(&["OS"]));
        assert_eq!(deps.all.len(), 2);
    }

    #[test]
    fn test_empty_imports() {
        let deps = classify::<&str>(&[], Language::Markdown);
        assert!(deps.is_empty());
    }
}
