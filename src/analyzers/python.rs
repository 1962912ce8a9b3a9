use super::capture_all;
use crate::core::{FactRecord, Language};
use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+(\w+)[ \t]*\(").unwrap());
static CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*class[ \t]+(\w+)[ \t]*[(:]").unwrap());
static FROM_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*from\s+([.\w]+)\s+import\b").unwrap());
static IMPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*import\s+([^#;]+)").unwrap());

pub fn extract(content: &str) -> FactRecord {
    FactRecord {
        functions: capture_all(&FUNCTION, content),
        classes: capture_all(&CLASS, content),
        raw_imports: extract_imports(content),
        ..FactRecord::new(Language::Python)
    }
}

// Imports are line-scoped; `from x import y` contributes only `x`.
fn extract_imports(content: &str) -> Vec<String> {
    content
        .lines()
        .flat_map(|line| {
            if let Some(caps) = FROM_IMPORT.captures(line) {
                return vec![caps[1].to_string()];
            }
            IMPORT
                .captures(line)
                .map(|caps| split_import_list(&caps[1]))
                .unwrap_or_default()
        })
        .collect()
}

// `a, b as c` -> ["a", "b"]
fn split_import_list(list: &str) -> Vec<String> {
    list.split(',')
        .filter_map(|part| part.split_whitespace().next())
        .map(|name| name.trim_matches(|c| c == '(' || c == ')').to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scenario_imports_and_functions() {
        let facts = extract("import os\nimport requests\ndef foo():\n    pass\n");
        assert_eq!(facts.functions, vec!["foo"]);
        assert!(facts.classes.is_empty());
        assert_eq!(facts.raw_imports, vec!["os", "requests"]);
    }

    #[test]
    fn test_classes_with_and_without_bases() {
        let facts = extract(indoc! {"
            class Mapper(Base):
                def map(self):
                    pass

            class Plain:
                async def run(self):
                    pass
        "});
        assert_eq!(facts.classes, vec!["Mapper", "Plain"]);
        assert_eq!(facts.functions, vec!["map", "run"]);
    }

    #[test]
    fn test_from_import_does_not_leak_imported_names() {
        let facts = extract(indoc! {"
            from typing import Dict, Any
            from .mapper import Mapper
            import json, yaml as y
        "});
        assert_eq!(facts.raw_imports, vec!["typing", ".mapper", "json", "yaml"]);
    }

    #[test]
    fn test_tolerates_unrecognized_constructs() {
        let facts = extract("@@@ not python at all {{{\nlambda: 1\n");
        assert!(facts.functions.is_empty());
        assert!(facts.raw_imports.is_empty());
    }
}
