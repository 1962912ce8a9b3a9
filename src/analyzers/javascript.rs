use super::{capture_all, capture_ordered};
use crate::core::{FactRecord, Language};
use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bfunction\s*\*?\s*([A-Za-z_$][\w$]*)\s*[<(]").unwrap());
static ARROW_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*(?::\s*[^=]+)?=>",
    )
    .unwrap()
});
static CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bclass\s+([A-Za-z_$][\w$]*)").unwrap());
static INTERFACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\binterface\s+([A-Za-z_$][\w$]*)").unwrap());
static ENUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\benum\s+([A-Za-z_$][\w$]*)").unwrap());

static IMPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*(?:import|export)\b[^;'"]*?\bfrom\s*['"]([^'"]+)['"]"#).unwrap()
});
static SIDE_EFFECT_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*import\s*['"]([^'"]+)['"]"#).unwrap());
static REQUIRE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(?:require|import)\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap()
});

pub fn extract_javascript(content: &str) -> FactRecord {
    extract_common(content, Language::JavaScript)
}

/// TypeScript shares the JavaScript declarations and adds interfaces and
/// enums.
pub fn extract_typescript(content: &str) -> FactRecord {
    FactRecord {
        interfaces: capture_all(&INTERFACE, content),
        enums: capture_all(&ENUM, content),
        ..extract_common(content, Language::TypeScript)
    }
}

fn extract_common(content: &str, language: Language) -> FactRecord {
    FactRecord {
        functions: capture_ordered(&[&FUNCTION, &ARROW_FUNCTION], content),
        classes: capture_all(&CLASS, content),
        raw_imports: capture_ordered(&[&IMPORT_FROM, &SIDE_EFFECT_IMPORT, &REQUIRE], content),
        ..FactRecord::new(language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_javascript_declarations() {
        let facts = extract_javascript(indoc! {r#"
            import React from 'react';
            import { useState,
                     useEffect } from "react";
            import './styles.css';
            const axios = require('axios');

            function render(props) { return null; }
            const handler = async (event) => { };
            class Widget extends Base {
            }
        "#});
        assert_eq!(facts.language, Language::JavaScript);
        assert_eq!(facts.functions, vec!["render", "handler"]);
        assert_eq!(facts.classes, vec!["Widget"]);
        assert_eq!(
            facts.raw_imports,
            vec!["react", "react", "./styles.css", "axios"]
        );
        assert!(facts.interfaces.is_empty());
    }

    #[test]
    fn test_typescript_interfaces_and_enums() {
        let facts = extract_typescript(indoc! {r#"
            import type { Config } from './config';
            export interface Props { name: string }
            export enum Mode { Light, Dark }
            export function build<T>(input: T): T { return input; }
            export const toLabel = (key: string): string => key;
        "#});
        assert_eq!(facts.interfaces, vec!["Props"]);
        assert_eq!(facts.enums, vec!["Mode"]);
        assert_eq!(facts.functions, vec!["build", "toLabel"]);
        assert_eq!(facts.raw_imports, vec!["./config"]);
    }

    #[test]
    fn test_reexports_count_as_imports() {
        let facts = extract_typescript("export { a } from '@scope/pkg/sub';\n");
        assert_eq!(facts.raw_imports, vec!["@scope/pkg/sub"]);
    }
}
