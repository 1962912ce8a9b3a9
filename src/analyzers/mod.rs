//! Lexical fact extraction, one pure extractor per language.
//!
//! Extractors match declarations with precompiled patterns. They never fail
//! on constructs they do not understand; those are simply left out of the
//! resulting [`FactRecord`]. Only object-notation files are parsed strictly.

use crate::core::{FactRecord, Language, ParseError, ParsedFile};
use regex::Regex;
use std::path::Path;

pub mod css;
pub mod go;
pub mod javascript;
pub mod json;
pub mod markdown;
pub mod python;
pub mod rust;

/// A pure function from file text to extracted facts.
pub type Extractor = fn(&str) -> FactRecord;

static EXTRACTOR_MAP: &[(Language, Extractor)] = &[
    (Language::Python, python::extract),
    (Language::TypeScript, javascript::extract_typescript),
    (Language::JavaScript, javascript::extract_javascript),
    (Language::Rust, rust::extract),
    (Language::Go, go::extract),
    (Language::Markdown, markdown::extract),
    (Language::Css, css::extract),
];

pub fn get_extractor(language: Language) -> Option<Extractor> {
    EXTRACTOR_MAP
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, extractor)| *extractor)
}

/// Resolve the language of a file from its declared type, falling back to
/// the path extension when no type is declared.
pub fn resolve_language(path: &Path, declared_type: Option<&str>) -> Result<Language, ParseError> {
    match declared_type.filter(|t| !t.trim().is_empty()) {
        Some(declared) => Language::from_extension(declared)
            .ok_or_else(|| ParseError::UnsupportedType(declared.to_string())),
        None => Language::from_path(path).ok_or_else(|| {
            ParseError::UnsupportedType(
                path.extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            )
        }),
    }
}

/// Parse one file into facts (or structured data for JSON).
pub fn parse(
    path: &Path,
    content: &str,
    declared_type: Option<&str>,
) -> Result<ParsedFile, ParseError> {
    let language = resolve_language(path, declared_type)?;

    if language == Language::Json {
        return json::parse_structured(path, content);
    }

    let extractor = get_extractor(language)
        .ok_or_else(|| ParseError::UnsupportedType(language.tag().to_string()))?;
    let facts = extractor(content);

    log::debug!(
        "Parsed {} as {}: {} declarations, {} headers, {} selectors, {} imports",
        path.display(),
        language,
        facts.declaration_count(),
        facts.headers.len(),
        facts.selectors.len(),
        facts.raw_imports.len()
    );

    Ok(ParsedFile::Facts(facts))
}

/// First capture group of every match, in document order.
pub(crate) fn capture_all(pattern: &Regex, content: &str) -> Vec<String> {
    pattern
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// First capture group of every match across several patterns, merged by
/// position so the result follows the source order.
pub(crate) fn capture_ordered(patterns: &[&Regex], content: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = patterns
        .iter()
        .flat_map(|pattern| {
            pattern
                .captures_iter(content)
                .filter_map(|caps| caps.get(1))
                .map(|m| (m.start(), m.as_str().to_string()))
                .collect::<Vec<_>>()
        })
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, name)| name).collect()
}
