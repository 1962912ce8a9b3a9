pub mod errors;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

pub use errors::{
    value_kind, ConversionError, Error, ErrorCode, ParseError, Result, ResultExt, SchemaViolation,
};

/// Languages the parser knows how to extract facts from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    TypeScript,
    JavaScript,
    Rust,
    Go,
    Markdown,
    Css,
    Json,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::Python,
        Language::TypeScript,
        Language::JavaScript,
        Language::Rust,
        Language::Go,
        Language::Markdown,
        Language::Css,
        Language::Json,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[
            (&["py"], Language::Python),
            (&["js", "jsx", "mjs", "cjs"], Language::JavaScript),
            (&["ts", "tsx", "mts", "cts"], Language::TypeScript),
            (&["rs"], Language::Rust),
            (&["go"], Language::Go),
            (&["md", "markdown"], Language::Markdown),
            (&["css"], Language::Css),
            (&["json"], Language::Json),
        ];

        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext.as_str()))
            .map(|(_, lang)| *lang)
    }

    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Lowercase tag used in serialized content and schema enums.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Markdown => "markdown",
            Language::Css => "css",
            Language::Json => "json",
        }
    }

    pub fn all_tags() -> Vec<String> {
        Self::ALL.iter().map(|l| l.tag().to_string()).collect()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Language, &str)] = &[
            (Language::Python, "Python"),
            (Language::TypeScript, "TypeScript"),
            (Language::JavaScript, "JavaScript"),
            (Language::Rust, "Rust"),
            (Language::Go, "Go"),
            (Language::Markdown, "Markdown"),
            (Language::Css, "CSS"),
            (Language::Json, "JSON"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(l, _)| l == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// A markdown header: nesting level and text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub level: u8,
    pub text: String,
}

/// Facts extracted from one source file. Every field is always present;
/// fields that do not apply to a language stay empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FactRecord {
    pub language: Language,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub structs: Vec<String>,
    pub enums: Vec<String>,
    pub interfaces: Vec<String>,
    pub headers: Vec<Header>,
    pub selectors: Vec<String>,
    pub raw_imports: Vec<String>,
}

impl FactRecord {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            functions: Vec::new(),
            classes: Vec::new(),
            structs: Vec::new(),
            enums: Vec::new(),
            interfaces: Vec::new(),
            headers: Vec::new(),
            selectors: Vec::new(),
            raw_imports: Vec::new(),
        }
    }

    /// Total number of extracted declarations, used for log summaries.
    pub fn declaration_count(&self) -> usize {
        self.functions.len()
            + self.classes.len()
            + self.structs.len()
            + self.enums.len()
            + self.interfaces.len()
    }
}

/// Result of parsing one file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParsedFile {
    Facts(FactRecord),
    /// Object-notation files bypass the fact shape and carry their data.
    Structured {
        language: Language,
        data: Map<String, Value>,
    },
}

impl ParsedFile {
    pub fn language(&self) -> Language {
        match self {
            ParsedFile::Facts(facts) => facts.language,
            ParsedFile::Structured { language, .. } => *language,
        }
    }

    /// Import names as written in the source. Manifest-style structured
    /// files contribute the names listed under their dependency members.
    pub fn raw_imports(&self) -> Vec<String> {
        match self {
            ParsedFile::Facts(facts) => facts.raw_imports.clone(),
            ParsedFile::Structured { data, .. } => manifest_dependencies(data),
        }
    }

    pub fn facts(&self) -> Option<&FactRecord> {
        match self {
            ParsedFile::Facts(facts) => Some(facts),
            ParsedFile::Structured { .. } => None,
        }
    }
}

const MANIFEST_DEPENDENCY_KEYS: &[&str] = &["dependencies", "devDependencies", "peerDependencies"];

fn manifest_dependencies(data: &Map<String, Value>) -> Vec<String> {
    MANIFEST_DEPENDENCY_KEYS
        .iter()
        .filter_map(|key| data.get(*key))
        .flat_map(|deps| match deps {
            Value::Object(map) => map.keys().cloned().collect::<Vec<_>>(),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        })
        .collect()
}

/// Classified imports of one file. `all` is always the union of the three
/// disjoint buckets.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencySet {
    pub standard: BTreeSet<String>,
    pub external: BTreeSet<String>,
    pub custom: BTreeSet<String>,
    pub all: BTreeSet<String>,
}

impl DependencySet {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Tokens that feed the tool list of the technology stack.
    pub fn non_standard(&self) -> impl Iterator<Item = &String> {
        self.external.iter().chain(self.custom.iter())
    }
}
