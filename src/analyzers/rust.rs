use super::{capture_all, capture_ordered};
use crate::core::{FactRecord, Language};
use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfn\s+(\w+)\s*[<(]").unwrap());
static STRUCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bstruct\s+(\w+)").unwrap());
static ENUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\benum\s+(\w+)").unwrap());
static TRAIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btrait\s+(\w+)").unwrap());
static USE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:pub(?:\s*\([^)]*\))?\s+)?use\s+([^;]+);").unwrap()
});
static EXTERN_CRATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*extern\s+crate\s+(\w+)").unwrap());

pub fn extract(content: &str) -> FactRecord {
    FactRecord {
        functions: capture_all(&FUNCTION, content),
        structs: capture_all(&STRUCT, content),
        enums: capture_all(&ENUM, content),
        interfaces: capture_all(&TRAIT, content),
        raw_imports: capture_ordered(&[&USE, &EXTERN_CRATE], content)
            .into_iter()
            .map(|path| use_path(&path))
            .filter(|path| !path.is_empty())
            .collect(),
        ..FactRecord::new(Language::Rust)
    }
}

// `serde::{Deserialize, Serialize}` -> `serde`, `a::b as c` -> `a::b`
fn use_path(raw: &str) -> String {
    let path = raw.split('{').next().unwrap_or(raw);
    let path = path.split(" as ").next().unwrap_or(path);
    path.trim().trim_start_matches("::").trim_end_matches("::").trim().to_string()
}
