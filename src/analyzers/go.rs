use super::capture_all;
use crate::core::{FactRecord, Language};
use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^func\s+(?:\([^)]*\)\s*)?(\w+)\s*[\[(]").unwrap());
static STRUCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btype\s+(\w+)\s+struct\b").unwrap());
static INTERFACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btype\s+(\w+)\s+interface\b").unwrap());
static IMPORT_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*import\s+(?:[\w.]+\s+)?"([^"]+)""#).unwrap());
static IMPORT_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\bimport\s*\((.*?)\)").unwrap());
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());

pub fn extract(content: &str) -> FactRecord {
    FactRecord {
        functions: capture_all(&FUNCTION, content),
        structs: capture_all(&STRUCT, content),
        interfaces: capture_all(&INTERFACE, content),
        raw_imports: extract_imports(content),
        ..FactRecord::new(Language::Go)
    }
}

fn extract_imports(content: &str) -> Vec<String> {
    let mut imports: Vec<(usize, String)> = IMPORT_SINGLE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str().to_string()))
        .collect();

    for block in IMPORT_BLOCK.captures_iter(content) {
        if let Some(body) = block.get(1) {
            imports.extend(
                QUOTED
                    .captures_iter(body.as_str())
                    .filter_map(|caps| caps.get(1))
                    .map(|m| (body.start() + m.start(), m.as_str().to_string())),
            );
        }
    }

    imports.sort_by_key(|(pos, _)| *pos);
    imports.into_iter().map(|(_, path)| path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_go_declarations_and_block_imports() {
        let facts = extract(indoc! {r#"
            package main

            import (
                "fmt"
                "net/http"
                gin "github.com/gin-gonic/gin"
            )

            type Server struct {
                addr string
            }

            type Handler interface {
                Serve()
            }

            func (s *Server) Start() error {
                return nil
            }

            func main() {
                fmt.Println("hi")
            }
        "#});
        assert_eq!(facts.functions, vec!["Start", "main"]);
        assert_eq!(facts.structs, vec!["Server"]);
        assert_eq!(facts.interfaces, vec!["Handler"]);
        assert_eq!(
            facts.raw_imports,
            vec!["fmt", "net/http", "github.com/gin-gonic/gin"]
        );
    }

    #[test]
    fn test_single_import() {
        let facts = extract("package x\nimport \"os\"\nfunc Map[T any](v T) T { return v }\n");
        assert_eq!(facts.raw_imports, vec!["os"]);
        assert_eq!(facts.functions, vec!["Map"]);
    }
}
