use crate::core::{FactRecord, Language};
use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static SELECTOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^{};]+)\{").unwrap());
static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@import\s+(?:url\(\s*)?['"]?([^'")\s;]+)"#).unwrap()
});

pub fn extract(content: &str) -> FactRecord {
    let stripped = COMMENT.replace_all(content, "");

    let selectors = SELECTOR
        .captures_iter(&stripped)
        .map(|caps| normalize_whitespace(&caps[1]))
        .filter(|selector| !selector.is_empty() && !selector.starts_with('@'))
        .collect();

    let raw_imports = IMPORT
        .captures_iter(&stripped)
        .map(|caps| caps[1].to_string())
        .collect();

    FactRecord {
        selectors,
        raw_imports,
        ..FactRecord::new(Language::Css)
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_selectors_skip_comments_and_at_rules() {
        let facts = extract(indoc! {r#"
            @import url("reset.css");
            @import 'theme/dark.css';
            /* .hidden { display: none } */
            body,
            html { margin: 0; }
            @media (max-width: 600px) {
                .card > h2 { font-size: 1rem; }
            }
        "#});
        assert_eq!(facts.selectors, vec!["body, html", ".card > h2"]);
        assert_eq!(facts.raw_imports, vec!["reset.css", "theme/dark.css"]);
        assert!(facts.functions.is_empty());
    }

    #[test]
    fn test_unbalanced_input_is_tolerated() {
        let facts = extract("a { color: red;\n}}} {");
        assert_eq!(facts.selectors, vec!["a"]);
    }
}
