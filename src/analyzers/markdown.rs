use crate::core::{FactRecord, Header, Language};
use once_cell::sync::Lazy;
use regex::Regex;

// A closing `#` run only counts when whitespace precedes it.
static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*?)(?:\s+#+)?\s*$").unwrap());

/// ATX headers in document order. Lines inside fenced code blocks are
/// skipped so shell comments do not read as headers.
pub fn extract(content: &str) -> FactRecord {
    let mut headers = Vec::new();
    let mut fence: Option<&str> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();
        let marker = ["```", "~~~"].into_iter().find(|m| trimmed.starts_with(m));
        match (fence, marker) {
            (Some(open), Some(m)) if open == m => {
                fence = None;
                continue;
            }
            (None, Some(m)) => {
                fence = Some(m);
                continue;
            }
            (Some(_), _) => continue,
            (None, None) => {}
        }

        if let Some(caps) = HEADER.captures(line) {
            let text = caps[2].trim();
            if !text.is_empty() {
                headers.push(Header {
                    level: caps[1].len() as u8,
                    text: text.to_string(),
                });
            }
        }
    }

    FactRecord {
        headers,
        ..FactRecord::new(Language::Markdown)
    }
}
