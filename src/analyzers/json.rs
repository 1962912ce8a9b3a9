use crate::core::{Language, ParseError, ParsedFile};
use serde_json::{Map, Value};
use std::path::Path;

/// Object-notation files are the one strict parse: content that does not
/// parse is reported rather than guessed at. A non-object top level is
/// wrapped under `data` so the module content is always a map.
pub fn parse_structured(path: &Path, content: &str) -> Result<ParsedFile, ParseError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| ParseError::malformed(path.display().to_string(), e.to_string()))?;

    let data = match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };

    log::debug!("Parsed {} as structured data: {} keys", path.display(), data.len());

    Ok(ParsedFile::Structured {
        language: Language::Json,
        data,
    })
}
