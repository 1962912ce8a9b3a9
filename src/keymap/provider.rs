use super::KeyMapping;
use crate::core::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Source of the key mapping consumed by the mapper and converters.
///
/// Implementations should be thread-safe (`Send + Sync`) so one provider
/// can serve parallel synthesis runs.
pub trait KeyMappingProvider: Send + Sync {
    /// May return an empty mapping; all keys then pass through unmapped.
    fn get_key_mapping(&self) -> Result<KeyMapping>;
}

/// The labels declared by the builtin schema templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinKeyMapping;

impl KeyMappingProvider for BuiltinKeyMapping {
    fn get_key_mapping(&self) -> Result<KeyMapping> {
        Ok(KeyMapping::builtin())
    }
}

/// A JSON object file of `short_key -> label` entries, either laid over the
/// builtin mapping or replacing it.
#[derive(Debug, Clone)]
pub struct JsonFileKeyMapping {
    path: PathBuf,
    replace: bool,
}

impl JsonFileKeyMapping {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            replace: false,
        }
    }

    pub fn replacing(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyMappingProvider for JsonFileKeyMapping {
    fn get_key_mapping(&self) -> Result<KeyMapping> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            Error::Configuration(format!(
                "Failed to read key mapping {}: {e}",
                self.path.display()
            ))
        })?;
        let entries = parse_mapping(&text).map_err(|reason| {
            Error::Configuration(format!(
                "Invalid key mapping {}: {reason}",
                self.path.display()
            ))
        })?;

        log::debug!(
            "Loaded {} key mapping entries from {}",
            entries.len(),
            self.path.display()
        );

        let overrides = KeyMapping::new(entries);
        Ok(if self.replace {
            overrides
        } else {
            KeyMapping::builtin().merged(overrides)
        })
    }
}

fn parse_mapping(text: &str) -> std::result::Result<BTreeMap<String, String>, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let Value::Object(map) = value else {
        return Err("expected a JSON object of key/label pairs".to_string());
    };

    map.into_iter()
        .map(|(key, label)| match label {
            Value::String(label) => Ok((key, label)),
            other => Err(format!(
                "label for `{key}` must be a string, found {}",
                crate::core::errors::value_kind(&other)
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn mapping_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_builtin_provider() {
        let mapping = BuiltinKeyMapping.get_key_mapping().unwrap();
        assert_eq!(mapping.label("tls"), "Tools");
    }

    #[test]
    fn test_json_file_overlays_builtin() {
        let file = mapping_file(r#"{"p_n": "Name", "custom": "Custom Field"}"#);
        let mapping = JsonFileKeyMapping::new(file.path()).get_key_mapping().unwrap();
        assert_eq!(mapping.label("p_n"), "Name");
        assert_eq!(mapping.label("custom"), "Custom Field");
        assert_eq!(mapping.label("p_v"), "Project Version");
    }

    #[test]
    fn test_json_file_can_replace_builtin() {
        let file = mapping_file(r#"{"p_n": "Name"}"#);
        let mapping = JsonFileKeyMapping::new(file.path())
            .replacing(true)
            .get_key_mapping()
            .unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.label("p_v"), "p_v");
    }

    #[test]
    fn test_empty_object_is_an_empty_replacement() {
        let file = mapping_file("{}");
        let mapping = JsonFileKeyMapping::new(file.path())
            .replacing(true)
            .get_key_mapping()
            .unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_non_string_label_is_rejected() {
        let file = mapping_file(r#"{"p_n": 3}"#);
        let err = JsonFileKeyMapping::new(file.path())
            .get_key_mapping()
            .unwrap_err();
        assert!(err.to_string().contains("label for `p_n` must be a string"));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = JsonFileKeyMapping::new("/nonexistent/keys.json")
            .get_key_mapping()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
