//! Structured ⇄ human-readable key relabeling.
//!
//! Only module `content` is relabeled; the envelope (`id`, `name`,
//! `fields`, ...) keeps its own keys so the document stays readable by the
//! rest of the pipeline in either form.

use crate::core::ConversionError;
use crate::keymap::KeyMapping;
use serde_json::{Map, Value};

/// Replace every short key in module content with its label.
pub fn structured_to_human(document: &Value, mapping: &KeyMapping) -> Result<Value, ConversionError> {
    map_module_contents(document, |content| relabel_content(content, mapping))
}

/// Exact inverse of [`structured_to_human`] through the reverse mapping.
pub fn human_to_structured(document: &Value, mapping: &KeyMapping) -> Result<Value, ConversionError> {
    map_module_contents(document, |content| unlabel_content(content, mapping))
}

pub fn relabel_content(content: &Map<String, Value>, mapping: &KeyMapping) -> Map<String, Value> {
    rename_keys(content, &|key| mapping.label(key).to_string())
}

pub fn unlabel_content(content: &Map<String, Value>, mapping: &KeyMapping) -> Map<String, Value> {
    rename_keys(content, &|key| mapping.short_key(key).to_string())
}

fn map_module_contents(
    document: &Value,
    transform: impl Fn(&Map<String, Value>) -> Map<String, Value>,
) -> Result<Value, ConversionError> {
    let Value::Object(root) = document else {
        return Err(ConversionError::shape("object", document, "$"));
    };

    let mut converted = root.clone();
    let Some(modules) = root.get("modules") else {
        return Ok(Value::Object(converted));
    };
    let Value::Array(modules) = modules else {
        return Err(ConversionError::shape("array", modules, "modules"));
    };

    let modules = modules
        .iter()
        .enumerate()
        .map(|(index, module)| {
            let Value::Object(module) = module else {
                return Err(ConversionError::shape("object", module, format!("modules[{index}]")));
            };
            let mut module = module.clone();
            match module.get("content") {
                None => {}
                Some(Value::Object(content)) => {
                    let relabeled = transform(content);
                    module.insert("content".to_string(), Value::Object(relabeled));
                }
                Some(other) => {
                    return Err(ConversionError::shape(
                        "object",
                        other,
                        format!("modules[{index}].content"),
                    ));
                }
            }
            Ok(Value::Object(module))
        })
        .collect::<Result<Vec<_>, _>>()?;

    converted.insert("modules".to_string(), Value::Array(modules));
    Ok(Value::Object(converted))
}

fn rename_keys(map: &Map<String, Value>, rename: &dyn Fn(&str) -> String) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (rename(key), rename_value(value, rename)))
        .collect()
}

fn rename_value(value: &Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(rename_keys(map, rename)),
        Value::Array(items) => Value::Array(items.iter().map(|v| rename_value(v, rename)).collect()),
        other => other.clone(),
    }
}
