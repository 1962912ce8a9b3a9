//! Human-readable document ⇄ markdown.
//!
//! Layout:
//!
//! ```text
//! # <project id>
//!
//! Version: <version>
//!
//! ## <module name>
//!
//! > <purpose>
//!
//! Label: scalar
//! Label:
//! - item
//! Label:
//!   key: value
//! ```
//!
//! Modules appear by ascending priority, fields by ascending descriptor
//! priority, then undeclared content keys in key order.

use crate::core::ConversionError;
use crate::keymap::KeyMapping;
use serde_json::{Map, Value};
use std::fmt::Write;

const DIAGNOSTIC_PREFIX: &str = "**Diagnostic:** ";

pub fn human_to_markdown(document: &Value, mapping: &KeyMapping) -> Result<String, ConversionError> {
    let Value::Object(root) = document else {
        return Err(ConversionError::shape("object", document, "$"));
    };

    let mut out = String::new();
    if let Some(project_id) = root.get("project_id").and_then(Value::as_str) {
        line(&mut out, &format!("# {project_id}"));
        line(&mut out, "");
    }
    if let Some(version) = root.get("version").and_then(Value::as_str) {
        line(&mut out, &format!("Version: {version}"));
        line(&mut out, "");
    }

    let modules = match root.get("modules") {
        None => Vec::new(),
        Some(Value::Array(modules)) => modules.iter().collect(),
        Some(other) => return Err(ConversionError::shape("array", other, "modules")),
    };

    let mut ordered = modules
        .into_iter()
        .enumerate()
        .map(|(index, module)| match module {
            Value::Object(module) => Ok(module),
            other => Err(ConversionError::shape("object", other, format!("modules[{index}]"))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    ordered.sort_by_key(|module| priority_of(module));

    for (index, module) in ordered.into_iter().enumerate() {
        write_module(&mut out, module, mapping, index)?;
    }

    Ok(out)
}

fn write_module(
    out: &mut String,
    module: &Map<String, Value>,
    mapping: &KeyMapping,
    index: usize,
) -> Result<(), ConversionError> {
    let name = module.get("name").and_then(Value::as_str).unwrap_or("Module");
    match module.get("file").and_then(Value::as_str) {
        Some(file) => line(out, &format!("## {name} ({file})")),
        None => line(out, &format!("## {name}")),
    }
    line(out, "");

    if let Some(purpose) = module.get("purpose").and_then(Value::as_str) {
        line(out, &format!("> {purpose}"));
        line(out, "");
    }
    if let Some(diagnostic) = module.get("diagnostic").and_then(Value::as_str) {
        line(out, &format!("{DIAGNOSTIC_PREFIX}{diagnostic}"));
        line(out, "");
    }

    let content = match module.get("content") {
        None => return Ok(()),
        Some(Value::Object(content)) => content,
        Some(other) => {
            return Err(ConversionError::shape(
                "object",
                other,
                format!("modules[{index}].content"),
            ))
        }
    };
    if content.is_empty() {
        return Ok(());
    }

    let mut rendered: Vec<&str> = Vec::new();
    for key in declared_keys(module) {
        let label = mapping.label(&key).to_string();
        // Content may carry the label or still the short key.
        let Some((content_key, value)) = content
            .get_key_value(label.as_str())
            .or_else(|| content.get_key_value(key.as_str()))
        else {
            continue;
        };
        if rendered.contains(&content_key.as_str()) {
            continue;
        }
        rendered.push(content_key.as_str());
        write_field(out, &label, value, mapping);
    }

    for (key, value) in content {
        if !rendered.contains(&key.as_str()) {
            write_field(out, mapping.label(key), value, mapping);
        }
    }
    line(out, "");
    Ok(())
}

// Descriptor keys by ascending priority; a descriptor needs only `key`.
fn declared_keys(module: &Map<String, Value>) -> Vec<String> {
    let Some(Value::Array(fields)) = module.get("fields") else {
        return Vec::new();
    };
    let mut keyed: Vec<(u64, String)> = fields
        .iter()
        .filter_map(|field| {
            let key = field.get("key")?.as_str()?;
            let priority = field.get("priority").and_then(Value::as_u64).unwrap_or(u64::MAX);
            Some((priority, key.to_string()))
        })
        .collect();
    keyed.sort_by_key(|(priority, _)| *priority);
    keyed.into_iter().map(|(_, key)| key).collect()
}

fn priority_of(module: &Map<String, Value>) -> u64 {
    module
        .get("priority")
        .and_then(Value::as_u64)
        .or_else(|| module.get("id").and_then(Value::as_u64))
        .unwrap_or(u64::MAX)
}

fn write_field(out: &mut String, label: &str, value: &Value, mapping: &KeyMapping) {
    match value {
        Value::Array(items) => {
            line(out, &format!("{label}:"));
            write_items(out, items, 0, mapping);
        }
        Value::Object(map) => {
            line(out, &format!("{label}:"));
            write_entries(out, map, 1, mapping);
        }
        scalar => line(out, &format!("{label}: {}", scalar_text(scalar))),
    }
}

fn write_items(out: &mut String, items: &[Value], depth: usize, mapping: &KeyMapping) {
    let indent = "  ".repeat(depth);
    for item in items {
        match item {
            Value::Object(map) if !map.is_empty() => {
                // First entry on the bullet line, the rest aligned under it.
                let mut entries = map.iter();
                if let Some((key, value)) = entries.next() {
                    write_entry(out, &format!("{indent}- "), key, value, depth + 1, mapping);
                }
                for (key, value) in entries {
                    write_entry(out, &format!("{indent}  "), key, value, depth + 1, mapping);
                }
            }
            Value::Array(nested) => {
                line(out, &format!("{indent}-"));
                write_items(out, nested, depth + 1, mapping);
            }
            scalar => line(out, &format!("{indent}- {}", scalar_text(scalar))),
        }
    }
}

fn write_entries(out: &mut String, map: &Map<String, Value>, depth: usize, mapping: &KeyMapping) {
    let indent = "  ".repeat(depth);
    for (key, value) in map {
        write_entry(out, &indent, key, value, depth + 1, mapping);
    }
}

fn write_entry(
    out: &mut String,
    prefix: &str,
    key: &str,
    value: &Value,
    depth: usize,
    mapping: &KeyMapping,
) {
    let label = mapping.label(key);
    match value {
        Value::Array(items) => {
            line(out, &format!("{prefix}{label}:"));
            write_items(out, items, depth, mapping);
        }
        Value::Object(map) => {
            line(out, &format!("{prefix}{label}:"));
            write_entries(out, map, depth, mapping);
        }
        scalar => line(out, &format!("{prefix}{label}: {}", scalar_text(scalar))),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn line(out: &mut String, text: &str) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{text}");
}

/// Read the markdown layout back into a human-readable skeleton:
/// `{project_id?, version?, modules: [{name, file?, purpose?, diagnostic?, content}]}`.
///
/// Scalars come back as strings; one level of bullets and indented
/// entries is recovered, deeper nesting is flattened into text.
pub fn markdown_to_human(markdown: &str) -> Result<Value, ConversionError> {
    if markdown.trim().is_empty() {
        return Err(ConversionError::Render("markdown input is empty".to_string()));
    }

    let mut root = Map::new();
    let mut modules: Vec<ModuleDraft> = Vec::new();
    let mut pending: Option<PendingField> = None;

    for raw in markdown.lines() {
        let trimmed_end = raw.trim_end();

        if let Some(title) = trimmed_end.strip_prefix("## ") {
            flush(&mut pending, modules.last_mut());
            modules.push(ModuleDraft::new(title.trim()));
            continue;
        }
        if let Some(title) = trimmed_end.strip_prefix("# ") {
            root.insert("project_id".to_string(), Value::String(title.trim().to_string()));
            continue;
        }

        let Some(module) = modules.last_mut() else {
            if let Some(version) = trimmed_end.strip_prefix("Version:") {
                root.insert("version".to_string(), Value::String(version.trim().to_string()));
            }
            continue;
        };

        if trimmed_end.is_empty() {
            continue;
        }
        if let Some(purpose) = trimmed_end.strip_prefix("> ") {
            module.header.insert("purpose".to_string(), Value::String(purpose.to_string()));
            continue;
        }
        if let Some(diagnostic) = trimmed_end.strip_prefix(DIAGNOSTIC_PREFIX) {
            module.header.insert("diagnostic".to_string(), Value::String(diagnostic.to_string()));
            continue;
        }

        if raw.starts_with(' ') || raw.starts_with('-') {
            if let Some(field) = pending.as_mut() {
                field.push_line(raw);
            }
            continue;
        }

        flush(&mut pending, Some(&mut *module));
        match trimmed_end.split_once(':') {
            Some((label, "")) => pending = Some(PendingField::new(label)),
            Some((label, value)) => {
                module
                    .content
                    .insert(label.to_string(), Value::String(value.trim().to_string()));
            }
            None => {}
        }
    }
    flush(&mut pending, modules.last_mut());

    root.insert(
        "modules".to_string(),
        Value::Array(modules.into_iter().map(ModuleDraft::into_value).collect()),
    );
    Ok(Value::Object(root))
}

/// A module section being read back: heading data plus content.
struct ModuleDraft {
    header: Map<String, Value>,
    content: Map<String, Value>,
}

impl ModuleDraft {
    // `Name (path/to/file)` carries the file of a file-scoped module.
    fn new(title: &str) -> Self {
        let mut header = Map::new();
        let (name, file) = match title.strip_suffix(')').and_then(|t| t.rsplit_once(" (")) {
            Some((name, file)) => (name, Some(file)),
            None => (title, None),
        };
        header.insert("name".to_string(), Value::String(name.to_string()));
        if let Some(file) = file {
            header.insert("file".to_string(), Value::String(file.to_string()));
        }
        Self {
            header,
            content: Map::new(),
        }
    }

    fn into_value(self) -> Value {
        let mut module = self.header;
        module.insert("content".to_string(), Value::Object(self.content));
        Value::Object(module)
    }
}

/// A `Label:` line whose value follows as bullets or indented entries.
struct PendingField {
    label: String,
    lines: Vec<String>,
}

impl PendingField {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            lines: Vec::new(),
        }
    }

    fn push_line(&mut self, raw: &str) {
        self.lines.push(raw.trim_end().to_string());
    }

    fn into_value(self) -> Value {
        if self.lines.iter().any(|l| l.starts_with('-')) {
            Value::Array(bullet_items(&self.lines))
        } else {
            Value::Object(entries(&self.lines))
        }
    }
}

fn flush(pending: &mut Option<PendingField>, module: Option<&mut ModuleDraft>) {
    let (Some(field), Some(module)) = (pending.take(), module) else {
        return;
    };
    let label = field.label.clone();
    module.content.insert(label, field.into_value());
}

fn bullet_items(lines: &[String]) -> Vec<Value> {
    let mut items: Vec<Vec<&str>> = Vec::new();
    for l in lines {
        match l.strip_prefix("- ").or_else(|| (l == "-").then_some("")) {
            Some(first) => items.push(vec![first]),
            None => {
                if let Some(current) = items.last_mut() {
                    current.push(l.trim_start());
                }
            }
        }
    }

    items
        .into_iter()
        .map(|parts| {
            let all_entries = parts.len() > 1 && parts.iter().all(|p| p.contains(": "));
            if all_entries {
                Value::Object(
                    parts
                        .iter()
                        .filter_map(|p| p.split_once(": "))
                        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                        .collect(),
                )
            } else {
                Value::String(parts.join(" "))
            }
        })
        .collect()
}

fn entries(lines: &[String]) -> Map<String, Value> {
    lines
        .iter()
        .filter_map(|l| l.trim_start().split_once(':'))
        .map(|(k, v)| (k.to_string(), Value::String(v.trim().to_string())))
        .collect()
}
