//! Per-kind field descriptors.
//!
//! Every module kind carries an ordered set of descriptors. They validate
//! module content at assembly time and drive rendering order in the human
//! readable and markdown projections.

use crate::core::errors::value_kind;
use crate::core::SchemaViolation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub priority: u32,
    pub required: bool,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<FieldType>,
}

impl FieldDescriptor {
    /// Check one present value against this descriptor.
    fn check(&self, module_id: u32, value: &Value) -> Result<(), SchemaViolation> {
        if !self.field_type.accepts(value) {
            return Err(SchemaViolation::new(
                module_id,
                &self.key,
                format!(
                    "expected {}, found {}",
                    self.field_type.name(),
                    value_kind(value)
                ),
            ));
        }

        if let (Some(item_type), Value::Array(items)) = (self.items, value) {
            if let Some((index, item)) = items
                .iter()
                .enumerate()
                .find(|(_, item)| !item_type.accepts(item))
            {
                return Err(SchemaViolation::new(
                    module_id,
                    &self.key,
                    format!(
                        "item {index} expected {}, found {}",
                        item_type.name(),
                        value_kind(item)
                    ),
                ));
            }
        }

        if let (Some(allowed), Some(text)) = (&self.allowed, value.as_str()) {
            if !allowed.iter().any(|a| a == text) {
                return Err(SchemaViolation::new(
                    module_id,
                    &self.key,
                    format!("value `{text}` is not one of [{}]", allowed.join(", ")),
                ));
            }
        }

        Ok(())
    }
}

/// Ordered descriptor set of one module kind.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SchemaFields(pub Vec<FieldDescriptor>);

impl SchemaFields {
    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.0.iter().find(|d| d.key == key)
    }

    /// Descriptors by ascending priority; ties keep declaration order.
    pub fn ordered(&self) -> Vec<&FieldDescriptor> {
        let mut fields: Vec<&FieldDescriptor> = self.0.iter().collect();
        fields.sort_by_key(|d| d.priority);
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate content against the descriptors. Keys without a descriptor
    /// are accepted as-is. A null value counts as absent.
    pub fn validate(&self, module_id: u32, content: &Map<String, Value>) -> Result<(), SchemaViolation> {
        for descriptor in self.ordered() {
            match content.get(&descriptor.key) {
                None | Some(Value::Null) if descriptor.required => {
                    return Err(SchemaViolation::new(
                        module_id,
                        &descriptor.key,
                        "required field is missing",
                    ));
                }
                None | Some(Value::Null) => {}
                Some(value) => descriptor.check(module_id, value)?,
            }
        }
        Ok(())
    }
}

/// Static descriptor template.
struct FieldSpec {
    key: &'static str,
    field_type: FieldType,
    label: &'static str,
    required: bool,
    items: Option<FieldType>,
    allowed: Option<&'static [&'static str]>,
}

const fn field(key: &'static str, field_type: FieldType, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        field_type,
        label,
        required: false,
        items: None,
        allowed: None,
    }
}

const fn list(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        items: Some(FieldType::String),
        ..field(key, FieldType::Array, label)
    }
}

const fn required(spec: FieldSpec) -> FieldSpec {
    FieldSpec {
        required: true,
        ..spec
    }
}

const fn one_of(spec: FieldSpec, allowed: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        allowed: Some(allowed),
        ..spec
    }
}

pub const PROJECT_STATUSES: &[&str] = &["planning", "active", "maintenance", "archived"];
pub const LANGUAGE_TAGS: &[&str] = &[
    "python",
    "typescript",
    "javascript",
    "rust",
    "go",
    "markdown",
    "css",
    "json",
];

static META_FIELDS: &[FieldSpec] = &[
    field("p_n", FieldType::String, "Project Name"),
    field("p_v", FieldType::String, "Project Version"),
    field("p_d", FieldType::String, "Project Description"),
    one_of(field("p_s", FieldType::String, "Project Status"), PROJECT_STATUSES),
    FieldSpec {
        items: Some(FieldType::Object),
        ..field("hdr", FieldType::Array, "Headers")
    },
    field("src", FieldType::String, "Source File"),
];

static ARCHITECTURE_FIELDS: &[FieldSpec] = &[
    field("desc", FieldType::String, "Description"),
    field("cmp", FieldType::Array, "Components"),
];
static DEPENDENCY_RESOLUTION_FIELDS: &[FieldSpec] = &[
    field("desc", FieldType::String, "Description"),
    field("strat", FieldType::String, "Strategy"),
];
static ERROR_HANDLING_FIELDS: &[FieldSpec] = &[
    field("desc", FieldType::String, "Description"),
    field("strat", FieldType::String, "Strategy"),
];
static PRIORITY_FIELDS: &[FieldSpec] = &[
    field("desc", FieldType::String, "Description"),
    field("lvl", FieldType::Array, "Levels"),
];
static GLOSSARY_FIELDS: &[FieldSpec] = &[
    field("desc", FieldType::String, "Description"),
    field("terms", FieldType::Object, "Terms"),
];
static TERM_MAPPING_FIELDS: &[FieldSpec] = &[
    field("desc", FieldType::String, "Description"),
    field("maps", FieldType::Object, "Mappings"),
];
static PROPERTY_ORDER_FIELDS: &[FieldSpec] = &[
    field("desc", FieldType::String, "Description"),
    list("order", "Order"),
];
static VERSION_CONTROL_FIELDS: &[FieldSpec] = &[
    field("desc", FieldType::String, "Description"),
    field("vcs", FieldType::String, "Version Control System"),
];

static TECH_STACK_FIELDS: &[FieldSpec] = &[
    required(list("lng", "Languages")),
    required(list("fw", "Frameworks")),
    required(list("tls", "Tools")),
];

static LANGUAGE_MODULE_FIELDS: &[FieldSpec] = &[
    required(field("f_p", FieldType::String, "File Path")),
    required(one_of(field("lang", FieldType::String, "Language"), LANGUAGE_TAGS)),
    list("fns", "Functions"),
    list("cls", "Classes"),
    list("sts", "Structs"),
    list("ens", "Enums"),
    list("ifs", "Interfaces"),
    list("imp", "Imports"),
];

static GENERIC_FILE_FIELDS: &[FieldSpec] = &[
    field("f_p", FieldType::String, "File Path"),
    one_of(field("lang", FieldType::String, "Language"), LANGUAGE_TAGS),
    FieldSpec {
        items: Some(FieldType::Object),
        ..field("hdr", FieldType::Array, "Headers")
    },
    list("sel", "Selectors"),
    list("imp", "Imports"),
    field("data", FieldType::Object, "Data"),
];

static SCHEMA_TABLE: &[(u32, &[FieldSpec])] = &[
    (1, META_FIELDS),
    (2, ARCHITECTURE_FIELDS),
    (3, DEPENDENCY_RESOLUTION_FIELDS),
    (4, ERROR_HANDLING_FIELDS),
    (5, PRIORITY_FIELDS),
    (6, GLOSSARY_FIELDS),
    (7, TERM_MAPPING_FIELDS),
    (8, PROPERTY_ORDER_FIELDS),
    (9, VERSION_CONTROL_FIELDS),
    (10, TECH_STACK_FIELDS),
    (11, LANGUAGE_MODULE_FIELDS),
    (12, LANGUAGE_MODULE_FIELDS),
    (13, LANGUAGE_MODULE_FIELDS),
    (14, LANGUAGE_MODULE_FIELDS),
    (15, LANGUAGE_MODULE_FIELDS),
    (16, GENERIC_FILE_FIELDS),
];

fn specs_for(kind_id: u32) -> &'static [FieldSpec] {
    SCHEMA_TABLE
        .iter()
        .find(|(id, _)| *id == kind_id)
        .map(|(_, specs)| *specs)
        .unwrap_or(&[])
}

/// Builtin descriptors of a module kind. Kinds without a template (the
/// dependency analysis map) get an empty set.
pub fn fields_for(kind_id: u32) -> SchemaFields {
    SchemaFields(
        specs_for(kind_id)
            .iter()
            .enumerate()
            .map(|(index, spec)| FieldDescriptor {
                key: spec.key.to_string(),
                field_type: spec.field_type,
                label: spec.label.to_string(),
                priority: index as u32 + 1,
                required: spec.required,
                allowed: spec
                    .allowed
                    .map(|values| values.iter().map(|v| v.to_string()).collect()),
                items: spec.items,
            })
            .collect(),
    )
}

/// Every `(short key, label)` pair declared by any template, first
/// declaration wins.
pub fn builtin_labels() -> Vec<(&'static str, &'static str)> {
    let mut labels: Vec<(&'static str, &'static str)> = Vec::new();
    for (_, specs) in SCHEMA_TABLE {
        for spec in specs.iter() {
            if !labels.iter().any(|(key, _)| *key == spec.key) {
                labels.push((spec.key, spec.label));
            }
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Language;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn content(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_language_tags_match_language_enum() {
        assert_eq!(
            LANGUAGE_TAGS.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
            Language::all_tags()
        );
    }

    #[test]
    fn test_meta_fields_priorities_follow_declaration() {
        let fields = fields_for(1);
        let keys: Vec<(&str, u32)> = fields
            .ordered()
            .iter()
            .map(|d| (d.key.as_str(), d.priority))
            .collect();
        assert_eq!(
            keys,
            vec![("p_n", 1), ("p_v", 2), ("p_d", 3), ("p_s", 4), ("hdr", 5), ("src", 6)]
        );
        assert!(fields.0.iter().all(|d| !d.required));
    }

    #[test]
    fn test_dependency_analysis_has_no_descriptors() {
        assert!(fields_for(17).is_empty());
        assert!(fields_for(99).is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let err = fields_for(10)
            .validate(10, &content(json!({"lng": [], "fw": []})))
            .unwrap_err();
        assert_eq!(err, SchemaViolation::new(10, "tls", "required field is missing"));
    }

    #[test]
    fn test_type_and_item_mismatch() {
        let fields = fields_for(12);
        let err = fields
            .validate(12, &content(json!({"f_p": 7, "lang": "python"})))
            .unwrap_err();
        assert_eq!(err.field, "f_p");
        assert_eq!(err.reason, "expected string, found number");

        let err = fields
            .validate(
                12,
                &content(json!({"f_p": "a.py", "lang": "python", "fns": ["a", 1]})),
            )
            .unwrap_err();
        assert_eq!(err.reason, "item 1 expected string, found number");
    }

    #[test]
    fn test_enum_membership() {
        let err = fields_for(1)
            .validate(1, &content(json!({"p_s": "abandoned"})))
            .unwrap_err();
        assert_eq!(err.field, "p_s");
        assert!(err.reason.contains("planning, active, maintenance, archived"));

        assert!(fields_for(1)
            .validate(1, &content(json!({"p_s": "active", "extra": 1})))
            .is_ok());
    }

    #[test]
    fn test_descriptor_serialization_uses_schema_names() {
        let value = serde_json::to_value(&fields_for(10).0[0]).unwrap();
        assert_eq!(
            value,
            json!({
                "key": "lng",
                "type": "array",
                "label": "Languages",
                "priority": 1,
                "required": true,
                "items": "string"
            })
        );
    }

    #[test]
    fn test_builtin_labels_are_unique_per_key() {
        let labels = builtin_labels();
        assert!(labels.contains(&("p_n", "Project Name")));
        assert!(labels.contains(&("f_p", "File Path")));
        assert_eq!(labels.iter().filter(|(k, _)| *k == "imp").count(), 1);
    }
}
