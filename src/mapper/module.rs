use super::kinds::ModuleKind;
use crate::schema::{self, SchemaFields};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One typed section of the design document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Module {
    pub id: u32,
    pub name: String,
    pub kind: ModuleKind,
    /// Source file of a file-scoped module. Identity is `(id, file)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub dependencies: Vec<u32>,
    pub purpose: String,
    pub category: String,
    pub priority: u32,
    pub content: Map<String, Value>,
    pub fields: SchemaFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl Module {
    /// A module of `kind` with its table row and builtin descriptors.
    pub fn new(kind: ModuleKind, content: Map<String, Value>) -> Self {
        let id = kind.id();
        Self {
            id,
            name: kind.name().to_string(),
            kind,
            file: None,
            dependencies: kind.dependencies().to_vec(),
            purpose: kind.purpose().to_string(),
            category: kind.category().to_string(),
            priority: id,
            content,
            fields: schema::fields_for(id),
            diagnostic: None,
        }
    }

    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    /// `Python Module (src/app.py)` for file-scoped modules, the kind name
    /// otherwise.
    pub fn display_name(&self) -> String {
        match &self.file {
            Some(file) => format!("{} ({file})", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Sequential,
    Dependency,
    Feedback,
    Influences,
}

/// A derived directed edge between two modules. File endpoints are set
/// when the edge connects file-scoped modules.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relationship {
    pub source: u32,
    pub target: u32,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_file: Option<String>,
}

impl Relationship {
    pub fn new(
        source: u32,
        target: u32,
        relationship_type: RelationshipType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source,
            target,
            relationship_type,
            description: description.into(),
            source_file: None,
            target_file: None,
        }
    }

    pub fn between_files(mut self, source_file: &str, target_file: &str) -> Self {
        self.source_file = Some(source_file.to_string());
        self.target_file = Some(target_file.to_string());
        self
    }
}

/// Aggregate view of the project's technology. `frameworks` and `tools`
/// are disjoint; every list is sorted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TechStack {
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
}

/// Caller-supplied project information. `fields` become the Meta content;
/// `sections` fill the section kinds by display name.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectMeta {
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub sections: BTreeMap<String, Map<String, Value>>,
}

impl ProjectMeta {
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_section(mut self, name: impl Into<String>, content: Map<String, Value>) -> Self {
        self.sections.insert(name.into(), content);
        self
    }
}

/// A file that mapped to a fixed-id kind already populated by an earlier
/// file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub module_id: u32,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Language;
    use serde_json::json;

    #[test]
    fn test_module_new_copies_table_row() {
        let module = Module::new(ModuleKind::LanguageSpecific(Language::Rust), Map::new())
            .with_file("src/lib.rs");
        assert_eq!(module.id, 13);
        assert_eq!(module.priority, 13);
        assert_eq!(module.dependencies, vec![1, 10]);
        assert_eq!(module.category, "File Specific");
        assert_eq!(module.display_name(), "Rust Module (src/lib.rs)");
        assert!(module.fields.get("f_p").is_some());
    }

    #[test]
    fn test_optional_module_fields_are_omitted() {
        let value = serde_json::to_value(Module::new(ModuleKind::MetaInformation, Map::new())).unwrap();
        assert!(value.get("file").is_none());
        assert!(value.get("diagnostic").is_none());
        assert_eq!(value["kind"], json!("meta_information"));
    }

    #[test]
    fn test_relationship_serialization() {
        let rel = Relationship::new(1, 2, RelationshipType::Sequential, "meta first");
        assert_eq!(
            serde_json::to_value(&rel).unwrap(),
            json!({"source": 1, "target": 2, "type": "sequential", "description": "meta first"})
        );
    }
}
