//! Document assembly and validation.
//!
//! Assembly is all-or-nothing: every module is checked against its field
//! descriptors and against the module dependency order before a
//! [`Document`] is produced. The first violation aborts.

use crate::core::{Result, SchemaViolation};
use crate::mapper::{Module, Relationship, TechStack};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

pub const DOCUMENT_TYPE: &str = "system_design_document";
pub const DOCUMENT_DESCRIPTION: &str =
    "This document defines the modular structure, dependencies, and adaptive components of the system.";
pub const TEMPLATE_VERSION: &str = "1.0";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMeta {
    pub document_type: String,
    pub description: String,
    pub template_version: String,
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self {
            document_type: DOCUMENT_TYPE.to_string(),
            description: DOCUMENT_DESCRIPTION.to_string(),
            template_version: TEMPLATE_VERSION.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestCase {
    pub module_name: String,
    pub description: String,
}

/// The synthesized design document. Never mutated after assembly; every
/// presentation form is a projection of it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub meta: DocumentMeta,
    pub project_id: String,
    pub version: String,
    pub modules: Vec<Module>,
    pub relationships: Vec<Relationship>,
    pub tech_stack: TechStack,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl Document {
    pub fn module(&self, id: u32) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn file_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter().filter(|m| m.file.is_some())
    }

    /// Modules that carry a per-file parse diagnostic.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&str, &str)> {
        self.modules.iter().filter_map(|m| {
            Some((m.file.as_deref()?, m.diagnostic.as_deref()?))
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Validate every module and build the document.
pub fn assemble(
    modules: Vec<Module>,
    relationships: Vec<Relationship>,
    tech_stack: TechStack,
    project_id: &str,
    version: &str,
) -> std::result::Result<Document, SchemaViolation> {
    let _span = tracing::debug_span!("assemble", modules = modules.len()).entered();

    let mut fixed_ids = BTreeSet::new();
    for module in &modules {
        if !module.kind.is_file_scoped() && !fixed_ids.insert(module.id) {
            return Err(SchemaViolation::new(
                module.id,
                "id",
                format!("{} appears more than once", module.name),
            ));
        }
        check_dependency_order(module)?;
        module.fields.validate(module.id, &module.content)?;
    }
    check_tech_stack(&tech_stack)?;

    let test_cases = modules
        .iter()
        .map(|module| TestCase {
            module_name: module.display_name(),
            description: format!("Test cases for {} functionality.", module.display_name()),
        })
        .collect();

    log::debug!(
        "Assembled document {project_id}@{version}: {} modules, {} relationships",
        modules.len(),
        relationships.len()
    );

    Ok(Document {
        meta: DocumentMeta::default(),
        project_id: project_id.to_string(),
        version: version.to_string(),
        modules,
        relationships,
        tech_stack,
        test_cases,
    })
}

// The fixed kind order is ascending id; a dependency must come strictly
// earlier, which also rules out self-dependency and cycles.
fn check_dependency_order(module: &Module) -> std::result::Result<(), SchemaViolation> {
    for dep in &module.dependencies {
        if *dep == module.id {
            return Err(SchemaViolation::new(
                module.id,
                "dependencies",
                "module depends on itself",
            ));
        }
        if *dep > module.id {
            return Err(SchemaViolation::new(
                module.id,
                "dependencies",
                format!("dependency {dep} does not precede module {}", module.id),
            ));
        }
    }
    Ok(())
}

fn check_tech_stack(stack: &TechStack) -> std::result::Result<(), SchemaViolation> {
    match stack.tools.iter().find(|tool| stack.frameworks.contains(tool)) {
        Some(tool) => Err(SchemaViolation::new(
            10,
            "tls",
            format!("`{tool}` is listed as both a framework and a tool"),
        )),
        None => Ok(()),
    }
}
