//! Assigns parsed files and project metadata to module slots.
//!
//! The mapper always produces Meta Information, Technology Stack and
//! Dependency Analysis modules, one file-scoped module per parsed source
//! file, and section modules for the project sections it was given. Files
//! are visited in lexicographic path order so that "first writer wins" on
//! fixed-id kinds is reproducible.

mod kinds;
mod module;
mod relationships;

pub use kinds::{KindInfo, ModuleKind, KIND_TABLE, SECTION_KINDS};
pub use module::{Module, ProjectMeta, Relationship, RelationshipType, SkippedFile, TechStack};

use crate::core::{DependencySet, FactRecord, Language, ParseError, ParsedFile};
use crate::dependencies::is_known_framework;
use crate::keymap::KeyMapping;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Per-file parse results keyed by path.
pub type ParseResults = BTreeMap<String, Result<ParsedFile, ParseError>>;

/// Fact record fields and the content keys they are stored under.
static FACT_KEYS: &[(&str, fn(&FactRecord) -> &Vec<String>)] = &[
    ("fns", |f| &f.functions),
    ("cls", |f| &f.classes),
    ("sts", |f| &f.structs),
    ("ens", |f| &f.enums),
    ("ifs", |f| &f.interfaces),
    ("imp", |f| &f.raw_imports),
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MappingOutcome {
    pub modules: Vec<Module>,
    pub relationships: Vec<Relationship>,
    pub tech_stack: TechStack,
    pub skipped: Vec<SkippedFile>,
}

pub struct Mapper {
    key_mapping: KeyMapping,
}

impl Mapper {
    pub fn new(key_mapping: KeyMapping) -> Self {
        Self { key_mapping }
    }

    pub fn key_mapping(&self) -> &KeyMapping {
        &self.key_mapping
    }

    pub fn map(
        &self,
        files: &ParseResults,
        dependencies: &BTreeMap<String, DependencySet>,
        project_meta: &ProjectMeta,
    ) -> MappingOutcome {
        let _span = tracing::debug_span!("map_modules", files = files.len()).entered();

        let mut meta_content = self.remap_keys(&project_meta.fields);
        let mut meta_source: Option<&str> = None;
        let mut file_modules = Vec::new();
        let mut skipped = Vec::new();

        for (path, parsed) in files {
            match parsed {
                Ok(ParsedFile::Facts(facts)) if facts.language == Language::Markdown => {
                    if let Some(first) = meta_source {
                        log::debug!("Meta Information already populated by {first}, skipping {path}");
                        skipped.push(SkippedFile {
                            path: path.clone(),
                            module_id: ModuleKind::MetaInformation.id(),
                            reason: format!("Meta Information already populated by {first}"),
                        });
                        continue;
                    }
                    meta_source = Some(path.as_str());
                    meta_content.insert("hdr".to_string(), headers_value(facts));
                    meta_content.insert("src".to_string(), Value::String(path.clone()));
                }
                Ok(parsed) => file_modules.push(file_module(path, parsed)),
                Err(error) => {
                    log::warn!("Including {path} without content: {error}");
                    file_modules.push(
                        Module::new(ModuleKind::GenericFile, Map::new())
                            .with_file(path.clone())
                            .with_diagnostic(error.to_string()),
                    );
                }
            }
        }

        let tech_stack = tech_stack(files, dependencies);

        let mut modules = vec![Module::new(ModuleKind::MetaInformation, meta_content)];
        modules.extend(self.section_modules(project_meta, &mut skipped));
        modules.push(Module::new(ModuleKind::TechnologyStack, tech_stack_content(&tech_stack)));
        modules.extend(file_modules);
        modules.push(Module::new(
            ModuleKind::DependencyAnalysis,
            dependency_content(dependencies),
        ));
        modules.sort_by(|a, b| (a.priority, &a.file).cmp(&(b.priority, &b.file)));

        let mut relationships = relationships::canonical(&modules);
        relationships.extend(relationships::file_dependencies(&modules, dependencies));

        log::debug!(
            "Mapped {} files into {} modules, {} relationships, {} skipped",
            files.len(),
            modules.len(),
            relationships.len(),
            skipped.len()
        );

        MappingOutcome {
            modules,
            relationships,
            tech_stack,
            skipped,
        }
    }

    /// Resolve user-facing names to short keys; unknown keys stay verbatim.
    fn remap_keys(&self, fields: &Map<String, Value>) -> Map<String, Value> {
        fields
            .iter()
            .map(|(name, value)| {
                let key = self.key_mapping.resolve(name).unwrap_or(name.as_str());
                (key.to_string(), value.clone())
            })
            .collect()
    }

    /// Section names are matched case-insensitively, so two spellings of
    /// one kind compete for the same slot; the first in key order wins.
    fn section_modules(&self, project_meta: &ProjectMeta, skipped: &mut Vec<SkippedFile>) -> Vec<Module> {
        let mut emitted: BTreeMap<ModuleKind, &str> = BTreeMap::new();
        let mut modules = Vec::new();

        for (name, content) in &project_meta.sections {
            let Some(kind) = ModuleKind::from_name(name).filter(|kind| SECTION_KINDS.contains(kind))
            else {
                log::warn!("No section module named {name:?}, skipping");
                continue;
            };
            if let Some(first) = emitted.get(&kind) {
                log::debug!("{} already populated by section {first:?}, skipping {name:?}", kind.name());
                skipped.push(SkippedFile {
                    path: name.clone(),
                    module_id: kind.id(),
                    reason: format!("{} already populated by section {first:?}", kind.name()),
                });
                continue;
            }
            emitted.insert(kind, name.as_str());
            modules.push(Module::new(kind, self.remap_keys(content)));
        }

        modules
    }
}

fn file_module(path: &str, parsed: &ParsedFile) -> Module {
    let language = parsed.language();
    let kind = ModuleKind::for_language(language);

    let mut content = Map::new();
    content.insert("f_p".to_string(), json!(path));
    content.insert("lang".to_string(), json!(language.tag()));

    match parsed {
        ParsedFile::Facts(facts) if matches!(kind, ModuleKind::LanguageSpecific(_)) => {
            for (key, field) in FACT_KEYS {
                content.insert(key.to_string(), json!(field(facts)));
            }
        }
        ParsedFile::Facts(facts) => {
            if !facts.headers.is_empty() {
                content.insert("hdr".to_string(), headers_value(facts));
            }
            content.insert("sel".to_string(), json!(facts.selectors));
            content.insert("imp".to_string(), json!(facts.raw_imports));
        }
        ParsedFile::Structured { data, .. } => {
            content.insert("data".to_string(), Value::Object(data.clone()));
        }
    }

    Module::new(kind, content).with_file(path)
}

fn headers_value(facts: &FactRecord) -> Value {
    json!(facts.headers)
}

fn tech_stack(files: &ParseResults, dependencies: &BTreeMap<String, DependencySet>) -> TechStack {
    let languages: BTreeSet<String> = files
        .values()
        .filter_map(|parsed| parsed.as_ref().ok())
        .map(|parsed| parsed.language().tag().to_string())
        .collect();

    let tokens: BTreeSet<&String> = dependencies.values().flat_map(|d| d.non_standard()).collect();
    let (frameworks, tools): (Vec<&String>, Vec<&String>) =
        tokens.into_iter().partition(|token| is_known_framework(token));

    TechStack {
        languages: languages.into_iter().collect(),
        frameworks: frameworks.into_iter().cloned().collect(),
        tools: tools.into_iter().cloned().collect(),
    }
}

fn tech_stack_content(stack: &TechStack) -> Map<String, Value> {
    let mut content = Map::new();
    content.insert("lng".to_string(), json!(stack.languages));
    content.insert("fw".to_string(), json!(stack.frameworks));
    content.insert("tls".to_string(), json!(stack.tools));
    content
}

fn dependency_content(dependencies: &BTreeMap<String, DependencySet>) -> Map<String, Value> {
    dependencies
        .iter()
        .map(|(path, set)| (path.clone(), json!(set)))
        .collect()
}
