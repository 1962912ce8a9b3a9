use super::{Module, Relationship, RelationshipType};
use crate::core::DependencySet;
use std::collections::BTreeMap;
use std::path::{Component, Path};

static CANONICAL_RELATIONSHIPS: &[(u32, u32, RelationshipType, &str)] = &[
    (
        1,
        2,
        RelationshipType::Sequential,
        "Meta information must be processed before defining the architecture.",
    ),
    (
        2,
        3,
        RelationshipType::Dependency,
        "The architecture module depends on dependency resolution strategies.",
    ),
    (
        4,
        8,
        RelationshipType::Feedback,
        "Error handling strategies affect property order processing.",
    ),
    (
        5,
        10,
        RelationshipType::Influences,
        "Priority management influences the technology stack selection.",
    ),
];

/// Fixed edges between section kinds, emitted when both ends exist.
pub(super) fn canonical(modules: &[Module]) -> Vec<Relationship> {
    let present = |id: u32| modules.iter().any(|m| m.id == id);
    CANONICAL_RELATIONSHIPS
        .iter()
        .filter(|(source, target, _, _)| present(*source) && present(*target))
        .map(|(source, target, kind, description)| {
            Relationship::new(*source, *target, *kind, *description)
        })
        .collect()
}

/// One `dependency` edge per (import token, matching file) pair. Tokens
/// that match no other file produce nothing. Duplicates are kept.
pub(super) fn file_dependencies(
    modules: &[Module],
    dependencies: &BTreeMap<String, DependencySet>,
) -> Vec<Relationship> {
    let mut files: Vec<(&str, &Module)> = modules
        .iter()
        .filter(|m| m.kind.is_file_scoped())
        .filter_map(|m| m.file.as_deref().map(|file| (file, m)))
        .collect();
    files.sort_by_key(|(file, _)| *file);

    let mut relationships = Vec::new();
    for (source_file, source) in &files {
        let Some(set) = dependencies.get(*source_file) else {
            continue;
        };
        for token in &set.all {
            for (target_file, target) in &files {
                if target_file == source_file || !path_matches(target_file, token) {
                    continue;
                }
                relationships.push(
                    Relationship::new(
                        source.id,
                        target.id,
                        RelationshipType::Dependency,
                        format!("{source_file} imports `{token}` from {target_file}"),
                    )
                    .between_files(source_file, target_file),
                );
            }
        }
    }
    relationships
}

/// A token names a file by its stem or full name, or a directory that
/// holds it at the top level of the tree.
fn path_matches(path: &str, token: &str) -> bool {
    let path = Path::new(path);
    let by_name = path.file_stem().is_some_and(|stem| stem == token)
        || path.file_name().is_some_and(|name| name == token);
    if by_name {
        return true;
    }

    let mut components = path.components().filter(|c| matches!(c, Component::Normal(_)));
    match (components.next(), components.next()) {
        (Some(Component::Normal(top)), Some(_)) => top == token,
        _ => false,
    }
}
