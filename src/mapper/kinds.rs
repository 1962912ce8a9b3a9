use crate::core::Language;
use serde::{Deserialize, Serialize};

/// Closed set of module kinds. Ids, names, purposes, categories and the
/// required-kind edges come from [`KIND_TABLE`]; the edges there are the
/// only source of the module dependency graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    MetaInformation,
    ArchitectureInformation,
    DependencyResolution,
    ErrorHandling,
    PriorityManagement,
    AbbreviationsAndGlossary,
    TermMappings,
    PropertyOrderDefinition,
    VersionControl,
    TechnologyStack,
    LanguageSpecific(Language),
    GenericFile,
    DependencyAnalysis,
}

pub struct KindInfo {
    pub kind: ModuleKind,
    pub id: u32,
    pub name: &'static str,
    pub purpose: &'static str,
    pub category: &'static str,
    pub dependencies: &'static [u32],
}

pub static KIND_TABLE: &[KindInfo] = &[
    KindInfo {
        kind: ModuleKind::MetaInformation,
        id: 1,
        name: "Meta Information",
        purpose: "Defines the metadata and project scope.",
        category: "Metadata",
        dependencies: &[],
    },
    KindInfo {
        kind: ModuleKind::ArchitectureInformation,
        id: 2,
        name: "Architecture Information",
        purpose: "Describes the system's architecture and components.",
        category: "Architecture",
        dependencies: &[1],
    },
    KindInfo {
        kind: ModuleKind::DependencyResolution,
        id: 3,
        name: "Dependency Resolution",
        purpose: "Specifies the dependency resolution strategy between modules.",
        category: "Configuration",
        dependencies: &[1, 2],
    },
    KindInfo {
        kind: ModuleKind::ErrorHandling,
        id: 4,
        name: "Error Handling",
        purpose: "Defines error handling strategies for different system components.",
        category: "Error Management",
        dependencies: &[1],
    },
    KindInfo {
        kind: ModuleKind::PriorityManagement,
        id: 5,
        name: "Priority Management",
        purpose: "Manages task priorities across the system.",
        category: "Task Management",
        dependencies: &[1],
    },
    KindInfo {
        kind: ModuleKind::AbbreviationsAndGlossary,
        id: 6,
        name: "Abbreviations and Glossary",
        purpose: "Defines abbreviations and key terms used in the project.",
        category: "Documentation",
        dependencies: &[1],
    },
    KindInfo {
        kind: ModuleKind::TermMappings,
        id: 7,
        name: "Term Mappings",
        purpose: "Maps key concepts to implementation patterns and dependencies.",
        category: "Mapping",
        dependencies: &[1, 2],
    },
    KindInfo {
        kind: ModuleKind::PropertyOrderDefinition,
        id: 8,
        name: "Property Order Definition",
        purpose: "Defines the order in which properties are processed and prioritized.",
        category: "Configuration",
        dependencies: &[1, 2, 3],
    },
    KindInfo {
        kind: ModuleKind::VersionControl,
        id: 9,
        name: "Version Control",
        purpose: "Specifies the versioning strategy for the project.",
        category: "Versioning",
        dependencies: &[1],
    },
    KindInfo {
        kind: ModuleKind::TechnologyStack,
        id: 10,
        name: "Technology Stack",
        purpose: "Describes the languages, frameworks, and tools used in the project.",
        category: "Technology",
        dependencies: &[1],
    },
    KindInfo {
        kind: ModuleKind::LanguageSpecific(Language::TypeScript),
        id: 11,
        name: "TypeScript Module",
        purpose: "Describes key aspects of TypeScript files in the project.",
        category: "File Specific",
        dependencies: &[1, 10],
    },
    KindInfo {
        kind: ModuleKind::LanguageSpecific(Language::Python),
        id: 12,
        name: "Python Module",
        purpose: "Describes key aspects of Python files in the project.",
        category: "File Specific",
        dependencies: &[1, 10],
    },
    KindInfo {
        kind: ModuleKind::LanguageSpecific(Language::Rust),
        id: 13,
        name: "Rust Module",
        purpose: "Describes key aspects of Rust files in the project.",
        category: "File Specific",
        dependencies: &[1, 10],
    },
    KindInfo {
        kind: ModuleKind::LanguageSpecific(Language::Go),
        id: 14,
        name: "Go Module",
        purpose: "Describes key aspects of Go files in the project.",
        category: "File Specific",
        dependencies: &[1, 10],
    },
    KindInfo {
        kind: ModuleKind::LanguageSpecific(Language::JavaScript),
        id: 15,
        name: "JavaScript Module",
        purpose: "Describes key aspects of JavaScript files in the project.",
        category: "File Specific",
        dependencies: &[1, 10],
    },
    KindInfo {
        kind: ModuleKind::GenericFile,
        id: 16,
        name: "Generic File Information",
        purpose: "Stores general file metadata.",
        category: "General",
        dependencies: &[],
    },
    KindInfo {
        kind: ModuleKind::DependencyAnalysis,
        id: 17,
        name: "Dependency Analysis",
        purpose: "Tracks file dependencies and relationships.",
        category: "Dependency Analysis",
        dependencies: &[16],
    },
];

/// Section kinds populated from project metadata rather than from files.
pub const SECTION_KINDS: [ModuleKind; 8] = [
    ModuleKind::ArchitectureInformation,
    ModuleKind::DependencyResolution,
    ModuleKind::ErrorHandling,
    ModuleKind::PriorityManagement,
    ModuleKind::AbbreviationsAndGlossary,
    ModuleKind::TermMappings,
    ModuleKind::PropertyOrderDefinition,
    ModuleKind::VersionControl,
];

impl ModuleKind {
    /// Kind used for a file of the given language. Markdown feeds the
    /// project metadata; languages without a dedicated kind are generic.
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Markdown => ModuleKind::MetaInformation,
            Language::Python
            | Language::TypeScript
            | Language::JavaScript
            | Language::Rust
            | Language::Go => ModuleKind::LanguageSpecific(language),
            Language::Css | Language::Json => ModuleKind::GenericFile,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        KIND_TABLE.iter().find(|info| info.id == id).map(|info| info.kind)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        KIND_TABLE
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(name.trim()))
            .map(|info| info.kind)
    }

    pub fn info(&self) -> &'static KindInfo {
        KIND_TABLE
            .iter()
            .find(|info| info.kind == *self)
            // LanguageSpecific for a non-code language has no row of its own.
            .unwrap_or(&KIND_TABLE[15])
    }

    pub fn id(&self) -> u32 {
        self.info().id
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    pub fn purpose(&self) -> &'static str {
        self.info().purpose
    }

    pub fn category(&self) -> &'static str {
        self.info().category
    }

    pub fn dependencies(&self) -> &'static [u32] {
        self.info().dependencies
    }

    /// File-scoped kinds may have one instance per file.
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            ModuleKind::LanguageSpecific(_) | ModuleKind::GenericFile
        )
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_ids_are_ascending_and_unique() {
        let ids: Vec<u32> = KIND_TABLE.iter().map(|info| info.id).collect();
        assert_eq!(ids, (1..=17).collect::<Vec<_>>());
    }

    #[test]
    fn test_every_edge_points_to_an_earlier_kind() {
        for info in KIND_TABLE {
            for dep in info.dependencies {
                assert!(*dep < info.id, "{} depends on later kind {dep}", info.name);
            }
        }
    }

    #[test]
    fn test_required_edges() {
        assert_eq!(ModuleKind::MetaInformation.dependencies(), &[] as &[u32]);
        assert_eq!(ModuleKind::DependencyResolution.dependencies(), &[1, 2]);
        assert_eq!(ModuleKind::PropertyOrderDefinition.dependencies(), &[1, 2, 3]);
        assert_eq!(
            ModuleKind::LanguageSpecific(Language::Go).dependencies(),
            &[1, 10]
        );
        assert_eq!(ModuleKind::DependencyAnalysis.dependencies(), &[16]);
    }

    #[test]
    fn test_kind_for_language() {
        assert_eq!(
            ModuleKind::for_language(Language::Markdown),
            ModuleKind::MetaInformation
        );
        assert_eq!(ModuleKind::for_language(Language::Json).id(), 16);
        assert_eq!(ModuleKind::for_language(Language::Python).id(), 12);
        assert_eq!(ModuleKind::for_language(Language::JavaScript).id(), 15);
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        assert_eq!(
            ModuleKind::from_name("version control"),
            Some(ModuleKind::VersionControl)
        );
        assert_eq!(ModuleKind::from_id(13), Some(ModuleKind::LanguageSpecific(Language::Rust)));
        assert_eq!(ModuleKind::from_id(18), None);
    }

    #[test]
    fn test_file_scope() {
        assert!(ModuleKind::GenericFile.is_file_scoped());
        assert!(ModuleKind::LanguageSpecific(Language::Rust).is_file_scoped());
        assert!(!ModuleKind::MetaInformation.is_file_scoped());
        assert!(!ModuleKind::DependencyAnalysis.is_file_scoped());
    }
}
