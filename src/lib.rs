// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod convert;
pub mod core;
pub mod dependencies;
pub mod document;
pub mod io;
pub mod keymap;
pub mod mapper;
pub mod observability;
pub mod pipeline;
pub mod schema;

// Re-export commonly used types
pub use crate::core::{
    ConversionError, DependencySet, Error, ErrorCode, FactRecord, Header, Language, ParseError,
    ParsedFile, Result, ResultExt, SchemaViolation,
};

pub use crate::analyzers::parse;
pub use crate::dependencies::classify;
pub use crate::mapper::{
    Mapper, MappingOutcome, Module, ModuleKind, ProjectMeta, Relationship, RelationshipType,
    SkippedFile, TechStack,
};
pub use crate::document::{assemble, Document};
pub use crate::convert::{
    convert, human_to_markdown, human_to_structured, markdown_to_human, markdown_to_pdf,
    structured_to_human, Capability, ConversionRequest, Converted, Format,
};
pub use crate::keymap::{KeyMapping, KeyMappingProvider};
pub use crate::pipeline::{synthesize, FileSet, Synthesis, SynthesisOptions};
