//! Parse → classify → map → assemble over a whole file set.
//!
//! Per-file stages run in parallel when asked to; their results land in
//! `BTreeMap`s so everything downstream sees files in path order no matter
//! how the work was scheduled.

use crate::analyzers;
use crate::core::{DependencySet, ParseError, ParsedFile, Result};
use crate::dependencies;
use crate::document::{assemble, Document};
use crate::keymap::KeyMapping;
use crate::mapper::{Mapper, ParseResults, ProjectMeta, SkippedFile};
use crate::observability::{
    increment_processed, set_current_file, set_phase, set_progress, SynthesisPhase,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Raw file bodies keyed by repository-relative path.
pub type FileSet = BTreeMap<String, Vec<u8>>;

#[derive(Clone, Debug)]
pub struct SynthesisOptions {
    pub project_id: String,
    pub version: String,
    pub parallel: bool,
}

impl SynthesisOptions {
    pub fn new(project_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            version: version.into(),
            parallel: true,
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// A finished run: the document plus what the mapper left out.
#[derive(Clone, Debug)]
pub struct Synthesis {
    pub document: Document,
    pub skipped: Vec<SkippedFile>,
}

impl Synthesis {
    pub fn parse_failures(&self) -> usize {
        self.document.diagnostics().count()
    }
}

pub fn parse_file(path: &str, body: &[u8]) -> std::result::Result<ParsedFile, ParseError> {
    let _file = set_current_file(path);
    let content = std::str::from_utf8(body)
        .map_err(|e| ParseError::malformed(path, format!("content is not valid UTF-8: {e}")))?;
    analyzers::parse(Path::new(path), content, None)
}

pub fn parse_files(files: &FileSet, parallel: bool) -> ParseResults {
    let _span = tracing::info_span!("parse", files = files.len()).entered();
    set_progress(0, files.len());

    let parse_one = |(path, body): (&String, &Vec<u8>)| {
        let _phase = set_phase(SynthesisPhase::Parsing);
        let result = parse_file(path, body);
        if let Err(e) = &result {
            log::debug!("Parse failed for {path}: {e}");
        }
        increment_processed();
        (path.clone(), result)
    };

    if parallel {
        files.par_iter().map(parse_one).collect::<Vec<_>>().into_iter().collect()
    } else {
        files.iter().map(parse_one).collect()
    }
}

/// Dependency sets for every file; a file that failed to parse gets empty
/// buckets.
pub fn classify_files(parsed: &ParseResults, parallel: bool) -> BTreeMap<String, DependencySet> {
    let _span = tracing::info_span!("classify", files = parsed.len()).entered();

    let classify_one = |(path, result): (&String, &std::result::Result<ParsedFile, ParseError>)| {
        let _phase = set_phase(SynthesisPhase::Classification);
        let _file = set_current_file(path);
        let set = match result {
            Ok(parsed) => dependencies::classify(&parsed.raw_imports(), parsed.language()),
            Err(_) => DependencySet::default(),
        };
        (path.clone(), set)
    };

    if parallel {
        parsed
            .par_iter()
            .map(classify_one)
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    } else {
        parsed.iter().map(classify_one).collect()
    }
}

/// Run every stage. Parse problems stay per file; only a schema
/// violation fails the run.
pub fn synthesize(
    files: &FileSet,
    meta: &ProjectMeta,
    mapping: KeyMapping,
    options: &SynthesisOptions,
) -> Result<Synthesis> {
    let _span = tracing::info_span!("synthesize", project = %options.project_id).entered();

    let parsed = parse_files(files, options.parallel);
    let dependencies = classify_files(&parsed, options.parallel);

    let outcome = {
        let _phase = set_phase(SynthesisPhase::Mapping);
        Mapper::new(mapping).map(&parsed, &dependencies, meta)
    };
    for skip in &outcome.skipped {
        log::info!("Skipped {}: {}", skip.path, skip.reason);
    }

    let document = {
        let _phase = set_phase(SynthesisPhase::Assembly);
        assemble(
            outcome.modules,
            outcome.relationships,
            outcome.tech_stack,
            &options.project_id,
            &options.version,
        )?
    };

    log::info!(
        "Synthesized {} modules from {} files",
        document.modules.len(),
        files.len()
    );

    Ok(Synthesis {
        document,
        skipped: outcome.skipped,
    })
}
