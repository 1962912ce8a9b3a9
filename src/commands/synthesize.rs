use super::{capability, emit};
use crate::config::{load_config_from, DesignmapConfig};
use crate::convert::{convert, ConversionRequest, Converted, Format};
use crate::io::{content_key, extract_meta_information, ContentFetcher, FileStore, KeyValueStore, LocalFetcher};
use crate::keymap::KeyMapping;
use crate::mapper::ProjectMeta;
use crate::observability::{set_phase, SynthesisPhase};
use crate::pipeline::{synthesize, FileSet, Synthesis, SynthesisOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct SynthesizeConfig {
    pub path: PathBuf,
    pub project_id: Option<String>,
    pub project_version: Option<String>,
    pub meta: Option<PathBuf>,
    pub key_mapping: Option<PathBuf>,
    pub format: Option<Format>,
    pub output: Option<PathBuf>,
    pub extended: bool,
    pub caller: Option<String>,
    pub no_parallel: bool,
}

pub fn run_synthesize(options: SynthesizeConfig) -> Result<()> {
    let config = load_config_from(&options.path);
    let mapping = config
        .key_mapping_provider(options.key_mapping.clone())
        .get_key_mapping()?;
    let (synthesis, files) = synthesize_directory(&options, &config, &mapping)?;

    let format = options.format.unwrap_or_else(|| config.default_format());
    let bytes = render(&synthesis, format, &mapping, options.extended)?;

    if let Some(caller) = &options.caller {
        let store = FileStore::new(
            config
                .store_path()
                .map(Path::to_path_buf)
                .unwrap_or_else(FileStore::default_root),
        );
        let key = format!("documents/{}", content_key(&files));
        store.save(caller, &key, &synthesis.document.to_value()?)?;
        eprintln!("{} {caller}/{key}", "Saved".green());
    }

    emit(options.output.as_deref(), &bytes)?;
    print_summary(&synthesis, files.len(), format, options.output.as_deref());
    Ok(())
}

/// Scan, fetch and synthesize; returns the input files for keying.
pub fn synthesize_directory(
    options: &SynthesizeConfig,
    config: &DesignmapConfig,
    mapping: &KeyMapping,
) -> Result<(Synthesis, FileSet)> {
    let repo = options.path.to_string_lossy().to_string();
    let fetcher = LocalFetcher::new().with_ignore_patterns(config.ignore_patterns())?;

    let files = {
        let _phase = set_phase(SynthesisPhase::FileDiscovery);
        let paths = fetcher.list_files(&options.path)?;
        log::info!("Found {} files under {repo}", paths.len());
        fetcher.fetch_contents(&repo, None, &paths)?
    };

    let meta = project_meta(options.meta.as_deref(), &files, mapping)?;

    let mut synthesis_options = SynthesisOptions::new(
        project_id(options, config),
        options
            .project_version
            .clone()
            .unwrap_or_else(|| config.version().to_string()),
    );
    synthesis_options.parallel = config.parallel_enabled() && !options.no_parallel;

    let synthesis = synthesize(&files, &meta, mapping.clone(), &synthesis_options)?;
    Ok((synthesis, files))
}

fn project_id(options: &SynthesizeConfig, config: &DesignmapConfig) -> String {
    options
        .project_id
        .clone()
        .or_else(|| config.project_id().map(str::to_string))
        .or_else(|| {
            let absolute = options.path.canonicalize().ok()?;
            Some(absolute.file_name()?.to_string_lossy().to_string())
        })
        .unwrap_or_else(|| "project".to_string())
}

/// Meta from `--meta`, with README `Project Name:`/`Version:` lines filling
/// fields the file did not set under any of their names.
fn project_meta(meta_path: Option<&Path>, files: &FileSet, mapping: &KeyMapping) -> Result<ProjectMeta> {
    let mut meta = match meta_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read project metadata {}", path.display()))?;
            parse_project_meta(path, &text)
                .with_context(|| format!("Invalid project metadata {}", path.display()))?
        }
        None => ProjectMeta::default(),
    };

    let readme = files
        .iter()
        .find(|(path, _)| path.eq_ignore_ascii_case("README.md"))
        .and_then(|(_, body)| std::str::from_utf8(body).ok());
    if let Some(readme) = readme {
        for (key, value) in extract_meta_information(readme) {
            let already_set = meta
                .fields
                .keys()
                .any(|name| mapping.resolve(name).unwrap_or(name.as_str()) == key);
            if !already_set {
                meta.fields.insert(key, value);
            }
        }
    }
    Ok(meta)
}

/// `--meta` accepts JSON, or YAML for `.yaml`/`.yml` files.
fn parse_project_meta(path: &Path, text: &str) -> Result<ProjectMeta> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    Ok(if is_yaml {
        serde_yaml::from_str(text)?
    } else {
        serde_json::from_str(text)?
    })
}

fn render(
    synthesis: &Synthesis,
    format: Format,
    mapping: &KeyMapping,
    extended: bool,
) -> Result<Vec<u8>> {
    let _phase = set_phase(SynthesisPhase::Conversion);
    let json = serde_json::to_vec(&synthesis.document)?;
    let converted = match format {
        Format::Json => Converted::Json(synthesis.document.to_value()?),
        _ => convert(
            &ConversionRequest::new(Format::Json, format, json),
            mapping,
            capability(extended),
        )?,
    };
    Ok(converted.into_bytes()?)
}

fn print_summary(synthesis: &Synthesis, files: usize, format: Format, output: Option<&Path>) {
    let document = &synthesis.document;
    let destination = output
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());

    eprintln!(
        "{} {} v{} ({format}) -> {destination}",
        "Synthesized".green().bold(),
        document.project_id.bold(),
        document.version
    );
    eprintln!(
        "  {} files, {} modules, {} relationships",
        files,
        document.modules.len(),
        document.relationships.len()
    );
    for (path, diagnostic) in document.diagnostics() {
        eprintln!("  {} {path}: {diagnostic}", "warning:".yellow());
    }
    for skip in &synthesis.skipped {
        eprintln!("  {} {}: {}", "skipped:".dimmed(), skip.path, skip.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, path: &str, body: &str) {
        let full = dir.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, body).unwrap();
    }

    #[test]
    fn test_synthesize_directory_reads_readme_meta() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "README.md", "# Shop\n\nProject Name: Shop\nVersion: 3.1\n");
        write(dir.path(), "app/main.py", "import flask\n");

        let options = SynthesizeConfig {
            path: dir.path().to_path_buf(),
            project_id: Some("shop".into()),
            ..Default::default()
        };
        let (synthesis, files) =
            synthesize_directory(&options, &DesignmapConfig::default(), &KeyMapping::builtin()).unwrap();

        assert_eq!(files.len(), 2);
        let meta = synthesis.document.module(1).unwrap();
        assert_eq!(meta.content["p_n"], "Shop");
        assert_eq!(meta.content["p_v"], "3.1");
        assert_eq!(meta.content["src"], "README.md");
        assert_eq!(synthesis.document.tech_stack.frameworks, vec!["flask"]);
    }

    #[test]
    fn test_explicit_meta_wins_over_readme() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "README.md", "Project Name: FromReadme\n");
        let meta_file = dir.path().join("meta.json");
        fs::write(&meta_file, r#"{"fields": {"Project Name": "FromFile"}}"#).unwrap();

        let mut files = FileSet::new();
        files.insert("README.md".into(), b"Project Name: FromReadme\n".to_vec());
        let meta = project_meta(Some(&meta_file), &files, &KeyMapping::builtin()).unwrap();
        assert_eq!(meta.fields["Project Name"], "FromFile");
        assert!(!meta.fields.contains_key("p_n"));

        let meta = project_meta(None, &files, &KeyMapping::builtin()).unwrap();
        assert_eq!(meta.fields["p_n"], "FromReadme");
    }

    #[test]
    fn test_yaml_project_meta() {
        let meta = parse_project_meta(
            Path::new("meta.yml"),
            "fields:\n  p_n: Shop\nsections:\n  Error Handling:\n    strat: retry\n",
        )
        .unwrap();
        assert_eq!(meta.fields["p_n"], "Shop");
        assert_eq!(meta.sections["Error Handling"]["strat"], "retry");
    }

    #[test]
    fn test_pdf_without_extended_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "main.go", "package main\n");
        let options = SynthesizeConfig {
            path: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mapping = KeyMapping::builtin();
        let (synthesis, _) = synthesize_directory(&options, &DesignmapConfig::default(), &mapping).unwrap();
        assert!(render(&synthesis, Format::Pdf, &mapping, false).is_err());
        let pdf = render(&synthesis, Format::Pdf, &mapping, true).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_project_id_falls_back_to_directory_name() {
        let dir = TempDir::new().unwrap();
        let options = SynthesizeConfig {
            path: dir.path().to_path_buf(),
            ..Default::default()
        };
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            project_id(&options, &DesignmapConfig::default()),
            expected.file_name().unwrap().to_string_lossy()
        );
    }
}
