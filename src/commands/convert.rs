use super::{capability, emit};
use crate::config::load_config;
use crate::convert::{convert, ConversionRequest, Format};
use crate::observability::{set_phase, SynthesisPhase};
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub from: Format,
    pub to: Format,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub key_mapping: Option<PathBuf>,
    pub extended: bool,
}

pub fn run_convert(options: ConvertConfig) -> Result<()> {
    let _phase = set_phase(SynthesisPhase::Conversion);
    let config = load_config();
    let mapping = config
        .key_mapping_provider(options.key_mapping.clone())
        .get_key_mapping()?;

    let input = read_input(options.input.as_ref())?;
    let request = ConversionRequest::new(options.from, options.to, input);
    let bytes = convert(&request, &mapping, capability(options.extended))?.into_bytes()?;

    emit(options.output.as_deref(), &bytes)?;
    if let Some(output) = &options.output {
        eprintln!(
            "{} {} -> {} ({})",
            "Converted".green().bold(),
            options.from,
            options.to,
            output.display()
        );
    }
    Ok(())
}

fn read_input(input: Option<&PathBuf>) -> Result<Vec<u8>> {
    match input {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut buffer = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_convert_file_to_markdown() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("doc.json");
        let output = dir.path().join("out").join("doc.md");
        fs::write(
            &input,
            r#"{"project_id": "demo", "modules": [{"id": 1, "name": "Meta Information", "content": {"p_n": "Demo"}}]}"#,
        )
        .unwrap();

        run_convert(ConvertConfig {
            from: Format::Json,
            to: Format::Markdown,
            input: Some(input),
            output: Some(output.clone()),
            key_mapping: None,
            extended: false,
        })
        .unwrap();

        let markdown = fs::read_to_string(output).unwrap();
        assert!(markdown.starts_with("# demo\n"));
        assert!(markdown.contains("Project Name: Demo"));
    }

    #[test]
    fn test_missing_input_file() {
        let err = read_input(Some(&PathBuf::from("/no/such/file.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
