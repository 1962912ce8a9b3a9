use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# Designmap Configuration

[project]
# id = "my-project"
version = "1.0"

[key_mapping]
# JSON object of short_key -> label, laid over the builtin labels.
# Relative paths are read from this file's directory.
# path = "labels.json"
replace = false

[ignore]
patterns = [
    "target/**",
    "venv/**",
    "node_modules/**",
    "*.min.js"
]

[output]
default_format = "json"

[parallel]
enabled = true

[store]
# Defaults to the user cache directory
# path = ".designmap/store"
"#;

pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_at(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}

pub fn init_config_at(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG.as_bytes())?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config_from, parse_and_validate_config};
    use crate::convert::Format;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config = parse_and_validate_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.version(), "1.0");
        assert_eq!(config.default_format(), Format::Json);
        assert_eq!(config.ignore_patterns().len(), 4);
        assert!(config.parallel_enabled());
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        init_config_at(dir.path(), false).unwrap();
        assert!(init_config_at(dir.path(), false).is_err());
        init_config_at(dir.path(), true).unwrap();

        let config = load_config_from(dir.path());
        assert_eq!(config.ignore_patterns()[0], "target/**");
    }
}
