use std::fs;
use std::path::{Path, PathBuf};

use super::core::DesignmapConfig;

pub const CONFIG_FILE_NAME: &str = ".designmap.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse a config file body and check what serde cannot.
pub fn parse_and_validate_config(contents: &str) -> Result<DesignmapConfig, String> {
    let config = toml::from_str::<DesignmapConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE_NAME}: {e}"))?;

    if let Some(ignore) = &config.ignore {
        for pattern in &ignore.patterns {
            glob::Pattern::new(pattern)
                .map_err(|e| format!("Invalid ignore pattern `{pattern}`: {e}"))?;
        }
    }

    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<DesignmapConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            let base = config_path.parent().unwrap_or(Path::new("."));
            Some(config.with_paths_relative_to(base))
        }
        Err(e) => {
            log::warn!("{e}. Using defaults.");
            None
        }
    }
}

/// `start` and its ancestors, nearest first.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest `.designmap.toml` at or above `start`, or defaults.
pub fn load_config_from(start: &Path) -> DesignmapConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            DesignmapConfig::default()
        })
}

pub fn load_config() -> DesignmapConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            log::warn!("Failed to get current directory: {}. Using default config.", e);
            DesignmapConfig::default()
        }
    }
}
