//! `.designmap.toml` discovery and typed access.
//!
//! Every section is optional; the accessors below supply the defaults so
//! callers never look at `Option`s.

mod core;
mod loader;

pub use self::core::{
    DesignmapConfig, IgnoreConfig, KeyMappingConfig, OutputConfig, ParallelConfig, ProjectConfig,
    StoreConfig,
};
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};

use crate::convert::Format;
use crate::keymap::{BuiltinKeyMapping, JsonFileKeyMapping, KeyMappingProvider};
use std::path::{Path, PathBuf};

pub const DEFAULT_VERSION: &str = "1.0";

impl DesignmapConfig {
    pub fn project_id(&self) -> Option<&str> {
        self.project.as_ref()?.id.as_deref()
    }

    pub fn version(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.version.as_deref())
            .unwrap_or(DEFAULT_VERSION)
    }

    pub fn ignore_patterns(&self) -> &[String] {
        self.ignore.as_ref().map(|i| i.patterns.as_slice()).unwrap_or(&[])
    }

    pub fn default_format(&self) -> Format {
        self.output
            .as_ref()
            .and_then(|o| o.default_format)
            .unwrap_or(Format::Json)
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel.clone().unwrap_or_default().enabled
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.store.as_ref()?.path.as_deref()
    }

    /// Anchor relative file paths at `base`, the directory holding the
    /// config file they were read from.
    pub fn with_paths_relative_to(mut self, base: &Path) -> Self {
        let anchor = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if let Some(path) = self.key_mapping.as_mut().and_then(|k| k.path.as_mut()) {
            anchor(path);
        }
        if let Some(path) = self.store.as_mut().and_then(|s| s.path.as_mut()) {
            anchor(path);
        }
        self
    }

    /// Provider for the configured mapping; `override_path` (from the CLI)
    /// takes precedence over the config file entry.
    pub fn key_mapping_provider(&self, override_path: Option<PathBuf>) -> Box<dyn KeyMappingProvider> {
        let replace = self.key_mapping.as_ref().is_some_and(|k| k.replace);
        let path = override_path.or_else(|| self.key_mapping.as_ref()?.path.clone());
        match path {
            Some(path) => Box::new(JsonFileKeyMapping::new(path).replacing(replace)),
            None => Box::new(BuiltinKeyMapping),
        }
    }
}
