use crate::convert::Format;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for designmap
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DesignmapConfig {
    /// Project identity written into every document
    #[serde(default)]
    pub project: Option<ProjectConfig>,

    /// Where short-key labels come from
    #[serde(default)]
    pub key_mapping: Option<KeyMappingConfig>,

    /// Ignore patterns
    #[serde(default)]
    pub ignore: Option<IgnoreConfig>,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,

    /// Parallel parsing configuration
    #[serde(default)]
    pub parallel: Option<ParallelConfig>,

    /// Key-value store for persisted documents
    #[serde(default)]
    pub store: Option<StoreConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct KeyMappingConfig {
    /// JSON object file of `short_key -> label`
    pub path: Option<PathBuf>,
    /// Use the file alone instead of overlaying it on the builtin labels
    #[serde(default)]
    pub replace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct IgnoreConfig {
    /// Glob patterns matched against paths relative to the scanned root
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    pub default_format: Option<Format>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParallelConfig {
    #[serde(default = "default_parallel_enabled")]
    pub enabled: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: default_parallel_enabled(),
        }
    }
}

fn default_parallel_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root directory; defaults to the user cache directory
    pub path: Option<PathBuf>,
}
