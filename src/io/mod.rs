//! Collaborators at the edge of the pipeline: where file contents come
//! from and where finished documents go.

pub mod fetcher;
pub mod store;
pub mod tree;

pub use fetcher::{ContentFetcher, LocalFetcher};
pub use store::{content_key, FileStore, KeyValueStore, MemoryStore};
pub use tree::{build_file_tree, extract_meta_information, TreeNode};

use crate::core::{Error, Result, ResultExt};
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, content)
        .map_err(Error::from)
        .context(format!("Failed to write {}", path.display()))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
