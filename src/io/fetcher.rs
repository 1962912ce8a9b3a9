use super::tree::{build_file_tree, TreeNode};
use crate::core::{Error, Language, Result};
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Source of repository listings and file bodies.
///
/// Implementations should be thread-safe (`Send + Sync`). `fetch_contents`
/// may return fewer entries than requested; missing paths are simply
/// absent from the map.
pub trait ContentFetcher: Send + Sync {
    fn fetch_tree(&self, repo: &str, branch: Option<&str>) -> Result<Vec<TreeNode>>;

    fn fetch_contents(
        &self,
        repo: &str,
        branch: Option<&str>,
        paths: &[String],
    ) -> Result<BTreeMap<String, Vec<u8>>>;
}

/// Reads a checked-out repository from disk. `repo` is a directory; the
/// branch is whatever is checked out.
#[derive(Debug, Default, Clone)]
pub struct LocalFetcher {
    ignore_patterns: Vec<glob::Pattern>,
}

impl LocalFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        self.ignore_patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p.as_ref()))
            .collect::<std::result::Result<_, _>>()?;
        Ok(self)
    }

    /// Relative `/`-separated paths of every parseable file under `root`,
    /// sorted.
    pub fn list_files(&self, root: &Path) -> Result<Vec<String>> {
        if !root.is_dir() {
            return Err(Error::Fetch(format!("{} is not a directory", root.display())));
        }

        let mut files = Vec::new();
        for entry in WalkBuilder::new(root).git_ignore(true).build() {
            let entry = entry.map_err(|e| Error::Fetch(e.to_string()))?;
            let path = entry.path();
            if !path.is_file() || Language::from_path(path).is_none() {
                continue;
            }
            let Some(relative) = relative_path(root, path) else {
                continue;
            };
            if self.is_ignored(&relative) {
                log::debug!("Ignoring {relative}");
                continue;
            }
            files.push(relative);
        }
        files.sort();
        Ok(files)
    }

    fn is_ignored(&self, relative: &str) -> bool {
        self.ignore_patterns.iter().any(|p| p.matches(relative))
    }
}

impl ContentFetcher for LocalFetcher {
    fn fetch_tree(&self, repo: &str, branch: Option<&str>) -> Result<Vec<TreeNode>> {
        if let Some(branch) = branch {
            log::debug!("Local fetcher ignores branch {branch}");
        }
        Ok(build_file_tree(&self.list_files(Path::new(repo))?))
    }

    fn fetch_contents(
        &self,
        repo: &str,
        _branch: Option<&str>,
        paths: &[String],
    ) -> Result<BTreeMap<String, Vec<u8>>> {
        let root = Path::new(repo);
        if !root.is_dir() {
            return Err(Error::Fetch(format!("{repo} is not a directory")));
        }

        let mut contents = BTreeMap::new();
        for path in paths {
            let Some(full) = contained_path(root, path) else {
                log::warn!("Refusing to read {path}: outside of {repo}");
                continue;
            };
            match fs::read(&full) {
                Ok(bytes) => {
                    contents.insert(path.clone(), bytes);
                }
                Err(e) => log::warn!("Skipping {path}: {e}"),
            }
        }
        Ok(contents)
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

// Only plain relative components; no `..`, no absolute paths.
fn contained_path(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        .then(|| root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        let files = [
            ("README.md", "# Demo\n"),
            ("src/app.py", "import os\n"),
            ("src/util.py", "def f():\n    pass\n"),
            ("web/index.js", "import React from 'react';\n"),
            ("web/dist/bundle.min.js", "var a;\n"),
            ("notes.txt", "not parsed\n"),
        ];
        for (path, body) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, body).unwrap();
        }
        dir
    }

    #[test]
    fn test_list_files_filters_unsupported_and_ignored() {
        let dir = repo();
        let fetcher = LocalFetcher::new()
            .with_ignore_patterns(&["web/dist/**"])
            .unwrap();
        assert_eq!(
            fetcher.list_files(dir.path()).unwrap(),
            vec!["README.md", "src/app.py", "src/util.py", "web/index.js"]
        );
    }

    #[test]
    fn test_fetch_contents_is_partial() {
        let dir = repo();
        let repo = dir.path().to_string_lossy().to_string();
        let contents = LocalFetcher::new()
            .fetch_contents(
                &repo,
                None,
                &["src/app.py".to_string(), "missing.py".to_string(), "../etc/passwd".to_string()],
            )
            .unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents["src/app.py"], b"import os\n");
    }

    #[test]
    fn test_fetch_tree_builds_nested_listing() {
        let dir = repo();
        let repo = dir.path().to_string_lossy().to_string();
        let tree = LocalFetcher::new().fetch_tree(&repo, Some("main")).unwrap();
        let names: Vec<&str> = tree.iter().map(TreeNode::name).collect();
        assert_eq!(names, vec!["src", "web", "README.md"]);
    }

    #[test]
    fn test_missing_root_is_a_fetch_error() {
        let err = LocalFetcher::new()
            .list_files(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let err = LocalFetcher::new().with_ignore_patterns(&["a/***"]).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }
}
