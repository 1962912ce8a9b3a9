use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One entry of a repository listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Directory { name: String, children: Vec<TreeNode> },
    File { name: String, path: String },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Directory { name, .. } | TreeNode::File { name, .. } => name,
        }
    }

    /// Paths of every file below this node, depth first.
    pub fn file_paths(&self) -> Vec<&str> {
        match self {
            TreeNode::File { path, .. } => vec![path.as_str()],
            TreeNode::Directory { children, .. } => {
                children.iter().flat_map(TreeNode::file_paths).collect()
            }
        }
    }
}

#[derive(Default)]
struct DirBuilder {
    dirs: BTreeMap<String, DirBuilder>,
    files: BTreeMap<String, String>,
}

impl DirBuilder {
    fn into_nodes(self) -> Vec<TreeNode> {
        let dirs = self.dirs.into_iter().map(|(name, dir)| TreeNode::Directory {
            name,
            children: dir.into_nodes(),
        });
        let files = self
            .files
            .into_iter()
            .map(|(name, path)| TreeNode::File { name, path });
        dirs.chain(files).collect()
    }
}

/// Nest a flat list of `/`-separated paths. Directories come before files
/// at each level, both sorted by name.
pub fn build_file_tree<S: AsRef<str>>(paths: &[S]) -> Vec<TreeNode> {
    let mut root = DirBuilder::default();
    for path in paths {
        let path = path.as_ref();
        let mut parts: Vec<&str> = path.trim_matches('/').split('/').filter(|p| !p.is_empty()).collect();
        let Some(file_name) = parts.pop() else {
            continue;
        };
        let dir = parts.into_iter().fold(&mut root, |dir, part| {
            dir.dirs.entry(part.to_string()).or_default()
        });
        dir.files.insert(file_name.to_string(), path.to_string());
    }
    root.into_nodes()
}

/// `Project Name:` and `Version:` lines of a README as Meta fields.
/// Later lines overwrite earlier ones.
pub fn extract_meta_information(readme: &str) -> Map<String, Value> {
    let mut meta = Map::new();
    for line in readme.lines() {
        let key = if line.contains("Project Name:") {
            "p_n"
        } else if line.contains("Version:") {
            "p_v"
        } else {
            continue;
        };
        if let Some((_, value)) = line.split_once(':') {
            meta.insert(key.to_string(), Value::String(value.trim().to_string()));
        }
    }
    meta
}
