//! Category tree construction.
//!
//! A [`TreeNode`] tree can be built two ways sharing one output type:
//! mirroring an existing notebook directory tree, or synthesizing the
//! hierarchy purely from the category paths collected across all notes.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Separator between segments of a category path.
pub const CATEGORY_SEPARATOR: &str = " / ";

/// Split a category path into its non-empty, trimmed segments.
///
/// `"Matura / Physik / Mechanik"` -> `["Matura", "Physik", "Mechanik"]`
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split(CATEGORY_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// A node in the notebook hierarchy. Parents exclusively own their
/// children; the tree is built once per run and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Folder or category segment name
    pub label: String,
    /// Filesystem path (mirror mode) or joined category prefix (synthesis)
    pub path: String,
    /// Child nodes, deterministic order
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        TreeNode {
            label: label.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// Mirror an existing directory tree, one node per directory.
    ///
    /// A missing (or unreadable) source directory yields a childless root
    /// rather than an error.
    pub fn mirror(dir: &Path) -> TreeNode {
        let label = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "root".to_string());
        let mut node = TreeNode::new(label, dir.to_string_lossy().to_string());

        let Ok(entries) = fs::read_dir(dir) else {
            return node;
        };

        let mut subdirs: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.path())
            .collect();
        subdirs.sort();

        for sub in subdirs {
            let child = TreeNode::mirror(&sub);
            if !node.has_child_label(&child.label) {
                node.children.push(child);
            }
        }
        node
    }

    /// Synthesize a tree from collected category paths. Pure; never touches
    /// the filesystem, and structurally empty input yields a root-only tree.
    ///
    /// Construction is two passes over lookup keys (the joined segment
    /// prefixes): first create every node identity, then link parent→child
    /// edges. A path may introduce nodes whose parent has not been visited
    /// yet, so linking cannot happen during the first iteration.
    pub fn synthesize<'a, I>(paths: I) -> TreeNode
    where
        I: IntoIterator<Item = &'a str>,
    {
        let paths: Vec<&str> = paths.into_iter().collect();

        // Pass 1: node identities keyed by joined prefix
        let mut labels: BTreeMap<String, String> = BTreeMap::new();
        for path in &paths {
            let segments = split_segments(path);
            for i in 0..segments.len() {
                let key = segments[..=i].join(CATEGORY_SEPARATOR);
                labels.entry(key).or_insert_with(|| segments[i].to_string());
            }
        }

        // Pass 2: link each node into its immediate parent's child list,
        // skipping children already present (idempotent insertion).
        let mut edges: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut top_level: Vec<String> = Vec::new();
        for path in &paths {
            let segments = split_segments(path);
            for i in 0..segments.len() {
                let key = segments[..=i].join(CATEGORY_SEPARATOR);
                if i == 0 {
                    link_child(&mut top_level, key, &labels);
                } else {
                    let parent = segments[..i].join(CATEGORY_SEPARATOR);
                    link_child(edges.entry(parent).or_default(), key, &labels);
                }
            }
        }

        let mut root = TreeNode::new("root", "");
        for key in &top_level {
            root.children.push(build_node(key, &labels, &edges));
        }
        root
    }

    /// Case-insensitive child label lookup.
    fn has_child_label(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        self.children.iter().any(|c| c.label.to_lowercase() == lower)
    }
}

/// Append `key` to `list` unless a child with the same label (ignoring
/// case) is already linked.
fn link_child(list: &mut Vec<String>, key: String, labels: &BTreeMap<String, String>) {
    let label = labels[&key].to_lowercase();
    let duplicate = list.iter().any(|k| labels[k].to_lowercase() == label);
    if !duplicate {
        list.push(key);
    }
}

/// Assemble the owned tree for `key` from the identity and edge maps.
fn build_node(
    key: &str,
    labels: &BTreeMap<String, String>,
    edges: &BTreeMap<String, Vec<String>>,
) -> TreeNode {
    let mut node = TreeNode::new(labels[key].clone(), key.to_string());
    if let Some(children) = edges.get(key) {
        for child_key in children {
            node.children.push(build_node(child_key, labels, edges));
        }
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments() {
        assert_eq!(
            split_segments("Matura / Physik / Mechanik"),
            vec!["Matura", "Physik", "Mechanik"]
        );
        // Degenerate whitespace segments are dropped, real ones survive
        assert_eq!(split_segments("  Matura  /  / "), vec!["Matura"]);
        // A slash without the full " / " separator stays inside a segment
        assert_eq!(split_segments("(III/IV) A 1"), vec!["(III/IV) A 1"]);
    }

    #[test]
    fn test_synthesize_shared_prefix() {
        let tree = TreeNode::synthesize([
            "Matura / Physik",
            "Matura / Physik / Mechanik",
            "Matura / Mathematik",
        ]);
        assert_eq!(tree.label, "root");
        assert_eq!(tree.children.len(), 1);
        let matura = &tree.children[0];
        assert_eq!(matura.label, "Matura");
        let labels: Vec<&str> = matura.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Physik", "Mathematik"]);
        assert_eq!(matura.children[0].children[0].label, "Mechanik");
    }

    #[test]
    fn test_synthesize_child_before_parent() {
        // The deeper path is seen first; the two-pass build still links it
        let tree = TreeNode::synthesize(["A / B / C", "A"]);
        assert_eq!(tree.children[0].children[0].children[0].label, "C");
    }

    #[test]
    fn test_synthesize_case_insensitive_dedup() {
        let tree = TreeNode::synthesize(["Physik / A", "physik / B"]);
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn test_synthesize_empty_input() {
        let tree = TreeNode::synthesize([]);
        assert_eq!(tree.label, "root");
        assert_eq!(tree.path, "");
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_mirror_missing_dir() {
        let tree = TreeNode::mirror(Path::new("/nonexistent/notebook"));
        assert_eq!(tree.label, "notebook");
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_mirror_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Matura/Physik")).unwrap();
        std::fs::create_dir_all(dir.path().join("Matura/Mathematik")).unwrap();
        std::fs::write(dir.path().join("Matura/notafolder.md"), "x").unwrap();

        let tree = TreeNode::mirror(dir.path());
        assert_eq!(tree.children.len(), 1);
        let matura = &tree.children[0];
        assert_eq!(matura.label, "Matura");
        let mut labels: Vec<&str> = matura.children.iter().map(|c| c.label.as_str()).collect();
        labels.sort();
        assert_eq!(labels, vec!["Mathematik", "Physik"]);
    }
}
