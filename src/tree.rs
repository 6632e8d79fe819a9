// Tree construction from flat blob paths.
// The tree is rebuilt wholesale on every entry or filter change; inputs
// are capped at a few hundred entries, so a full rebuild stays cheap and
// keeps the invariants simple.

use std::collections::HashMap;

use crate::github::FileEntry;

/// A node in the reconstructed repository tree. Exactly one root exists,
/// with an empty name and path; every other node's path is its parent's
/// path joined with its name by '/'.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Full path from the repository root ("" for the root itself).
    pub path: String,
    pub kind: NodeKind,
}

/// File/directory distinction as a tagged union so the difference is
/// exhaustive instead of field-presence-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File {
        raw_url: String,
        size: Option<u64>,
        sha: Option<String>,
    },
    Directory {
        /// Children in first-encountered (insertion) order.
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    fn root() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => &[],
        }
    }
}

/// Directory expansion state, keyed by full directory path. Absent means
/// collapsed; the synthetic root is always expanded.
pub type ExpandedSet = HashMap<String, bool>;

/// One row of the flattened, depth-first projection of the visible tree.
/// Owned fields so the renderer and navigation can outlive tree rebuilds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub name: String,
    pub path: String,
    pub depth: usize,
    pub is_file: bool,
    pub expanded: bool,
    pub raw_url: Option<String>,
    pub size: Option<u64>,
    pub sha: Option<String>,
}

/// Build a tree from a flat list of file entries. Directory nodes are
/// created on first encounter of a name under a given parent; the last
/// path segment becomes a file leaf. Entries with an empty path are
/// skipped.
pub fn build(entries: &[FileEntry]) -> TreeNode {
    let mut root = TreeNode::root();
    for entry in entries {
        if entry.path.is_empty() {
            continue;
        }
        insert_entry(&mut root, entry);
    }
    root
}

/// Build a tree from only the entries whose full path contains the filter
/// as a case-insensitive substring. An empty filter is no filter.
pub fn build_filtered(entries: &[FileEntry], filter: &str) -> TreeNode {
    if filter.is_empty() {
        return build(entries);
    }
    let needle = filter.to_lowercase();
    let matched: Vec<FileEntry> = entries
        .iter()
        .filter(|e| e.path.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    build(&matched)
}

fn insert_entry(root: &mut TreeNode, entry: &FileEntry) {
    let segments: Vec<&str> = entry.path.split('/').collect();
    let mut current = root;
    let mut current_path = String::new();

    for (idx, segment) in segments.iter().enumerate() {
        if !current_path.is_empty() {
            current_path.push('/');
        }
        current_path.push_str(segment);
        let last = idx == segments.len() - 1;

        let NodeKind::Directory { children } = &mut current.kind else {
            // A file already occupies this segment; duplicate or
            // conflicting paths are dropped rather than clobbered.
            return;
        };

        let position = children.iter().position(|c| c.name == *segment);
        let position = match position {
            Some(pos) => pos,
            None => {
                children.push(TreeNode {
                    name: segment.to_string(),
                    path: current_path.clone(),
                    kind: if last {
                        NodeKind::File {
                            raw_url: entry.raw_url.clone(),
                            size: entry.size,
                            sha: entry.sha.clone(),
                        }
                    } else {
                        NodeKind::Directory {
                            children: Vec::new(),
                        }
                    },
                });
                children.len() - 1
            }
        };

        current = &mut children[position];
    }
}

/// Flatten the tree into the ordered row list handed to the windowed
/// renderer and keyboard navigation: depth-first, siblings in insertion
/// order, descending into a directory only when it is the root or marked
/// expanded. Root's direct children sit at depth 0.
pub fn flatten_visible(root: &TreeNode, expanded: &ExpandedSet) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    for child in root.children() {
        walk(child, 0, expanded, &mut rows);
    }
    rows
}

fn walk(node: &TreeNode, depth: usize, expanded: &ExpandedSet, rows: &mut Vec<VisibleRow>) {
    let is_expanded = expanded.get(&node.path).copied().unwrap_or(false);
    rows.push(match &node.kind {
        NodeKind::File { raw_url, size, sha } => VisibleRow {
            name: node.name.clone(),
            path: node.path.clone(),
            depth,
            is_file: true,
            expanded: false,
            raw_url: Some(raw_url.clone()),
            size: *size,
            sha: sha.clone(),
        },
        NodeKind::Directory { .. } => VisibleRow {
            name: node.name.clone(),
            path: node.path.clone(),
            depth,
            is_file: false,
            expanded: is_expanded,
            raw_url: None,
            size: None,
            sha: None,
        },
    });

    if !node.is_file() && is_expanded {
        for child in node.children() {
            walk(child, depth + 1, expanded, rows);
        }
    }
}
