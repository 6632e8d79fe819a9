// GitHub API response types.
// Defines structs for deserializing GitHub REST API responses.

use serde::{Deserialize, Serialize};

/// A single file (blob) taken from one recursive-tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Slash-separated path relative to the repository root.
    pub path: String,
    /// URL serving the raw file content.
    pub raw_url: String,
    pub size: Option<u64>,
    pub sha: Option<String>,
}

/// Repository metadata (subset used by the header and branch resolution).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub default_branch: String,
}

/// One commit from the list-commits endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub sha: Option<String>,
    pub commit: CommitDetail,
}

/// The `commit` object inside a list-commits item.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub committer: Option<CommitSignature>,
    pub author: Option<CommitSignature>,
}

/// Name/date signature on a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    pub date: Option<String>,
}

impl CommitInfo {
    /// Commit timestamp, preferring the committer date over the author date.
    pub fn best_date(&self) -> Option<String> {
        self.commit
            .committer
            .as_ref()
            .and_then(|s| s.date.clone())
            .or_else(|| self.commit.author.as_ref().and_then(|s| s.date.clone()))
    }
}

/// Response wrapper for the recursive-tree endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    pub tree: Vec<TreeItem>,
    #[serde(default)]
    pub truncated: bool,
}

/// One entry in a recursive-tree response. Directories arrive as
/// `tree`-type entries and are dropped; file nodes are synthesized from
/// blob paths instead.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeItem {
    pub path: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub size: Option<u64>,
    pub sha: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_date_prefers_committer() {
        let commit: CommitInfo = serde_json::from_str(
            r#"{
                "sha": "abc",
                "commit": {
                    "committer": { "date": "2024-02-01T00:00:00Z" },
                    "author": { "date": "2024-01-01T00:00:00Z" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(commit.best_date().as_deref(), Some("2024-02-01T00:00:00Z"));
    }

    #[test]
    fn test_best_date_falls_back_to_author() {
        let commit: CommitInfo = serde_json::from_str(
            r#"{
                "sha": "abc",
                "commit": {
                    "committer": null,
                    "author": { "date": "2024-01-01T00:00:00Z" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(commit.best_date().as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_tree_response_parses() {
        let response: TreeResponse = serde_json::from_str(
            r#"{
                "tree": [
                    { "path": "src", "type": "tree", "sha": "d1" },
                    { "path": "src/main.rs", "type": "blob", "size": 120, "sha": "f1" }
                ],
                "truncated": false
            }"#,
        )
        .unwrap();
        assert_eq!(response.tree.len(), 2);
        assert_eq!(response.tree[1].item_type, "blob");
        assert_eq!(response.tree[1].size, Some(120));
    }
}
