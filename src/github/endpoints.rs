// GitHub API endpoint functions.
// Typed methods for the four upstream operations plus raw-content retrieval.

use crate::error::Result;

use super::client::{ACCEPT_JSON, ACCEPT_RAW, GitHubClient};
use super::types::{CommitInfo, FileEntry, RepoInfo, TreeResponse};

/// Trees larger than this are truncated to bound rendering and memory cost.
pub const MAX_TREE_ENTRIES: usize = 500;

impl GitHubClient {
    /// Get the most recent commit touching a path on a branch.
    /// Returns an empty vec when the path has no history.
    pub async fn latest_commit(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Vec<CommitInfo>> {
        let params = [("path", path), ("per_page", "1"), ("sha", branch)];
        let response = self
            .get_with_params(
                &format!("/repos/{}/{}/commits", owner, repo),
                ACCEPT_JSON,
                &params,
            )
            .await?;
        let commits: Vec<CommitInfo> = response.json().await?;
        Ok(commits)
    }

    /// Get a repository's README as raw text.
    pub async fn readme_raw(&self, owner: &str, repo: &str) -> Result<String> {
        let response = self
            .get(&format!("/repos/{}/{}/readme", owner, repo), ACCEPT_RAW)
            .await?;
        let text = response.text().await?;
        Ok(text)
    }

    /// Get repository metadata (language, topics, default branch).
    pub async fn repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo> {
        let response = self
            .get(&format!("/repos/{}/{}", owner, repo), ACCEPT_JSON)
            .await?;
        let info: RepoInfo = response.json().await?;
        Ok(info)
    }

    /// Get the recursive tree for a branch as a flat list of file entries.
    /// Only blob entries are kept, capped at MAX_TREE_ENTRIES by upstream
    /// order.
    pub async fn tree_entries(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<FileEntry>> {
        let params = [("recursive", "1")];
        let response = self
            .get_with_params(
                &format!("/repos/{}/{}/git/trees/{}", owner, repo, branch),
                ACCEPT_JSON,
                &params,
            )
            .await?;
        let tree: TreeResponse = response.json().await?;
        Ok(entries_from_tree(tree, owner, repo, branch))
    }

    /// Fetch raw text content from an absolute URL.
    pub async fn raw_text(&self, url: &str) -> Result<String> {
        let response = self.get_url(url, ACCEPT_RAW).await?;
        let text = response.text().await?;
        Ok(text)
    }

    /// Fetch raw bytes from an absolute URL (downloads).
    pub async fn raw_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get_url(url, ACCEPT_RAW).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Convert a tree response into capped, blob-only file entries with
/// synthesized raw-content URLs.
pub fn entries_from_tree(
    tree: TreeResponse,
    owner: &str,
    repo: &str,
    branch: &str,
) -> Vec<FileEntry> {
    tree.tree
        .into_iter()
        .filter(|item| item.item_type == "blob")
        .take(MAX_TREE_ENTRIES)
        .map(|item| FileEntry {
            raw_url: format!(
                "https://raw.githubusercontent.com/{}/{}/{}/{}",
                owner, repo, branch, item.path
            ),
            path: item.path,
            size: item.size,
            sha: item.sha,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::TreeItem;

    fn blob(path: &str) -> TreeItem {
        TreeItem {
            path: path.to_string(),
            item_type: "blob".to_string(),
            size: Some(1),
            sha: Some("abc".to_string()),
        }
    }

    #[test]
    fn test_entries_keep_blobs_only() {
        let tree = TreeResponse {
            tree: vec![
                TreeItem {
                    path: "src".to_string(),
                    item_type: "tree".to_string(),
                    size: None,
                    sha: None,
                },
                blob("src/main.rs"),
            ],
            truncated: false,
        };
        let entries = entries_from_tree(tree, "octocat", "hello", "main");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "src/main.rs");
        assert_eq!(
            entries[0].raw_url,
            "https://raw.githubusercontent.com/octocat/hello/main/src/main.rs"
        );
    }

    #[test]
    fn test_entries_capped_at_limit() {
        let tree = TreeResponse {
            tree: (0..MAX_TREE_ENTRIES + 50)
                .map(|i| blob(&format!("file{}.txt", i)))
                .collect(),
            truncated: false,
        };
        let entries = entries_from_tree(tree, "o", "r", "main");
        assert_eq!(entries.len(), MAX_TREE_ENTRIES);
        // Upstream order is preserved up to the cap.
        assert_eq!(entries[0].path, "file0.txt");
    }
}
