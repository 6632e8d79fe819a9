// Per-file commit metadata lookup.
// Request/response handler mirroring the HTTP contract: required
// owner/repo/path, optional branch (default "main"), disk-cache
// short-circuit, and upstream status mirroring on failure.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cache;
use crate::error::Result;
use crate::github::{CommitInfo, GitHubClient};

/// Query parameters for a metadata lookup.
#[derive(Debug, Clone, Default)]
pub struct MetaQuery {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub path: Option<String>,
    pub branch: Option<String>,
}

/// Outcome of a metadata lookup: an HTTP-shaped status code plus the JSON
/// body as raw text, so cache hits stay byte-identical to the first
/// response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaResponse {
    pub status: u16,
    pub body: String,
}

impl MetaResponse {
    fn ok(body: String) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }).to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Commit metadata for one file. `lastModified: null` is an explicit,
/// cacheable "no history" result, distinct from "not yet fetched".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
}

/// Upstream dependency of the lookup, kept behind a trait so tests can
/// inject a counting fake.
pub trait CommitSource {
    fn list_for_path(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> impl Future<Output = Result<Vec<CommitInfo>>> + Send;
}

impl CommitSource for GitHubClient {
    async fn list_for_path(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Vec<CommitInfo>> {
        self.latest_commit(owner, repo, path, branch).await
    }
}

/// Resolve `{lastModified, commitSha}` for a path's latest commit.
/// Exactly one cache write happens per cold lookup; none on a hit.
pub async fn file_meta<C: CommitSource>(
    query: &MetaQuery,
    source: &C,
    cache_root: &Path,
) -> MetaResponse {
    let (Some(owner), Some(repo), Some(path)) = (
        query.owner.as_deref(),
        query.repo.as_deref(),
        query.path.as_deref(),
    ) else {
        return MetaResponse::error(400, "Missing query params");
    };
    let branch = query.branch.as_deref().unwrap_or("main");

    let key = cache::meta_key(owner, repo, branch, path);

    // Malformed cached JSON falls through to a live fetch.
    if let Some(cached) = cache::read_text(cache_root, &key) {
        if serde_json::from_str::<FileMeta>(&cached).is_ok() {
            return MetaResponse::ok(cached);
        }
    }

    let commits = match source.list_for_path(owner, repo, path, branch).await {
        Ok(commits) => commits,
        Err(e) => {
            return match e.status_code() {
                Some(code) => MetaResponse::error(code, "Failed to fetch commits"),
                None => MetaResponse::error(500, &e.to_string()),
            };
        }
    };

    let meta = match commits.first() {
        Some(latest) => FileMeta {
            last_modified: latest.best_date(),
            commit_sha: latest.sha.clone(),
        },
        None => FileMeta::default(),
    };

    let body = match serde_json::to_string(&meta) {
        Ok(body) => body,
        Err(e) => return MetaResponse::error(500, &e.to_string()),
    };
    cache::write_text(cache_root, &key, &body);
    MetaResponse::ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScopeError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    enum FakeReply {
        Commits(&'static str),
        Status(u16),
    }

    struct FakeCommits {
        reply: FakeReply,
        calls: AtomicUsize,
    }

    impl FakeCommits {
        fn new(reply: FakeReply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CommitSource for FakeCommits {
        async fn list_for_path(
            &self,
            _owner: &str,
            _repo: &str,
            _path: &str,
            _branch: &str,
        ) -> Result<Vec<CommitInfo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                FakeReply::Commits(json) => Ok(serde_json::from_str(json).unwrap()),
                FakeReply::Status(code) => Err(ScopeError::Status {
                    code: *code,
                    url: "https://api.github.com/test".to_string(),
                }),
            }
        }
    }

    const ONE_COMMIT: &str = r#"[{
        "sha": "0123456789abcdef",
        "commit": {
            "committer": { "date": "2024-02-01T12:00:00Z" },
            "author": { "date": "2024-01-01T12:00:00Z" }
        }
    }]"#;

    fn query(path: Option<&str>) -> MetaQuery {
        MetaQuery {
            owner: Some("octocat".to_string()),
            repo: Some("hello".to_string()),
            path: path.map(str::to_string),
            branch: None,
        }
    }

    #[tokio::test]
    async fn test_missing_path_is_400_without_upstream_call() {
        let temp = TempDir::new().unwrap();
        let fake = FakeCommits::new(FakeReply::Commits(ONE_COMMIT));

        let response = file_meta(&query(None), &fake, temp.path()).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body, r#"{"error":"Missing query params"}"#);
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_cold_lookup_extracts_committer_date_and_sha() {
        let temp = TempDir::new().unwrap();
        let fake = FakeCommits::new(FakeReply::Commits(ONE_COMMIT));

        let response = file_meta(&query(Some("src/lib.rs")), &fake, temp.path()).await;
        assert_eq!(response.status, 200);
        let meta: FileMeta = serde_json::from_str(&response.body).unwrap();
        assert_eq!(meta.last_modified.as_deref(), Some("2024-02-01T12:00:00Z"));
        assert_eq!(meta.commit_sha.as_deref(), Some("0123456789abcdef"));
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_second_lookup_hits_cache_byte_identical() {
        let temp = TempDir::new().unwrap();
        let fake = FakeCommits::new(FakeReply::Commits(ONE_COMMIT));
        let q = query(Some("src/lib.rs"));

        let first = file_meta(&q, &fake, temp.path()).await;
        let second = file_meta(&q, &fake, temp.path()).await;
        assert_eq!(first, second);
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_zero_commits_caches_null_last_modified() {
        let temp = TempDir::new().unwrap();
        let fake = FakeCommits::new(FakeReply::Commits("[]"));
        let q = query(Some("ghost.txt"));

        let response = file_meta(&q, &fake, temp.path()).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"lastModified":null}"#);

        // The empty-history result is itself cacheable.
        let again = file_meta(&q, &fake, temp.path()).await;
        assert_eq!(again.body, response.body);
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_mirrors_status() {
        let temp = TempDir::new().unwrap();
        let fake = FakeCommits::new(FakeReply::Status(403));

        let response = file_meta(&query(Some("a.txt")), &fake, temp.path()).await;
        assert_eq!(response.status, 403);
        assert_eq!(response.body, r#"{"error":"Failed to fetch commits"}"#);

        // Failures are not cached; a retry calls upstream again.
        file_meta(&query(Some("a.txt")), &fake, temp.path()).await;
        assert_eq!(fake.calls(), 2);
    }

    #[tokio::test]
    async fn test_malformed_cache_falls_through_to_fetch() {
        let temp = TempDir::new().unwrap();
        let fake = FakeCommits::new(FakeReply::Commits(ONE_COMMIT));
        let key = cache::meta_key("octocat", "hello", "main", "src/lib.rs");
        cache::write_text(temp.path(), &key, "not json {");

        let response = file_meta(&query(Some("src/lib.rs")), &fake, temp.path()).await;
        assert_eq!(response.status, 200);
        assert_eq!(fake.calls(), 1);

        // The fresh payload replaced the malformed entry.
        let cached = cache::read_text(temp.path(), &key).unwrap();
        assert_eq!(cached, response.body);
    }

    #[tokio::test]
    async fn test_branch_defaults_to_main_in_cache_key() {
        let temp = TempDir::new().unwrap();
        let fake = FakeCommits::new(FakeReply::Commits(ONE_COMMIT));

        file_meta(&query(Some("src/lib.rs")), &fake, temp.path()).await;
        let key = cache::meta_key("octocat", "hello", "main", "src/lib.rs");
        assert!(cache::read_text(temp.path(), &key).is_some());
    }
}
