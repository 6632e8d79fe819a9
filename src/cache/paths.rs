// Cache key and path construction.
// Keys are flat file names derived from owner/repo/branch/path/purpose.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/reposcope on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "reposcope").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Key for a per-file commit metadata entry.
pub fn meta_key(owner: &str, repo: &str, branch: &str, path: &str) -> String {
    format!(
        "{}-{}-{}-{}-meta.json",
        sanitize(owner),
        sanitize(repo),
        sanitize(branch),
        sanitize(path)
    )
}

/// Key for a repository's README snapshot.
pub fn readme_key(owner: &str, repo: &str) -> String {
    format!("{}-{}-readme.md", sanitize(owner), sanitize(repo))
}

/// Key for a branch's tree snapshot.
pub fn tree_key(owner: &str, repo: &str, branch: &str) -> String {
    format!(
        "{}-{}-{}-tree.json",
        sanitize(owner),
        sanitize(repo),
        sanitize(branch)
    )
}

/// Key for repository metadata.
pub fn repo_key(owner: &str, repo: &str) -> String {
    format!("{}-{}-repo.json", sanitize(owner), sanitize(repo))
}

/// Sanitize a key component for use as part of a flat file name.
/// Any character outside [A-Za-z0-9._-] becomes an underscore, so path
/// separators and query characters cannot escape the cache directory.
pub fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_passthrough() {
        assert_eq!(sanitize("src-main.rs_v2"), "src-main.rs_v2");
    }

    #[test]
    fn test_sanitize_strips_separators_and_query_chars() {
        let key = sanitize("../x?y");
        assert!(!key.contains('/'));
        assert!(!key.contains('?'));
        assert_eq!(key, ".._x_y");
    }

    #[test]
    fn test_meta_key_shape() {
        let key = meta_key("octocat", "hello", "main", "src/lib.rs");
        assert_eq!(key, "octocat-hello-main-src_lib.rs-meta.json");
    }

    #[test]
    fn test_snapshot_keys() {
        assert_eq!(readme_key("octocat", "hello"), "octocat-hello-readme.md");
        assert_eq!(
            tree_key("octocat", "hello", "main"),
            "octocat-hello-main-tree.json"
        );
        assert_eq!(repo_key("octocat", "hello"), "octocat-hello-repo.json");
    }
}
