// Cache module for local filesystem caching.
// Stores GitHub API responses as one file per key; presence means valid.

pub mod paths;
pub mod store;

pub use paths::{cache_dir, meta_key, readme_key, repo_key, tree_key};
pub use store::{read_text, write_text};
