// Cache store for reading and writing text blobs.
// The cache is a pure optimization: every I/O failure is treated as a
// miss (reads) or a no-op (writes), never surfaced to the caller.

use std::fs;
use std::path::Path;

/// Read a cached entry by key under the given cache root.
/// Missing or unreadable files report absent.
pub fn read_text(root: &Path, key: &str) -> Option<String> {
    fs::read_to_string(root.join(key)).ok()
}

/// Write a cached entry verbatim, creating the cache root if needed.
/// Failures are swallowed: content already fetched from upstream is still
/// returned to the user even when caching it fails.
pub fn write_text(root: &Path, key: &str, text: &str) {
    if fs::create_dir_all(root).is_err() {
        return;
    }
    let _ = fs::write(root.join(key), text);
}
