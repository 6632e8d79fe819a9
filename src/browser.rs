// Repository browser state machine.
// Owns the filter, expansion, selection, and focus state; recomputes the
// visible row list whenever the tree or expanded set changes. All I/O
// lives in the app's spawned tasks; completions arrive through
// apply_content/insert_meta tagged so stale fetches are discarded.

use std::collections::HashMap;

use ratatui::widgets::ListState;

use crate::github::FileEntry;
use crate::meta::FileMeta;
use crate::tree::{self, ExpandedSet, VisibleRow};

/// Loading state for async data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Interactive state over one tree snapshot.
pub struct BrowserState {
    /// The flat blob list from the tree snapshot.
    entries: Vec<FileEntry>,
    /// Current filter text (case-insensitive substring on full paths).
    pub filter: String,
    /// Expansion state per directory path; absent means collapsed.
    expanded: ExpandedSet,
    /// Flattened visible rows, recomputed on tree/expansion changes.
    rows: Vec<VisibleRow>,
    /// Path of the file whose content the pane shows (or should show).
    pub selected_path: Option<String>,
    /// Content of the selected file.
    pub content: LoadingState<String>,
    /// Commit metadata per opened file; never evicted for the session.
    pub file_meta: HashMap<String, FileMeta>,
    /// List selection state; drives focus and keeps the row scrolled
    /// into view.
    pub list_state: ListState,
    /// Tag for the most recently initiated selection. A resolution for
    /// an older tag must not clobber the newer selection's state.
    generation: u64,
}

impl BrowserState {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            filter: String::new(),
            expanded: ExpandedSet::new(),
            rows: Vec::new(),
            selected_path: None,
            content: LoadingState::Idle,
            file_meta: HashMap::new(),
            list_state: ListState::default(),
            generation: 0,
        }
    }

    /// Install a fresh tree snapshot, resetting filter-derived state.
    pub fn set_entries(&mut self, entries: Vec<FileEntry>) {
        self.entries = entries;
        self.rebuild();
        self.reset_focus();
    }

    pub fn rows(&self) -> &[VisibleRow] {
        &self.rows
    }

    pub fn focused_row(&self) -> Option<&VisibleRow> {
        self.rows.get(self.list_state.selected()?)
    }

    fn rebuild(&mut self) {
        let root = tree::build_filtered(&self.entries, &self.filter);
        self.rows = tree::flatten_visible(&root, &self.expanded);
    }

    fn reset_focus(&mut self) {
        if self.rows.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    fn clamp_focus(&mut self) {
        match self.list_state.selected() {
            Some(i) if i >= self.rows.len() => self.reset_focus(),
            None => self.reset_focus(),
            _ => {}
        }
    }

    /// Filter changed: rebuild the filtered tree and reset focus to the
    /// top of the new list.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.rebuild();
        self.reset_focus();
    }

    /// Flip a directory's expansion state. First toggle of an unseen
    /// path inserts it as expanded.
    pub fn toggle_dir(&mut self, path: &str) {
        let state = self.expanded.entry(path.to_string()).or_insert(false);
        *state = !*state;
        self.rebuild();
        self.clamp_focus();
    }

    /// ArrowRight: expand a directory (no-op on files and unknown paths).
    pub fn expand_dir(&mut self, path: &str) {
        self.expanded.insert(path.to_string(), true);
        self.rebuild();
        self.clamp_focus();
    }

    /// ArrowLeft: collapse a directory.
    pub fn collapse_dir(&mut self, path: &str) {
        self.expanded.insert(path.to_string(), false);
        self.rebuild();
        self.clamp_focus();
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.get(path).copied().unwrap_or(false)
    }

    /// Start a selection: set the selected path, clear previous content
    /// and error, mark loading, and return the generation tag the
    /// eventual fetch result must carry.
    pub fn begin_selection(&mut self, path: &str) -> u64 {
        self.selected_path = Some(path.to_string());
        self.content = LoadingState::Loading;
        self.generation += 1;
        self.generation
    }

    /// Deliver a fetch result. Results tagged with a superseded
    /// generation are discarded.
    pub fn apply_content(&mut self, generation: u64, result: Result<String, String>) {
        if generation != self.generation {
            return;
        }
        self.content = match result {
            Ok(text) => LoadingState::Loaded(text),
            Err(message) => LoadingState::Error(message),
        };
    }

    /// Merge metadata for a path. Failures never reach here; metadata is
    /// cosmetic and fetch errors are dropped by the caller.
    pub fn insert_meta(&mut self, path: String, meta: FileMeta) {
        self.file_meta.insert(path, meta);
    }

    pub fn meta_for(&self, path: &str) -> Option<&FileMeta> {
        self.file_meta.get(path)
    }

    /// Clear the selection (back to the README/idle pane).
    pub fn clear_selection(&mut self) {
        self.selected_path = None;
        self.content = LoadingState::Idle;
        // Invalidate any in-flight fetch for the abandoned selection.
        self.generation += 1;
    }

    /// Move focus down one row, clamped to the end of the list.
    pub fn focus_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.rows.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    /// Move focus up one row, clamped to the start of the list.
    pub fn focus_prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let prev = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(prev));
    }

    /// Home: jump to the first row.
    pub fn focus_first(&mut self) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    /// End: jump to the last row.
    pub fn focus_last(&mut self) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(self.rows.len() - 1));
        }
    }
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            raw_url: format!("https://raw.example/{}", path),
            size: Some(10),
            sha: None,
        }
    }

    fn browser() -> BrowserState {
        let mut b = BrowserState::new();
        b.set_entries(vec![
            entry("a/b.txt"),
            entry("a/c/d.md"),
            entry("e.json"),
        ]);
        b
    }

    fn visible_paths(b: &BrowserState) -> Vec<String> {
        b.rows().iter().map(|r| r.path.clone()).collect()
    }

    #[test]
    fn test_initial_rows_are_collapsed_top_level() {
        let b = browser();
        assert_eq!(visible_paths(&b), vec!["a", "e.json"]);
        assert_eq!(b.list_state.selected(), Some(0));
    }

    #[test]
    fn test_double_toggle_is_idempotent() {
        let mut b = browser();
        b.toggle_dir("a");
        assert!(b.is_expanded("a"));
        assert_eq!(visible_paths(&b), vec!["a", "a/b.txt", "a/c", "e.json"]);

        b.toggle_dir("a");
        assert!(!b.is_expanded("a"));
        assert_eq!(visible_paths(&b), vec!["a", "e.json"]);
    }

    #[test]
    fn test_filter_change_resets_focus() {
        let mut b = browser();
        b.toggle_dir("a");
        b.focus_last();
        assert_eq!(b.list_state.selected(), Some(3));

        b.set_filter("d.md");
        assert_eq!(b.list_state.selected(), Some(0));
        assert_eq!(visible_paths(&b), vec!["a"]);
    }

    #[test]
    fn test_filter_with_no_matches_clears_focus() {
        let mut b = browser();
        b.set_filter("zzz");
        assert!(b.rows().is_empty());
        assert_eq!(b.list_state.selected(), None);

        b.set_filter("");
        assert_eq!(b.list_state.selected(), Some(0));
    }

    #[test]
    fn test_collapse_clamps_focus_to_shorter_list() {
        let mut b = browser();
        b.toggle_dir("a");
        b.toggle_dir("a/c");
        b.focus_last();

        b.collapse_dir("a");
        assert_eq!(visible_paths(&b), vec!["a", "e.json"]);
        assert_eq!(b.list_state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut b = browser();
        b.focus_prev();
        assert_eq!(b.list_state.selected(), Some(0));

        b.focus_next();
        b.focus_next();
        b.focus_next();
        assert_eq!(b.list_state.selected(), Some(1));

        b.focus_first();
        assert_eq!(b.list_state.selected(), Some(0));
        b.focus_last();
        assert_eq!(b.list_state.selected(), Some(1));
    }

    #[test]
    fn test_selection_marks_loading() {
        let mut b = browser();
        let generation = b.begin_selection("e.json");
        assert_eq!(b.selected_path.as_deref(), Some("e.json"));
        assert!(b.content.is_loading());

        b.apply_content(generation, Ok("{}".to_string()));
        assert_eq!(b.content.data().map(String::as_str), Some("{}"));
    }

    #[test]
    fn test_stale_fetch_cannot_clobber_newer_selection() {
        let mut b = browser();
        let gen_x = b.begin_selection("a/b.txt");
        let gen_y = b.begin_selection("e.json");

        // X resolves after Y was initiated: discarded.
        b.apply_content(gen_x, Ok("content of X".to_string()));
        assert_eq!(b.selected_path.as_deref(), Some("e.json"));
        assert!(b.content.is_loading());

        b.apply_content(gen_y, Ok("content of Y".to_string()));
        assert_eq!(b.content.data().map(String::as_str), Some("content of Y"));
    }

    #[test]
    fn test_fetch_failure_sets_error_message() {
        let mut b = browser();
        let generation = b.begin_selection("a/b.txt");
        b.apply_content(generation, Err("Failed to fetch file: 404".to_string()));
        assert_eq!(
            b.content,
            LoadingState::Error("Failed to fetch file: 404".to_string())
        );
        // selected_path stays set; loadedContent stays absent.
        assert_eq!(b.selected_path.as_deref(), Some("a/b.txt"));
    }

    #[test]
    fn test_clear_selection_invalidates_inflight_fetch() {
        let mut b = browser();
        let generation = b.begin_selection("a/b.txt");
        b.clear_selection();
        b.apply_content(generation, Ok("late".to_string()));
        assert_eq!(b.content, LoadingState::Idle);
        assert_eq!(b.selected_path, None);
    }

    #[test]
    fn test_meta_cache_persists_across_selections() {
        let mut b = browser();
        b.insert_meta(
            "a/b.txt".to_string(),
            FileMeta {
                last_modified: Some("2024-02-01T12:00:00Z".to_string()),
                commit_sha: Some("0123456789abcdef".to_string()),
            },
        );
        b.begin_selection("e.json");
        assert!(b.meta_for("a/b.txt").is_some());
    }
}
