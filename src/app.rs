// App state and main event loop.
// Drives the browser state machine from keyboard input and from fetch
// completions delivered over an mpsc channel by spawned tasks.

use std::io;
use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::browser::{BrowserState, LoadingState};
use crate::cache;
use crate::github::{FileEntry, GitHubClient, RepoInfo};
use crate::meta::{self, FileMeta, MetaQuery};
use crate::ui;

/// Completion messages from spawned fetch tasks.
pub enum AppEvent {
    RepoLoaded(Result<RepoInfo, String>),
    TreeLoaded {
        branch: String,
        result: Result<Vec<FileEntry>, String>,
    },
    ReadmeLoaded(Result<String, String>),
    FileLoaded {
        generation: u64,
        result: Result<String, String>,
    },
    MetaLoaded {
        path: String,
        meta: FileMeta,
    },
    DownloadFinished(Result<PathBuf, String>),
}

/// Keyboard input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
}

/// Main application state.
pub struct App {
    pub owner: String,
    pub repo: String,
    /// Branch being browsed; resolved from --branch or the repository's
    /// default branch once metadata arrives.
    pub branch: String,
    pub repo_info: LoadingState<RepoInfo>,
    pub readme: LoadingState<String>,
    /// Number of entries in the loaded tree snapshot.
    pub tree_load: LoadingState<usize>,
    pub browser: BrowserState,
    pub input_mode: InputMode,
    /// Transient user-facing message (download results, failures).
    pub alert: Option<String>,
    /// Vertical scroll of the content pane.
    pub content_scroll: u16,
    pub should_quit: bool,

    client: GitHubClient,
    cache_root: PathBuf,
    /// Skip cache reads for the repo/tree/readme snapshots.
    no_cache: bool,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(
        client: GitHubClient,
        owner: String,
        repo: String,
        branch: Option<String>,
        no_cache: bool,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        let cache_root = cache::cache_dir().unwrap_or_else(|| PathBuf::from(".reposcope-cache"));
        Self {
            owner,
            repo,
            branch: branch.unwrap_or_default(),
            repo_info: LoadingState::Loading,
            readme: LoadingState::Loading,
            tree_load: LoadingState::Loading,
            browser: BrowserState::new(),
            input_mode: InputMode::default(),
            alert: None,
            content_scroll: 0,
            should_quit: false,
            client,
            cache_root,
            no_cache,
            tx,
            rx,
        }
    }

    /// Main event loop: draw, drain fetch completions, handle input.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.spawn_bootstrap();
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.drain_events();
            self.handle_input()?;
        }
        Ok(())
    }

    /// Load repo metadata, tree snapshot, and README, each cache-checked.
    fn spawn_bootstrap(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let owner = self.owner.clone();
        let repo = self.repo.clone();
        let branch_arg = if self.branch.is_empty() {
            None
        } else {
            Some(self.branch.clone())
        };
        let root = self.cache_root.clone();
        let no_cache = self.no_cache;

        tokio::spawn(async move {
            // Repo metadata, needed first to resolve the default branch.
            let repo_key = cache::repo_key(&owner, &repo);
            let cached_info = if no_cache {
                None
            } else {
                cache::read_text(&root, &repo_key)
                    .and_then(|text| serde_json::from_str::<RepoInfo>(&text).ok())
            };
            let info = match cached_info {
                Some(info) => Ok(info),
                None => match client.repo_info(&owner, &repo).await {
                    Ok(info) => {
                        if let Ok(json) = serde_json::to_string(&info) {
                            cache::write_text(&root, &repo_key, &json);
                        }
                        Ok(info)
                    }
                    Err(e) => Err(e.to_string()),
                },
            };

            let branch = branch_arg
                .or_else(|| info.as_ref().ok().map(|i| i.default_branch.clone()))
                .unwrap_or_else(|| "main".to_string());
            let _ = tx.send(AppEvent::RepoLoaded(info));

            // Tree snapshot for the resolved branch.
            let tree_key = cache::tree_key(&owner, &repo, &branch);
            let cached_tree = if no_cache {
                None
            } else {
                cache::read_text(&root, &tree_key)
                    .and_then(|text| serde_json::from_str::<Vec<FileEntry>>(&text).ok())
            };
            let entries = match cached_tree {
                Some(entries) => Ok(entries),
                None => match client.tree_entries(&owner, &repo, &branch).await {
                    Ok(entries) => {
                        if let Ok(json) = serde_json::to_string(&entries) {
                            cache::write_text(&root, &tree_key, &json);
                        }
                        Ok(entries)
                    }
                    Err(e) => Err(e.to_string()),
                },
            };
            let _ = tx.send(AppEvent::TreeLoaded {
                branch,
                result: entries,
            });

            // README, raw.
            let readme_key = cache::readme_key(&owner, &repo);
            let cached_readme = if no_cache {
                None
            } else {
                cache::read_text(&root, &readme_key)
            };
            let readme = match cached_readme {
                Some(text) => Ok(text),
                None => match client.readme_raw(&owner, &repo).await {
                    Ok(text) => {
                        cache::write_text(&root, &readme_key, &text);
                        Ok(text)
                    }
                    Err(e) => Err(e.to_string()),
                },
            };
            let _ = tx.send(AppEvent::ReadmeLoaded(readme));
        });
    }

    /// Apply all pending fetch completions.
    fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                AppEvent::RepoLoaded(result) => {
                    self.repo_info = match result {
                        Ok(info) => LoadingState::Loaded(info),
                        Err(e) => LoadingState::Error(e),
                    };
                }
                AppEvent::TreeLoaded { branch, result } => {
                    self.branch = branch;
                    match result {
                        Ok(entries) => {
                            self.tree_load = LoadingState::Loaded(entries.len());
                            self.browser.set_entries(entries);
                        }
                        Err(e) => self.tree_load = LoadingState::Error(e),
                    }
                }
                AppEvent::ReadmeLoaded(result) => {
                    // A missing README degrades to an empty pane, never an
                    // error screen.
                    self.readme = match result {
                        Ok(text) => LoadingState::Loaded(text),
                        Err(_) => LoadingState::Idle,
                    };
                }
                AppEvent::FileLoaded { generation, result } => {
                    self.browser.apply_content(generation, result);
                }
                AppEvent::MetaLoaded { path, meta } => {
                    self.browser.insert_meta(path, meta);
                }
                AppEvent::DownloadFinished(result) => {
                    self.alert = Some(match result {
                        Ok(path) => format!("Saved to {}", path.display()),
                        Err(e) => format!("Download failed: {}", e),
                    });
                }
            }
        }
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if !event::poll(std::time::Duration::from_millis(100))? {
            return Ok(());
        }
        let Event::Key(key) = event::read()? else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Any keypress dismisses a transient alert.
        self.alert = None;

        match self.input_mode {
            InputMode::Filter => self.handle_filter_key(key.code),
            InputMode::Normal => self.handle_normal_key(key.code),
        }
        Ok(())
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                let mut text = self.browser.filter.clone();
                text.pop();
                self.browser.set_filter(text);
            }
            KeyCode::Char(c) => {
                let mut text = self.browser.filter.clone();
                text.push(c);
                self.browser.set_filter(text);
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.input_mode = InputMode::Filter,
            KeyCode::Down => self.browser.focus_next(),
            KeyCode::Up => self.browser.focus_prev(),
            KeyCode::Home => self.browser.focus_first(),
            KeyCode::End => self.browser.focus_last(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_focused(),
            KeyCode::Right => {
                if let Some(row) = self.browser.focused_row()
                    && !row.is_file
                {
                    let path = row.path.clone();
                    self.browser.expand_dir(&path);
                }
            }
            KeyCode::Left => {
                if let Some(row) = self.browser.focused_row()
                    && !row.is_file
                {
                    let path = row.path.clone();
                    self.browser.collapse_dir(&path);
                }
            }
            KeyCode::Char('d') => self.download_focused(),
            KeyCode::PageDown => self.content_scroll = self.content_scroll.saturating_add(10),
            KeyCode::PageUp => self.content_scroll = self.content_scroll.saturating_sub(10),
            KeyCode::Esc => {
                self.browser.clear_selection();
                self.content_scroll = 0;
            }
            _ => {}
        }
    }

    /// Enter/Space: open the focused file or toggle the focused directory.
    fn activate_focused(&mut self) {
        let Some(row) = self.browser.focused_row() else {
            return;
        };
        if row.is_file {
            let path = row.path.clone();
            let raw_url = row.raw_url.clone();
            self.select_file(&path, raw_url);
        } else {
            let path = row.path.clone();
            self.browser.toggle_dir(&path);
        }
    }

    /// Select a file: fire the mandatory raw-content fetch and the
    /// cosmetic metadata lookup as independent tasks.
    fn select_file(&mut self, path: &str, raw_url: Option<String>) {
        let generation = self.browser.begin_selection(path);
        self.content_scroll = 0;

        let tx = self.tx.clone();
        let client = self.client.clone();
        match raw_url {
            Some(url) => {
                tokio::spawn(async move {
                    let result = client
                        .raw_text(&url)
                        .await
                        .map_err(|e| format!("Failed to fetch file: {}", e));
                    let _ = tx.send(AppEvent::FileLoaded { generation, result });
                });
            }
            None => {
                let _ = tx.send(AppEvent::FileLoaded {
                    generation,
                    result: Err("No raw URL for file".to_string()),
                });
            }
        }

        // Metadata failures are silently dropped.
        let tx = self.tx.clone();
        let client = self.client.clone();
        let root = self.cache_root.clone();
        let query = MetaQuery {
            owner: Some(self.owner.clone()),
            repo: Some(self.repo.clone()),
            path: Some(path.to_string()),
            branch: Some(self.branch.clone()),
        };
        let path = path.to_string();
        tokio::spawn(async move {
            let response = meta::file_meta(&query, &client, &root).await;
            if response.is_success()
                && let Ok(meta) = serde_json::from_str::<FileMeta>(&response.body)
            {
                let _ = tx.send(AppEvent::MetaLoaded { path, meta });
            }
        });
    }

    /// Download the focused file: an independent second fetch of the raw
    /// content, saved under the user's download directory. Failure only
    /// raises an alert; browser state is untouched.
    fn download_focused(&mut self) {
        let Some(row) = self.browser.focused_row() else {
            return;
        };
        let (true, Some(url)) = (row.is_file, row.raw_url.clone()) else {
            return;
        };
        let name = row
            .path
            .rsplit('/')
            .next()
            .unwrap_or("file")
            .to_string();

        let tx = self.tx.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = async {
                let bytes = client.raw_bytes(&url).await.map_err(|e| e.to_string())?;
                let dir = directories::UserDirs::new()
                    .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
                    .unwrap_or_else(|| PathBuf::from("."));
                let target = dir.join(&name);
                std::fs::write(&target, bytes).map_err(|e| e.to_string())?;
                Ok::<PathBuf, String>(target)
            }
            .await;
            let _ = tx.send(AppEvent::DownloadFinished(result));
        });
    }
}
