// Display formatting helpers for file rows and the content pane.

/// Icon group selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Image,
    Code,
    Document,
    Generic,
}

impl FileIcon {
    /// Pick an icon group from a file name.
    pub fn for_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        const IMAGE: [&str; 5] = [".png", ".jpg", ".jpeg", ".gif", ".svg"];
        const CODE: [&str; 9] = [
            ".md", ".rs", ".ts", ".tsx", ".js", ".jsx", ".py", ".java", ".cs",
        ];
        const DOCUMENT: [&str; 3] = [".pdf", ".doc", ".docx"];

        if IMAGE.iter().any(|ext| lower.ends_with(ext)) {
            FileIcon::Image
        } else if CODE.iter().any(|ext| lower.ends_with(ext)) {
            FileIcon::Code
        } else if DOCUMENT.iter().any(|ext| lower.ends_with(ext)) {
            FileIcon::Document
        } else {
            FileIcon::Generic
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            FileIcon::Image => "🖼",
            FileIcon::Code => "λ",
            FileIcon::Document => "📄",
            FileIcon::Generic => "·",
        }
    }
}

/// Format a byte count with binary prefixes and two-decimal rounding.
/// Absent sizes render as an empty string.
pub fn human_size(bytes: Option<u64>) -> String {
    let Some(bytes) = bytes else {
        return String::new();
    };
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// The 7-character short form of a commit hash.
pub fn short_sha(sha: &str) -> &str {
    &sha[..sha.len().min(7)]
}

/// Whether a path should render through the markdown viewer: extension
/// .md, or any path containing "readme", case-insensitive.
pub fn is_markdown(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.ends_with(".md") || lower.contains("readme")
}
