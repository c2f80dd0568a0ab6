use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::runtime::action::FileMode;

/// Replay state of one open file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileContext {
    /// Path as written in the script.
    pub display_path: String,
    /// Where the file lives on disk.
    pub resolved_path: PathBuf,
    /// Presentation mode given on open.
    pub mode: Option<FileMode>,
    /// Source lines, when the file was readable.
    pub lines: Option<Vec<String>>,
    /// Lines shown in static previews.
    pub revealed_line_count: usize,
    /// Lines already typed into the live editor.
    pub typed_line_count: usize,
}

impl FileContext {
    /// Read `resolved_path` and set up counters for `mode`: input files start empty, edited
    /// files start fully revealed.
    pub fn open(display_path: &str, resolved_path: PathBuf, mode: Option<FileMode>) -> Self {
        let lines = read_file_lines(&resolved_path);
        let start = if mode == Some(FileMode::Input) {
            0
        } else {
            lines.as_ref().map_or(0, Vec::len)
        };
        Self {
            display_path: display_path.to_string(),
            resolved_path,
            mode,
            lines,
            revealed_line_count: start,
            typed_line_count: start,
        }
    }

    /// `true` in [`FileMode::Input`].
    pub fn is_input(&self) -> bool {
        self.mode == Some(FileMode::Input)
    }

    /// Number of source lines (0 when unreadable).
    pub fn total_lines(&self) -> usize {
        self.lines.as_ref().map_or(0, Vec::len)
    }

    /// `true` when at least one source line is known.
    pub fn has_lines(&self) -> bool {
        self.total_lines() > 0
    }

    /// Source text of 1-based `line`.
    pub fn line(&self, line: usize) -> Option<&str> {
        let idx = line.checked_sub(1)?;
        self.lines.as_ref()?.get(idx).map(String::as_str)
    }

    /// Grow the revealed prefix to cover `line` (input mode) or the whole file.
    pub fn reveal_through(&mut self, line: usize) {
        let total = self.total_lines();
        self.revealed_line_count = if self.is_input() {
            self.revealed_line_count.max(line).min(total)
        } else {
            total
        };
    }
}

/// `path` if absolute, else `path` under `base`.
pub fn resolve_script_path(base: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

/// Lines of `path` with CRLF normalized. `None` for missing files; other read errors are
/// logged and also yield `None`.
pub fn read_file_lines(path: &Path) -> Option<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Some(raw.replace("\r\n", "\n").split('\n').map(str::to_owned).collect()),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), "could not read source file: {e}");
            None
        }
    }
}

/// Options for [`render_preview`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PreviewOptions<'a> {
    /// 1-based line to mark with `>` and keep in view.
    pub highlight: Option<usize>,
    /// Appended under the code when non-blank.
    pub narration: Option<&'a str>,
    /// Visible code rows.
    pub rows: usize,
}

/// Line-numbered text of the revealed part of `ctx`, windowed to `opts.rows`.
pub fn render_preview(ctx: &FileContext, opts: &PreviewOptions<'_>) -> String {
    let lines: &[String] = ctx.lines.as_deref().unwrap_or_default();
    let total = lines.len();
    let revealed = ctx.revealed_line_count.min(total);
    let visible = &lines[..revealed];
    let rows = opts.rows.max(1);

    let tail = visible.len().saturating_sub(rows);
    let mut start = tail;
    if let Some(hl) = opts.highlight {
        let idx = hl.saturating_sub(1);
        if idx < start || idx >= start + rows {
            start = idx.saturating_sub(rows / 2);
        }
        start = start.min(tail);
    }
    let window = &visible[start..(start + rows).min(visible.len())];
    let width = total.max(1).to_string().len();

    let mut header = ctx.display_path.clone();
    if let Some(mode) = ctx.mode {
        header.push_str(&format!(" ({mode})"));
    }
    if total > 0 {
        header.push_str(&format!(" {revealed}/{total}"));
    }

    let body = if window.is_empty() {
        if ctx.is_input() {
            "(waiting for input…)".to_string()
        } else {
            "(empty file)".to_string()
        }
    } else {
        window
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let n = start + i + 1;
                let marker = if opts.highlight == Some(n) { '>' } else { ' ' };
                format!("{marker}{n:>width$}| {line}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    match opts.narration.map(str::trim).filter(|n| !n.is_empty()) {
        Some(narration) => format!("{header}\n{body}\n\nNarration: {narration}"),
        None => format!("{header}\n{body}"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/file_context.rs"]
mod tests;
