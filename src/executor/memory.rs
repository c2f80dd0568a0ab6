use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;

use crate::executor::code::{CodeExecutor, OpenFileOptions};
use crate::foundation::error::{TutoError, TutoResult};

/// One call made against an [`InMemoryCodeExecutor`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum EditorCall {
    Open { path: PathBuf, opts: OpenFileOptions },
    WriteLine {
        text: String,
        line: Option<usize>,
        append_newline: bool,
    },
    WriteText(String),
    DeleteLeft(usize),
    DeleteRight(usize),
    DeleteLines(usize),
    Highlight(usize),
    MoveCursor { line: usize, column: usize },
    Save,
    StartRecording,
    StopRecording,
}

#[derive(Debug, Default)]
struct Buffer {
    chars: Vec<char>,
    cursor: usize,
}

impl Buffer {
    fn from_text(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            cursor: 0,
        }
    }

    fn text(&self) -> String {
        self.chars.iter().collect()
    }

    fn line_starts(&self) -> Vec<usize> {
        let mut out = vec![0];
        for (i, c) in self.chars.iter().enumerate() {
            if *c == '\n' {
                out.push(i + 1);
            }
        }
        out
    }

    fn line_bounds(&self, line: usize) -> (usize, usize) {
        let starts = self.line_starts();
        let idx = line.clamp(1, starts.len()) - 1;
        let start = starts[idx];
        let end = starts
            .get(idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.chars.len());
        (start, end)
    }

    fn cursor_line(&self) -> usize {
        self.chars[..self.cursor].iter().filter(|c| **c == '\n').count() + 1
    }

    fn move_to(&mut self, line: usize, column: usize) {
        let (start, end) = self.line_bounds(line);
        self.cursor = (start + column.max(1) - 1).min(end);
    }

    fn insert(&mut self, text: &str) {
        let incoming: Vec<char> = text.chars().collect();
        let n = incoming.len();
        self.chars.splice(self.cursor..self.cursor, incoming);
        self.cursor += n;
    }

    fn delete_right(&mut self, count: usize) {
        let end = (self.cursor + count).min(self.chars.len());
        self.chars.drain(self.cursor..end);
    }

    fn delete_left(&mut self, count: usize) {
        let start = self.cursor.saturating_sub(count);
        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }

    fn delete_lines(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let line = self.cursor_line();
        let text = self.text();
        let mut lines: Vec<&str> = text.split('\n').collect();
        let from = line - 1;
        let to = (from + count).min(lines.len());
        lines.drain(from..to);
        *self = Self::from_text(&lines.join("\n"));
        let target = from.min(lines.len().saturating_sub(1)) + 1;
        self.move_to(target, 1);
    }

    fn replace_line(&mut self, line: usize, text: &str) {
        let count = self.line_starts().len();
        if line > count {
            self.cursor = self.chars.len();
            self.insert(&"\n".repeat(line - count));
            self.insert(text);
            return;
        }
        let (start, end) = self.line_bounds(line);
        self.chars.drain(start..end);
        self.cursor = start;
        self.insert(text);
    }
}

#[derive(Debug, Default)]
struct EditorState {
    buffers: BTreeMap<PathBuf, Buffer>,
    active: Option<PathBuf>,
    calls: Vec<EditorCall>,
    recording: bool,
    capture: Option<PathBuf>,
    fail_recording: bool,
}

impl EditorState {
    fn active_buffer(&mut self) -> TutoResult<&mut Buffer> {
        let path = self
            .active
            .clone()
            .ok_or_else(|| TutoError::executor("no file is open in the editor"))?;
        self.buffers
            .get_mut(&path)
            .ok_or_else(|| TutoError::executor(format!("buffer for '{}' vanished", path.display())))
    }
}

/// A text-buffer editor that implements [`CodeExecutor`] without any UI.
///
/// Buffers are loaded from disk on open and written back on save, so a replay against a real
/// directory leaves the same bytes behind as a live editor would. Clones share state; keep one
/// handle to inspect the buffers and call log after handing another to the runtime.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCodeExecutor {
    state: Arc<Mutex<EditorState>>,
}

impl InMemoryCodeExecutor {
    /// Create an empty editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make [`CodeExecutor::stop_recording`] return `path`.
    pub fn with_capture(self, path: impl Into<PathBuf>) -> Self {
        self.lock().capture = Some(path.into());
        self
    }

    /// Make recording start/stop fail, to exercise degraded capture handling.
    pub fn with_failing_recording(self) -> Self {
        self.lock().fail_recording = true;
        self
    }

    /// Current text of the buffer opened from `path`.
    pub fn buffer_text(&self, path: &Path) -> Option<String> {
        self.lock().buffers.get(path).map(Buffer::text)
    }

    /// Path of the active buffer.
    pub fn active_path(&self) -> Option<PathBuf> {
        self.lock().active.clone()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<EditorCall> {
        self.lock().calls.clone()
    }

    /// Forget the call log.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CodeExecutor for InMemoryCodeExecutor {
    fn open_file(&mut self, path: &Path, opts: OpenFileOptions) -> TutoResult<()> {
        let mut st = self.lock();
        st.calls.push(EditorCall::Open {
            path: path.to_path_buf(),
            opts,
        });
        let buffer = if opts.clear {
            Buffer::default()
        } else if let Some(existing) = st.buffers.remove(path) {
            existing
        } else if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read '{}'", path.display()))?;
            Buffer::from_text(&text)
        } else if opts.create_if_missing {
            Buffer::default()
        } else {
            return Err(TutoError::executor(format!(
                "cannot open '{}': file does not exist",
                path.display()
            )));
        };
        st.buffers.insert(path.to_path_buf(), buffer);
        st.active = Some(path.to_path_buf());
        Ok(())
    }

    fn write_line(
        &mut self,
        text: &str,
        line: Option<usize>,
        append_newline: bool,
    ) -> TutoResult<()> {
        let mut st = self.lock();
        st.calls.push(EditorCall::WriteLine {
            text: text.to_string(),
            line,
            append_newline,
        });
        let buf = st.active_buffer()?;
        match line {
            Some(n) => buf.replace_line(n, text),
            None => buf.insert(text),
        }
        if append_newline {
            buf.insert("\n");
        }
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> TutoResult<()> {
        let mut st = self.lock();
        st.calls.push(EditorCall::WriteText(text.to_string()));
        st.active_buffer()?.insert(text);
        Ok(())
    }

    fn delete_left(&mut self, count: usize) -> TutoResult<()> {
        let mut st = self.lock();
        st.calls.push(EditorCall::DeleteLeft(count));
        st.active_buffer()?.delete_left(count);
        Ok(())
    }

    fn delete_right(&mut self, count: usize) -> TutoResult<()> {
        let mut st = self.lock();
        st.calls.push(EditorCall::DeleteRight(count));
        st.active_buffer()?.delete_right(count);
        Ok(())
    }

    fn delete_lines(&mut self, count: usize) -> TutoResult<()> {
        let mut st = self.lock();
        st.calls.push(EditorCall::DeleteLines(count));
        st.active_buffer()?.delete_lines(count);
        Ok(())
    }

    fn highlight_line(&mut self, line: usize) -> TutoResult<()> {
        let mut st = self.lock();
        st.calls.push(EditorCall::Highlight(line));
        st.active_buffer()?;
        Ok(())
    }

    fn move_cursor(&mut self, line: usize, column: usize) -> TutoResult<()> {
        let mut st = self.lock();
        st.calls.push(EditorCall::MoveCursor { line, column });
        st.active_buffer()?.move_to(line, column);
        Ok(())
    }

    fn save_file(&mut self) -> TutoResult<()> {
        let mut st = self.lock();
        st.calls.push(EditorCall::Save);
        let path = st
            .active
            .clone()
            .ok_or_else(|| TutoError::executor("no file is open in the editor"))?;
        let text = st.active_buffer()?.text();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create '{}'", parent.display()))?;
        }
        std::fs::write(&path, text).with_context(|| format!("write '{}'", path.display()))?;
        Ok(())
    }

    fn start_recording(&mut self) -> TutoResult<()> {
        let mut st = self.lock();
        st.calls.push(EditorCall::StartRecording);
        if st.fail_recording {
            return Err(TutoError::capture("screen recorder unavailable"));
        }
        st.recording = true;
        Ok(())
    }

    fn stop_recording(&mut self) -> TutoResult<PathBuf> {
        let mut st = self.lock();
        st.calls.push(EditorCall::StopRecording);
        if st.fail_recording || !st.recording {
            return Err(TutoError::capture("no recording in progress"));
        }
        st.recording = false;
        st.capture
            .clone()
            .ok_or_else(|| TutoError::capture("recorder produced no capture file"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/executor/memory.rs"]
mod tests;
