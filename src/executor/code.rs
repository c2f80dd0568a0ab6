use std::path::{Path, PathBuf};

use crate::foundation::error::TutoResult;

/// Options for [`CodeExecutor::open_file`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpenFileOptions {
    /// Create the file when it does not exist yet.
    pub create_if_missing: bool,
    /// Empty the buffer after opening (used before typing a file from scratch).
    pub clear: bool,
}

impl OpenFileOptions {
    /// Open (creating if needed) and clear: the starting point of a typed-from-scratch file.
    pub fn fresh() -> Self {
        Self {
            create_if_missing: true,
            clear: true,
        }
    }

    /// Open (creating if needed) and keep the existing content.
    pub fn keep() -> Self {
        Self {
            create_if_missing: true,
            clear: false,
        }
    }
}

/// A live code editor session that can be driven keystroke by keystroke and screen-recorded.
///
/// Lines and columns are 1-based. Column `n` addresses the position before the `n`-th character
/// of a line, so column `len + 1` is the end of the line.
pub trait CodeExecutor {
    /// Open `path` in the editor and make it the active buffer.
    fn open_file(&mut self, path: &Path, opts: OpenFileOptions) -> TutoResult<()>;

    /// Type a line of text.
    ///
    /// With `line = Some(n)` the content of line `n` is replaced; with `None` the text is typed
    /// at the cursor. `append_newline` types a trailing line break.
    fn write_line(&mut self, text: &str, line: Option<usize>, append_newline: bool)
    -> TutoResult<()>;

    /// Type `text` at the cursor; may contain line breaks.
    fn write_text(&mut self, text: &str) -> TutoResult<()>;

    /// Delete `count` characters left of the cursor.
    fn delete_left(&mut self, count: usize) -> TutoResult<()>;

    /// Delete `count` characters right of the cursor.
    fn delete_right(&mut self, count: usize) -> TutoResult<()>;

    /// Delete `count` whole lines starting at the cursor line.
    fn delete_lines(&mut self, count: usize) -> TutoResult<()>;

    /// Visually emphasize one line.
    fn highlight_line(&mut self, line: usize) -> TutoResult<()>;

    /// Move the cursor to `line`, `column`.
    fn move_cursor(&mut self, line: usize, column: usize) -> TutoResult<()>;

    /// Persist the active buffer.
    fn save_file(&mut self) -> TutoResult<()>;

    /// Begin screen recording.
    fn start_recording(&mut self) -> TutoResult<()>;

    /// Stop screen recording and return the raw capture file.
    fn stop_recording(&mut self) -> TutoResult<PathBuf>;
}
