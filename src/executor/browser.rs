use std::path::PathBuf;

use crate::foundation::error::TutoResult;

/// A live browser session that can be navigated, poked at and screen-recorded.
pub trait BrowserExecutor {
    /// Load `url` in the active tab.
    fn navigate(&mut self, url: &str) -> TutoResult<()>;

    /// Click the element matching `selector`.
    fn click(&mut self, selector: &str) -> TutoResult<()>;

    /// Type `text` into the element matching `selector`.
    fn type_text(&mut self, selector: &str, text: &str) -> TutoResult<()>;

    /// Visually emphasize the element matching `selector`.
    fn highlight(&mut self, selector: &str) -> TutoResult<()>;

    /// Capture the current viewport and return the image file.
    fn screenshot(&mut self) -> TutoResult<PathBuf>;

    /// Begin screen recording.
    fn start_recording(&mut self) -> TutoResult<()>;

    /// Stop screen recording and return the raw capture file.
    fn stop_recording(&mut self) -> TutoResult<PathBuf>;
}
