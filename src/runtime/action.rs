use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::TutoResult;

/// How a file is presented while it is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMode {
    /// Lines are typed out one by one as the script reaches them.
    #[serde(rename = "i", alias = "input")]
    Input,
    /// The file already exists; lines are edited in place.
    #[serde(rename = "e", alias = "edit")]
    Edit,
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "i",
            Self::Edit => "e",
        })
    }
}

/// One instruction of a compiled tutorial script.
///
/// JSON form is internally tagged on `type` with camelCase names, e.g.
/// `{"type": "inputLine", "path": "src/app.js", "line": 3, "text": "..."}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Speak `text` over a slide, or over a live browser recording when `browser` is set.
    Narrate {
        /// Narration text.
        text: String,
        /// Explicit slide length in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
        /// Page to show while narrating; empty or `"true"` keeps the current page.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        browser: Option<String>,
    },
    /// Open a file in the editor, or show it as a static preview.
    OpenFile {
        /// Path as written in the script, relative to the project directory.
        path: String,
        /// Presentation mode.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<FileMode>,
    },
    /// Finish with a file: type whatever is left, or show it whole.
    CloseFile {
        /// Path as given to [`Action::OpenFile`].
        path: String,
    },
    /// Reveal (type) a file up to `line`.
    InputLine {
        /// Path as given to [`Action::OpenFile`].
        path: String,
        /// 1-based target line.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<usize>,
        /// Narration for this step.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// Point at an existing line.
    EditLine {
        /// Path as given to [`Action::OpenFile`].
        path: String,
        /// 1-based line.
        line: usize,
        /// Narration for this step.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// Highlight a page element.
    Highlight {
        /// CSS selector.
        selector: String,
        /// Narration while the element is highlighted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        narration: Option<String>,
    },
    /// Click a page element.
    Click {
        /// CSS selector.
        selector: String,
        /// Narration while clicking.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        narration: Option<String>,
    },
    /// Open a page; relative targets resolve against the project directory.
    Navigate {
        /// URL or project-relative path.
        target: String,
    },
    /// Leave the page opened by [`Action::Navigate`].
    CloseBrowser {
        /// Target given to [`Action::Navigate`].
        target: String,
    },
    /// Move the project to another commit.
    CheckoutCommit {
        /// Any revision `git` understands.
        commit: String,
    },
    /// Append an already-rendered clip.
    InsertClip {
        /// Clip file.
        path: PathBuf,
    },
    /// Concatenate every segment produced so far.
    Merge {
        /// Final video path; defaults to a file in the run's temp directory.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output: Option<PathBuf>,
    },
}

impl Action {
    /// The action's tag as it appears in JSON and in the action log.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Narrate { .. } => "narrate",
            Self::OpenFile { .. } => "openFile",
            Self::CloseFile { .. } => "closeFile",
            Self::InputLine { .. } => "inputLine",
            Self::EditLine { .. } => "editLine",
            Self::Highlight { .. } => "highlight",
            Self::Click { .. } => "click",
            Self::Navigate { .. } => "navigate",
            Self::CloseBrowser { .. } => "closeBrowser",
            Self::CheckoutCommit { .. } => "checkoutCommit",
            Self::InsertClip { .. } => "insertClip",
            Self::Merge { .. } => "merge",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match self {
            Self::Narrate { text, .. } => {
                let short: String = text.chars().take(40).collect();
                write!(f, "{name} \"{short}\"")
            }
            Self::OpenFile { path, .. } | Self::CloseFile { path } => write!(f, "{name} {path}"),
            Self::InputLine { path, line, .. } => match line {
                Some(line) => write!(f, "{name} {path}:{line}"),
                None => write!(f, "{name} {path}"),
            },
            Self::EditLine { path, line, .. } => write!(f, "{name} {path}:{line}"),
            Self::Highlight { selector, .. } | Self::Click { selector, .. } => {
                write!(f, "{name} {selector}")
            }
            Self::Navigate { target } | Self::CloseBrowser { target } => {
                write!(f, "{name} {target}")
            }
            Self::CheckoutCommit { commit } => write!(f, "{name} {commit}"),
            Self::InsertClip { path } => write!(f, "{name} {}", path.display()),
            Self::Merge { output } => match output {
                Some(out) => write!(f, "{name} {}", out.display()),
                None => f.write_str(name),
            },
        }
    }
}

/// Parse a JSON array of actions.
pub fn parse_actions(json: &str) -> TutoResult<Vec<Action>> {
    Ok(serde_json::from_str(json).context("parse action stream JSON")?)
}

/// Read and parse an action stream file.
pub fn load_actions(path: &Path) -> TutoResult<Vec<Action>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read action stream '{}'", path.display()))?;
    parse_actions(&text)
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/action.rs"]
mod tests;
