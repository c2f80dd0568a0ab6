use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::diff::apply::apply_file_diff;
use crate::diff::sequence::split_lines;
use crate::executor::code::{CodeExecutor, OpenFileOptions};
use crate::foundation::error::TutoResult;
use crate::git::changes::{GitChange, parse_name_status};
use crate::git::cli::Git;

/// Replays the changes between two commits into a live editor, file by file.
///
/// Files are addressed under `root` (a checkout of the first commit). Only paths under the
/// project prefix are touched. The last replayed content of every file is remembered so
/// consecutive steps diff against what the editor actually shows.
#[derive(Debug)]
pub struct GitDiffApplier {
    git: Git,
    root: PathBuf,
    prefix: String,
    contents: HashMap<String, String>,
}

impl GitDiffApplier {
    /// Applier rooted at the checkout `root`, limited to repo-relative `prefix` (empty for the
    /// whole repository).
    pub fn new(root: impl Into<PathBuf>, prefix: &str) -> Self {
        let root = root.into();
        Self {
            git: Git::new(root.clone()),
            root,
            prefix: prefix.trim_matches('/').to_string(),
            contents: HashMap::new(),
        }
    }

    /// `true` when repo-relative `path` lies inside the project prefix.
    pub fn in_scope(&self, path: &str) -> bool {
        self.prefix.is_empty()
            || path == self.prefix
            || path
                .strip_prefix(self.prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Replay `from..to` into `editor`. Returns the number of files touched.
    #[tracing::instrument(skip(self, editor))]
    pub fn apply(
        &mut self,
        from: &str,
        to: &str,
        editor: &mut dyn CodeExecutor,
    ) -> TutoResult<usize> {
        let raw = self.git.name_status_diff(from, to)?;
        let mut touched = 0;
        for change in parse_name_status(&raw) {
            match change {
                GitChange::Rename { from: old, to: new } => {
                    if self.in_scope(&old) {
                        self.delete(from, &old, editor)?;
                        touched += 1;
                    }
                    if self.in_scope(&new) {
                        self.add(to, &new, editor)?;
                        touched += 1;
                    }
                }
                GitChange::Delete(path) if self.in_scope(&path) => {
                    self.delete(from, &path, editor)?;
                    touched += 1;
                }
                GitChange::Add(path) if self.in_scope(&path) => {
                    self.add(to, &path, editor)?;
                    touched += 1;
                }
                GitChange::Modify(path) if self.in_scope(&path) => {
                    self.modify(from, to, &path, editor)?;
                    touched += 1;
                }
                other => tracing::debug!(?other, "outside project prefix"),
            }
        }
        Ok(touched)
    }

    fn abs(&self, path: &str) -> PathBuf {
        self.root.join(Path::new(path))
    }

    fn before(&self, commit: &str, path: &str) -> TutoResult<String> {
        if let Some(text) = self.contents.get(path) {
            return Ok(text.clone());
        }
        Ok(self.git.show_file(commit, path)?.unwrap_or_default())
    }

    fn modify(
        &mut self,
        from: &str,
        to: &str,
        path: &str,
        editor: &mut dyn CodeExecutor,
    ) -> TutoResult<()> {
        let before = self.before(from, path)?;
        let after = self.git.show_file(to, path)?.unwrap_or_default();
        editor.open_file(&self.abs(path), OpenFileOptions::keep())?;
        apply_file_diff(editor, &before, &after)?;
        editor.save_file()?;
        tracing::debug!(path, "modified");
        self.contents.insert(path.to_string(), after);
        Ok(())
    }

    fn add(&mut self, to: &str, path: &str, editor: &mut dyn CodeExecutor) -> TutoResult<()> {
        let after = self.git.show_file(to, path)?.unwrap_or_default();
        editor.open_file(&self.abs(path), OpenFileOptions::fresh())?;
        editor.write_text(&after)?;
        editor.save_file()?;
        tracing::debug!(path, "added");
        self.contents.insert(path.to_string(), after);
        Ok(())
    }

    fn delete(&mut self, from: &str, path: &str, editor: &mut dyn CodeExecutor) -> TutoResult<()> {
        let before = self.before(from, path)?;
        editor.open_file(&self.abs(path), OpenFileOptions::default())?;
        editor.move_cursor(1, 1)?;
        editor.delete_lines(split_lines(&before).len().max(1))?;
        editor.save_file()?;
        tracing::debug!(path, "emptied");
        self.contents.remove(path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/git/applier.rs"]
mod tests;
