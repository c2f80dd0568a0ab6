/// One file-level change between two commits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GitChange {
    /// Content changed in place (`M`, `T` and anything unrecognized).
    Modify(String),
    /// New file (`A`, and the destination of a copy `C<score>`).
    Add(String),
    /// Removed file (`D`).
    Delete(String),
    /// Moved file, possibly also edited (`R<score>`).
    Rename {
        /// Path before the move.
        from: String,
        /// Path after the move.
        to: String,
    },
}

impl GitChange {
    /// Every repo-relative path the change touches.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Self::Modify(p) | Self::Add(p) | Self::Delete(p) => vec![p.as_str()],
            Self::Rename { from, to } => vec![from.as_str(), to.as_str()],
        }
    }
}

/// Parse `git diff --name-status` output. Blank and incomplete lines are skipped.
pub fn parse_name_status(raw: &str) -> Vec<GitChange> {
    let mut out = Vec::new();
    for line in raw.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('\t').filter(|p| !p.is_empty()).collect();
        let Some(status) = parts.first().and_then(|s| s.chars().next()) else {
            continue;
        };
        match (status, parts.as_slice()) {
            ('R', [_, from, to, ..]) => out.push(GitChange::Rename {
                from: (*from).to_string(),
                to: (*to).to_string(),
            }),
            ('C', [_, _, to, ..]) => out.push(GitChange::Add((*to).to_string())),
            ('A', [_, path, ..]) => out.push(GitChange::Add((*path).to_string())),
            ('D', [_, path, ..]) => out.push(GitChange::Delete((*path).to_string())),
            ('R' | 'C', _) => {
                tracing::debug!(line, "skipping incomplete name-status line");
            }
            (_, [_, path, ..]) => out.push(GitChange::Modify((*path).to_string())),
            _ => {
                tracing::debug!(line, "skipping incomplete name-status line");
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/git/changes.rs"]
mod tests;
