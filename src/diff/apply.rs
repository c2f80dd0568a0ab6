use crate::diff::sequence::{DiffKind, diff_chars, diff_lines, split_lines};
use crate::executor::code::CodeExecutor;
use crate::foundation::error::TutoResult;

/// Turn line `line` (1-based) of the live buffer from `before` into `after` with
/// character-level edits.
///
/// Unchanged runs only move the cursor; deleted runs are removed with one
/// [`CodeExecutor::delete_right`]; inserted runs are typed in place. Nothing is emitted when
/// the two lines are equal.
pub fn apply_line_diff(
    editor: &mut dyn CodeExecutor,
    line: usize,
    before: &str,
    after: &str,
) -> TutoResult<()> {
    if before == after {
        return Ok(());
    }
    editor.move_cursor(line, 1)?;
    let mut column = 1;
    for op in diff_chars(before, after) {
        match op.kind {
            DiffKind::Equal => {
                column += op.count;
                editor.move_cursor(line, column)?;
            }
            DiffKind::Delete => editor.delete_right(op.count)?,
            DiffKind::Insert => {
                editor.write_text(&op.text)?;
                column += op.count;
            }
        }
    }
    Ok(())
}

/// Replay the edit from `before` to `after` (both full file contents) against the active
/// buffer, which must currently hold `before`.
///
/// Replaced regions pair deleted and inserted lines by position and diff each pair by
/// character; leftover lines are removed or typed whole. Unchanged lines are never touched.
pub fn apply_file_diff(editor: &mut dyn CodeExecutor, before: &str, after: &str) -> TutoResult<()> {
    let ops = diff_lines(before, after);
    let mut lines = split_lines(before);
    let mut ln = 1usize;
    let mut i = 0;
    while i < ops.len() {
        let op = &ops[i];
        match op.kind {
            DiffKind::Equal => {
                ln += op.len();
                i += 1;
            }
            DiffKind::Delete if ops.get(i + 1).is_some_and(|n| n.kind == DiffKind::Insert) => {
                let deleted = &op.items;
                let inserted = &ops[i + 1].items;
                let paired = deleted.len().min(inserted.len());
                for j in 0..paired {
                    apply_line_diff(editor, ln + j, &deleted[j], &inserted[j])?;
                    lines[ln - 1 + j] = inserted[j].clone();
                }
                if deleted.len() > paired {
                    let extra = deleted.len() - paired;
                    editor.move_cursor(ln + paired, 1)?;
                    editor.delete_lines(extra)?;
                    lines.drain(ln - 1 + paired..ln - 1 + paired + extra);
                }
                if inserted.len() > paired {
                    insert_lines(editor, ln + paired, &inserted[paired..], &mut lines)?;
                }
                ln += inserted.len();
                i += 2;
            }
            DiffKind::Delete => {
                editor.move_cursor(ln, 1)?;
                editor.delete_lines(op.len())?;
                lines.drain(ln - 1..ln - 1 + op.len());
                i += 1;
            }
            DiffKind::Insert => {
                insert_lines(editor, ln, &op.items, &mut lines)?;
                ln += op.len();
                i += 1;
            }
        }
    }
    Ok(())
}

fn insert_lines(
    editor: &mut dyn CodeExecutor,
    at: usize,
    new_lines: &[String],
    lines: &mut Vec<String>,
) -> TutoResult<()> {
    if at > lines.len() && !lines.is_empty() {
        let last = lines.len();
        let end_col = lines[last - 1].chars().count() + 1;
        editor.move_cursor(last, end_col)?;
        editor.write_text(&format!("\n{}", new_lines.join("\n")))?;
        lines.extend(new_lines.iter().cloned());
        return Ok(());
    }
    editor.move_cursor(at, 1)?;
    for text in new_lines {
        editor.write_text(&format!("{text}\n"))?;
    }
    let at = (at - 1).min(lines.len());
    lines.splice(at..at, new_lines.iter().cloned());
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/diff/apply.rs"]
mod tests;
