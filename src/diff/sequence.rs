/// Kind of a [`DiffOp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Items present on both sides.
    Equal,
    /// Items only present in `after`.
    Insert,
    /// Items only present in `before`.
    Delete,
}

/// A maximal run of items sharing one [`DiffKind`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DiffOp<T> {
    /// What happened to `items`.
    pub kind: DiffKind,
    /// The affected items, in order.
    pub items: Vec<T>,
}

impl<T> DiffOp<T> {
    /// Number of items in the run.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` for an empty run (never produced by [`diff_sequence`]).
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Character-level diff op over a single line of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDiffOp {
    /// What happened to `text`.
    pub kind: DiffKind,
    /// The affected characters.
    pub text: String,
    /// Number of Unicode scalar values in `text`.
    pub count: usize,
}

// Furthest-reaching x per diagonal after `d` edits; diagonals -d..=d.
struct Round {
    d: isize,
    xs: Vec<Option<isize>>,
}

impl Round {
    fn new(d: isize) -> Self {
        Self {
            d,
            xs: vec![None; (2 * d + 1) as usize],
        }
    }

    fn get(&self, k: isize) -> Option<isize> {
        if k.abs() > self.d {
            return None;
        }
        self.xs[(k + self.d) as usize]
    }

    fn set(&mut self, k: isize, x: isize) {
        self.xs[(k + self.d) as usize] = Some(x);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Insert,
    Delete,
}

// Best predecessor move onto diagonal `k`; off-grid candidates are rejected. Ties go to the
// insert move, which keeps deletions ahead of insertions inside a replaced region.
fn step(prev: &Round, k: isize, n: isize, m: isize) -> Option<(isize, Edge)> {
    let down = prev.get(k + 1).filter(|x| x - k <= m);
    let right = prev.get(k - 1).map(|x| x + 1).filter(|x| *x <= n);
    match (down, right) {
        (Some(d), Some(r)) if d >= r => Some((d, Edge::Insert)),
        (_, Some(r)) => Some((r, Edge::Delete)),
        (Some(d), None) => Some((d, Edge::Insert)),
        (None, None) => None,
    }
}

fn search<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Round> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let mut rounds: Vec<Round> = Vec::new();
    for d in 0..=(n + m) {
        let mut round = Round::new(d);
        for k in (-d..=d).step_by(2) {
            let start = if d == 0 {
                Some(0)
            } else {
                step(&rounds[(d - 1) as usize], k, n, m).map(|(x, _)| x)
            };
            let Some(mut x) = start else {
                continue;
            };
            let mut y = x - k;
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            round.set(k, x);
            if x == n && y == m {
                rounds.push(round);
                return rounds;
            }
        }
        rounds.push(round);
    }
    rounds
}

fn push_merged<T: Clone>(ops: &mut Vec<DiffOp<T>>, kind: DiffKind, item: &T) {
    match ops.last_mut() {
        Some(last) if last.kind == kind => last.items.push(item.clone()),
        _ => ops.push(DiffOp {
            kind,
            items: vec![item.clone()],
        }),
    }
}

/// Shortest edit script turning `before` into `after`.
///
/// Runs the O((N+M)·D) Myers search and walks the recorded frontiers back from the end.
/// Adjacent items of one kind are merged into a single op. Equal inputs produce a single
/// [`DiffKind::Equal`] op; two empty inputs produce none. When one side is empty the result
/// is a single op for the other side, without searching.
pub fn diff_sequence<T: PartialEq + Clone>(before: &[T], after: &[T]) -> Vec<DiffOp<T>> {
    match (before.is_empty(), after.is_empty()) {
        (true, true) => return Vec::new(),
        (true, false) => {
            return vec![DiffOp {
                kind: DiffKind::Insert,
                items: after.to_vec(),
            }];
        }
        (false, true) => {
            return vec![DiffOp {
                kind: DiffKind::Delete,
                items: before.to_vec(),
            }];
        }
        (false, false) => {}
    }
    let rounds = search(before, after);
    let n = before.len() as isize;
    let m = after.len() as isize;

    let mut rev: Vec<(DiffKind, &T)> = Vec::new();
    let (mut x, mut y) = (n, m);
    for d in (1..rounds.len()).rev() {
        let k = x - y;
        // Every recorded frontier point was reached through a valid step.
        let Some((mx, edge)) = step(&rounds[d - 1], k, n, m) else {
            break;
        };
        let my = mx - k;
        while x > mx {
            x -= 1;
            rev.push((DiffKind::Equal, &before[x as usize]));
        }
        match edge {
            Edge::Insert => {
                rev.push((DiffKind::Insert, &after[(my - 1) as usize]));
                y = my - 1;
            }
            Edge::Delete => {
                rev.push((DiffKind::Delete, &before[(mx - 1) as usize]));
                x = mx - 1;
                y = my;
            }
        }
    }
    while x > 0 {
        x -= 1;
        rev.push((DiffKind::Equal, &before[x as usize]));
    }

    let mut ops = Vec::new();
    for (kind, item) in rev.into_iter().rev() {
        push_merged(&mut ops, kind, item);
    }
    ops
}

/// Character diff over Unicode scalar values.
pub fn diff_chars(before: &str, after: &str) -> Vec<TextDiffOp> {
    let a: Vec<char> = before.chars().collect();
    let b: Vec<char> = after.chars().collect();
    diff_sequence(&a, &b)
        .into_iter()
        .map(|op| TextDiffOp {
            kind: op.kind,
            count: op.items.len(),
            text: op.items.into_iter().collect(),
        })
        .collect()
}

/// Split text into lines, accepting both `\n` and `\r\n` terminators.
///
/// A trailing terminator yields a final empty line, so `"a\n"` is `["a", ""]`; empty text is
/// a single empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Line diff of two full texts, see [`split_lines`].
pub fn diff_lines(before: &str, after: &str) -> Vec<DiffOp<String>> {
    diff_sequence(&split_lines(before), &split_lines(after))
}

#[cfg(test)]
#[path = "../../tests/unit/diff/sequence.rs"]
mod tests;
