use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EditScript, LinePair};

/// How a row of the diff relates the two documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Present, unchanged, on both sides.
    Same,
    /// Only in the right document.
    Added,
    /// Only in the left document.
    Removed,
    /// A left line shown against the right line that replaced it.
    Changed,
}

/// One row of a classified diff.
///
/// `left` is empty for [`LineKind::Added`] rows and `right` is empty for
/// [`LineKind::Removed`] rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    /// Classification of the row.
    pub kind: LineKind,
    /// Line from the left document.
    pub left: String,
    /// Line from the right document.
    pub right: String,
    /// 1-based position of the row in the output.
    pub ordinal: usize,
}

/// Row counts by kind. Unchanged rows are not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Rows only in the right document.
    pub added: usize,
    /// Rows only in the left document.
    pub removed: usize,
    /// Rows pairing a left line with its replacement.
    pub changed: usize,
}

impl DiffStats {
    /// Total number of differing rows.
    #[must_use]
    pub fn total(&self) -> usize {
        self.added + self.removed + self.changed
    }

    /// Indicates whether no row differs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn record(&mut self, kind: LineKind) {
        match kind {
            LineKind::Same => {}
            LineKind::Added => self.added += 1,
            LineKind::Removed => self.removed += 1,
            LineKind::Changed => self.changed += 1,
        }
    }
}

/// Expands a matching into one row per line, covering both sides completely.
///
/// Between two matched lines, leftover left and right lines are paired up as
/// [`LineKind::Changed`] rows for as long as both sides have some; the
/// surplus of the longer side follows as removals or additions. That pairing
/// is a presentation choice: the minimal edit script itself only knows
/// insertions and deletions.
///
/// Pairs that fall outside either sequence, or that join unequal lines, are
/// skipped, so a hand-built `matching` can never yield a false `same` row.
///
/// ```
/// # use docdiff_core::diff::{classify, compute_matching, LineKind};
/// let a = ["keep", "old", "tail"];
/// let b = ["keep", "new", "extra", "tail"];
/// let (lines, stats) = classify(&a, &b, &compute_matching(&a, &b));
/// let kinds: Vec<_> = lines.iter().map(|line| line.kind).collect();
/// assert_eq!(kinds, [LineKind::Same, LineKind::Changed, LineKind::Added, LineKind::Same]);
/// assert_eq!((stats.added, stats.removed, stats.changed), (1, 0, 1));
/// ```
#[must_use]
pub fn classify<S: AsRef<str>>(
    a: &[S],
    b: &[S],
    matching: &EditScript,
) -> (Vec<DiffLine>, DiffStats) {
    let pairs = usable_pairs(a, b, matching);
    let mut lines = Vec::with_capacity(a.len().max(b.len()));
    let mut stats = DiffStats::default();
    let mut a_cursor = 0usize;
    let mut b_cursor = 0usize;
    let mut pair_cursor = 0usize;

    let mut emit = |kind: LineKind, left: &str, right: &str| {
        stats.record(kind);
        lines.push(DiffLine {
            kind,
            left: left.to_string(),
            right: right.to_string(),
            ordinal: lines.len() + 1,
        });
    };

    while a_cursor < a.len() || b_cursor < b.len() {
        let (next_left, next_right) = pairs
            .get(pair_cursor)
            .map_or((a.len(), b.len()), |pair| (pair.left, pair.right));

        if next_left == a_cursor && next_right == b_cursor {
            let line = a[a_cursor].as_ref();
            emit(LineKind::Same, line, line);
            a_cursor += 1;
            b_cursor += 1;
            pair_cursor += 1;
            continue;
        }

        let left_run = next_left - a_cursor;
        let right_run = next_right - b_cursor;
        if left_run > 0 && right_run > 0 {
            emit(LineKind::Changed, a[a_cursor].as_ref(), b[b_cursor].as_ref());
            a_cursor += 1;
            b_cursor += 1;
        } else if left_run > 0 {
            emit(LineKind::Removed, a[a_cursor].as_ref(), "");
            a_cursor += 1;
        } else {
            emit(LineKind::Added, "", b[b_cursor].as_ref());
            b_cursor += 1;
        }
    }

    (lines, stats)
}

fn usable_pairs<S: AsRef<str>>(a: &[S], b: &[S], matching: &EditScript) -> Vec<LinePair> {
    let mut kept: Vec<LinePair> = Vec::with_capacity(matching.len());
    for &pair in matching {
        let usable = pair.left < a.len()
            && pair.right < b.len()
            && kept.last().is_none_or(|last| last.left < pair.left && last.right < pair.right)
            && a[pair.left].as_ref() == b[pair.right].as_ref();
        if usable {
            kept.push(pair);
        }
    }
    if kept.len() < matching.len() {
        let dropped = matching.len() - kept.len();
        debug!(dropped, "skipped line pairs that do not join equal lines");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{compute_matching, LinePair};
    use proptest::{collection::vec, prelude::*};

    fn run(a: &[&str], b: &[&str]) -> (Vec<DiffLine>, DiffStats) {
        classify(a, b, &compute_matching(a, b))
    }

    fn kinds(lines: &[DiffLine]) -> Vec<LineKind> {
        lines.iter().map(|line| line.kind).collect()
    }

    #[test]
    fn single_insertion_at_top() {
        let a = ["line1", "line2", "line3"];
        let (lines, stats) = run(&a, &["inserted", "line1", "line2", "line3"]);
        assert_eq!(
            kinds(&lines),
            [LineKind::Added, LineKind::Same, LineKind::Same, LineKind::Same]
        );
        assert_eq!(lines[0].right, "inserted");
        assert_eq!(lines[0].left, "");
        assert_eq!(stats, DiffStats { added: 1, removed: 0, changed: 0 });
    }

    #[test]
    fn ordinals_are_sequential() {
        let (lines, _) = run(&["a", "b", "c"], &["x", "b", "y", "z"]);
        let ordinals: Vec<_> = lines.iter().map(|line| line.ordinal).collect();
        assert_eq!(ordinals, (1..=lines.len()).collect::<Vec<_>>());
    }

    #[test]
    fn adjacent_modifications_pair_up_then_spill_over() {
        let (lines, stats) = run(&["k", "a1", "a2", "a3", "k2"], &["k", "b1", "k2"]);
        assert_eq!(
            kinds(&lines),
            [
                LineKind::Same,
                LineKind::Changed,
                LineKind::Removed,
                LineKind::Removed,
                LineKind::Same
            ]
        );
        assert_eq!((lines[1].left.as_str(), lines[1].right.as_str()), ("a1", "b1"));
        assert_eq!(lines[3].left, "a3");
        assert_eq!(lines[3].right, "");
        assert_eq!(stats, DiffStats { added: 0, removed: 2, changed: 1 });
    }

    #[test]
    fn trailing_runs_after_last_match() {
        let (lines, stats) = run(&["same", "gone"], &["same", "new1", "new2"]);
        assert_eq!(kinds(&lines), [LineKind::Same, LineKind::Changed, LineKind::Added]);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn empty_matching_classifies_everything() {
        let a = ["a"];
        let b = ["b", "c"];
        let (lines, stats) = classify(&a, &b, &EditScript::default());
        assert_eq!(kinds(&lines), [LineKind::Changed, LineKind::Added]);
        assert_eq!(stats, DiffStats { added: 1, removed: 0, changed: 1 });
    }

    #[test]
    fn explicit_script_is_honoured() {
        let a = ["x", "y"];
        let b = ["y", "x"];
        let script = EditScript::from_pairs(vec![LinePair::new(0, 1)]).unwrap();
        let (lines, _) = classify(&a, &b, &script);
        assert_eq!(kinds(&lines), [LineKind::Added, LineKind::Same, LineKind::Removed]);
    }

    #[test]
    fn out_of_range_pairs_are_skipped() {
        let a = ["x", "y"];
        let b = ["y"];
        let pairs = vec![LinePair::new(1, 0), LinePair::new(7, 9)];
        let script = EditScript::from_pairs(pairs).unwrap();
        let (lines, stats) = classify(&a, &b, &script);
        assert_eq!(kinds(&lines), [LineKind::Removed, LineKind::Same]);
        assert_eq!(stats, DiffStats { added: 0, removed: 1, changed: 0 });
    }

    #[test]
    fn pairs_joining_unequal_lines_never_report_same() {
        let a = ["x", "y"];
        let b = ["p", "q"];
        let pairs = vec![LinePair::new(0, 0), LinePair::new(1, 1)];
        let script = EditScript::from_pairs(pairs).unwrap();
        let (lines, stats) = classify(&a, &b, &script);
        assert_eq!(kinds(&lines), [LineKind::Changed, LineKind::Changed]);
        assert_eq!(stats.changed, 2);
    }

    #[test]
    fn deserialized_script_is_checked_against_the_lines() {
        let script: EditScript = serde_json::from_str(r#"[{"left":0,"right":5}]"#).unwrap();
        let (lines, _) = classify(&["a"], &["a"], &script);
        assert_eq!(kinds(&lines), [LineKind::Changed]);
    }

    #[test]
    fn kinds_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&LineKind::Changed).unwrap(), "\"changed\"");
    }

    proptest! {
        #[test]
        fn every_line_is_covered_exactly_once(
            a in vec("[abc]", 0..20),
            b in vec("[abc]", 0..20),
        ) {
            let (lines, stats) = classify(&a, &b, &compute_matching(&a, &b));
            let same = lines.iter().filter(|line| line.kind == LineKind::Same).count();
            prop_assert_eq!(same + stats.removed + stats.changed, a.len());
            prop_assert_eq!(same + stats.added + stats.changed, b.len());
            prop_assert_eq!(same + stats.total(), lines.len());

            let lefts: Vec<&str> = lines
                .iter()
                .filter(|line| line.kind != LineKind::Added)
                .map(|line| line.left.as_str())
                .collect();
            let rights: Vec<&str> = lines
                .iter()
                .filter(|line| line.kind != LineKind::Removed)
                .map(|line| line.right.as_str())
                .collect();
            prop_assert_eq!(lefts, a.iter().map(String::as_str).collect::<Vec<_>>());
            prop_assert_eq!(rights, b.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
