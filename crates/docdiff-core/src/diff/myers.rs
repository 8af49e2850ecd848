use tracing::trace;

use super::{EditScript, LinePair};

/// Furthest x reached on each diagonal `-d..=d` after `d` non-diagonal moves.
struct Frontier {
    d: isize,
    reach: Vec<usize>,
}

impl Frontier {
    fn reach(&self, k: isize) -> usize {
        self.reach[(k + self.d) as usize]
    }
}

/// Computes a longest common subsequence of `a` and `b` as matched index pairs.
///
/// This is Myers' greedy shortest-edit-script search: the result pairs every
/// line that a minimal insert/delete script leaves untouched. Runs in
/// O((N+M)·D) time, where D is the edit distance, and keeps one frontier
/// snapshot per distance for the backtrace.
///
/// ```
/// # use docdiff_core::diff::compute_matching;
/// let a = ["A", "B", "C", "D"];
/// let b = ["A", "X", "B", "D"];
/// let script = compute_matching(&a, &b);
/// let common: Vec<_> = script.iter().map(|pair| a[pair.left]).collect();
/// assert_eq!(common, ["A", "B", "D"]);
/// ```
#[must_use]
pub fn compute_matching<T: PartialEq>(a: &[T], b: &[T]) -> EditScript {
    if a.is_empty() || b.is_empty() {
        return EditScript::default();
    }
    let frontiers = shortest_edit(a, b);
    let pairs = backtrack(&frontiers, a.len(), b.len());
    trace!(
        edit_distance = frontiers.len() - 1,
        snapshots = frontiers.len(),
        matched = pairs.len(),
        left_lines = a.len(),
        right_lines = b.len(),
        "line matching finished"
    );
    EditScript::from_sorted(pairs)
}

fn shortest_edit<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Frontier> {
    let n = a.len();
    let m = b.len();
    let max = n + m;
    // v[offset + k] holds the reach of diagonal k; k±1 stays in bounds for |k| <= max.
    let offset = max + 1;
    let slot = |k: isize| (offset as isize + k) as usize;
    let mut v = vec![0usize; 2 * max + 3];
    let mut frontiers = Vec::new();

    for d in 0..=max as isize {
        let mut finished = false;
        for k in (-d..=d).step_by(2) {
            let mut x = if k == -d || (k != d && v[slot(k - 1)] < v[slot(k + 1)]) {
                v[slot(k + 1)]
            } else {
                v[slot(k - 1)] + 1
            };
            let mut y = (x as isize - k) as usize;
            while x < n && y < m && a[x] == b[y] {
                x += 1;
                y += 1;
            }
            v[slot(k)] = x;
            if x >= n && y >= m {
                finished = true;
                break;
            }
        }
        frontiers.push(Frontier { d, reach: v[slot(-d)..=slot(d)].to_vec() });
        if finished {
            break;
        }
    }
    frontiers
}

fn backtrack(frontiers: &[Frontier], n: usize, m: usize) -> Vec<LinePair> {
    let mut pairs = Vec::new();
    let mut x = n;
    let mut y = m;

    for d in (1..frontiers.len()).rev() {
        let previous = &frontiers[d - 1];
        let d = d as isize;
        let k = x as isize - y as isize;
        let prev_k =
            if k == -d || (k != d && previous.reach(k - 1) < previous.reach(k + 1)) {
                k + 1
            } else {
                k - 1
            };
        let prev_x = previous.reach(prev_k);
        let prev_y = (prev_x as isize - prev_k) as usize;

        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            pairs.push(LinePair::new(x, y));
        }
        x = prev_x;
        y = prev_y;
    }

    // Whatever is left is the run of equal lines at the very start.
    while x > 0 && y > 0 {
        x -= 1;
        y -= 1;
        pairs.push(LinePair::new(x, y));
    }

    pairs.reverse();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{collection::vec, prelude::*};

    fn matched<'a>(a: &[&'a str], b: &[&'a str]) -> Vec<&'a str> {
        compute_matching(a, b).iter().map(|pair| a[pair.left]).collect()
    }

    /// Dynamic-programming LCS length, used as an oracle.
    fn lcs_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
        let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for (i, left) in a.iter().enumerate() {
            for (j, right) in b.iter().enumerate() {
                table[i + 1][j + 1] = if left == right {
                    table[i][j] + 1
                } else {
                    table[i][j + 1].max(table[i + 1][j])
                };
            }
        }
        table[a.len()][b.len()]
    }

    #[test]
    fn empty_sides_share_nothing() {
        assert!(compute_matching::<&str>(&[], &["a"]).is_empty());
        assert!(compute_matching::<&str>(&["a"], &[]).is_empty());
        assert!(compute_matching::<&str>(&[], &[]).is_empty());
    }

    #[test]
    fn identical_sequences_match_fully() {
        let lines = ["x", "y", "z"];
        let script = compute_matching(&lines, &lines);
        assert_eq!(
            script.pairs(),
            &[LinePair::new(0, 0), LinePair::new(1, 1), LinePair::new(2, 2)]
        );
    }

    #[test]
    fn insertion_at_top_keeps_the_rest() {
        let script = compute_matching(&["l1", "l2", "l3"], &["new", "l1", "l2", "l3"]);
        assert_eq!(
            script.pairs(),
            &[LinePair::new(0, 1), LinePair::new(1, 2), LinePair::new(2, 3)]
        );
    }

    #[test]
    fn substitution_in_the_middle() {
        assert_eq!(matched(&["A", "B", "C", "D"], &["A", "X", "B", "D"]), ["A", "B", "D"]);
    }

    #[test]
    fn completely_different_sequences() {
        assert!(compute_matching(&["a", "b"], &["c", "d", "e"]).is_empty());
    }

    #[test]
    fn classic_myers_example() {
        let a: Vec<char> = "ABCABBA".chars().collect();
        let b: Vec<char> = "CBABAC".chars().collect();
        let script = compute_matching(&a, &b);
        assert_eq!(script.len(), 4);
        for pair in &script {
            assert_eq!(a[pair.left], b[pair.right]);
        }
    }

    proptest! {
        #[test]
        fn matching_is_a_longest_common_subsequence(
            a in vec(0u8..4, 0..24),
            b in vec(0u8..4, 0..24),
        ) {
            let script = compute_matching(&a, &b);
            prop_assert_eq!(script.len(), lcs_len(&a, &b));
            for pair in &script {
                prop_assert_eq!(a[pair.left], b[pair.right]);
            }
            for window in script.pairs().windows(2) {
                prop_assert!(window[0].left < window[1].left);
                prop_assert!(window[0].right < window[1].right);
            }
        }
    }
}
