//! Line matching and classification.
//!
//! [`compute_matching`] finds a longest common subsequence of two line
//! sequences with Myers' O((N+M)·D) shortest-edit-script search.
//! [`classify`] turns that matching into one [`DiffLine`] per output row.

mod classify;
mod myers;

pub use classify::{classify, DiffLine, DiffStats, LineKind};
pub use myers::compute_matching;

use serde::{Deserialize, Serialize};

use crate::UnorderedPairs;

/// A line present in both sequences: `left` indexes the base, `right` the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinePair {
    /// Zero-based index into the left sequence.
    pub left: usize,
    /// Zero-based index into the right sequence.
    pub right: usize,
}

impl LinePair {
    /// Creates a pair.
    #[must_use]
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }
}

/// Matched line pairs, strictly ascending on both sides.
///
/// Serializes as a plain array of pairs; deserializing rejects arrays that
/// do not ascend.
///
/// ```
/// # use docdiff_core::diff::{compute_matching, EditScript, LinePair};
/// let script = compute_matching(&["a", "b"], &["b"]);
/// assert_eq!(script.pairs(), &[LinePair::new(1, 0)]);
///
/// let unordered = EditScript::from_pairs(vec![LinePair::new(2, 2), LinePair::new(1, 3)]);
/// assert_eq!(unordered.unwrap_err().index, 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LinePair>", into = "Vec<LinePair>")]
pub struct EditScript {
    pairs: Vec<LinePair>,
}

impl EditScript {
    /// Builds a script, checking that the pairs ascend on both sides.
    pub fn from_pairs(pairs: Vec<LinePair>) -> Result<Self, UnorderedPairs> {
        match pairs.windows(2).position(|w| !ascends(w[0], w[1])) {
            Some(offset) => Err(UnorderedPairs { index: offset + 1 }),
            None => Ok(Self { pairs }),
        }
    }

    pub(crate) fn from_sorted(pairs: Vec<LinePair>) -> Self {
        debug_assert!(pairs.windows(2).all(|w| ascends(w[0], w[1])));
        Self { pairs }
    }

    /// Number of matched lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Indicates whether no line is shared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The matched pairs in ascending order.
    #[must_use]
    pub fn pairs(&self) -> &[LinePair] {
        &self.pairs
    }

    /// Returns an iterator over the pairs.
    pub fn iter(&self) -> std::slice::Iter<'_, LinePair> {
        self.pairs.iter()
    }
}

fn ascends(before: LinePair, after: LinePair) -> bool {
    before.left < after.left && before.right < after.right
}

impl TryFrom<Vec<LinePair>> for EditScript {
    type Error = UnorderedPairs;

    fn try_from(pairs: Vec<LinePair>) -> Result<Self, Self::Error> {
        Self::from_pairs(pairs)
    }
}

impl From<EditScript> for Vec<LinePair> {
    fn from(script: EditScript) -> Self {
        script.pairs
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a LinePair;
    type IntoIter = std::slice::Iter<'a, LinePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl IntoIterator for EditScript {
    type Item = LinePair;
    type IntoIter = std::vec::IntoIter<LinePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unordered_pairs_are_rejected() {
        let pairs = vec![LinePair::new(0, 0), LinePair::new(1, 1), LinePair::new(1, 2)];
        assert_eq!(EditScript::from_pairs(pairs), Err(UnorderedPairs { index: 2 }));
        assert!(EditScript::from_pairs(Vec::new()).is_ok());
    }

    #[test]
    fn serde_round_trips_as_an_array() {
        let pairs = vec![LinePair::new(0, 1), LinePair::new(2, 3)];
        let script = EditScript::from_pairs(pairs).unwrap();
        let json = serde_json::to_string(&script).unwrap();
        assert_eq!(json, r#"[{"left":0,"right":1},{"left":2,"right":3}]"#);
        assert_eq!(serde_json::from_str::<EditScript>(&json).unwrap(), script);
    }

    #[test]
    fn deserializing_unordered_pairs_fails() {
        let json = r#"[{"left":3,"right":3},{"left":1,"right":5}]"#;
        let err = serde_json::from_str::<EditScript>(json).unwrap_err();
        assert!(err.to_string().contains("line pair 1 does not ascend"), "{err}");
    }
}
