//! Matching pairer.
//!
//! Left items are associated with right items either by dragging a left item
//! onto a right item or by clicking a left item and then a right item. Both
//! gestures write the same sparse pair map. Several left items may point at
//! the same right item.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::answer::AnswerValue;
use crate::descriptor::{MatchPair, Payload};
use crate::error::ConfigError;

/// Local self-check verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchCheck {
    /// Some left items are unpaired; nothing was scored.
    Incomplete { missing: Vec<usize> },
    /// Every left item is paired.
    Scored { correct: usize, total: usize },
}

impl MatchCheck {
    pub fn is_perfect(&self) -> bool {
        matches!(self, MatchCheck::Scored { correct, total } if correct == total)
    }

    /// Fraction of correct pairs, if scored.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            MatchCheck::Scored { total: 0, .. } => Some(0.0),
            MatchCheck::Scored { correct, total } => Some(*correct as f64 / *total as f64),
            MatchCheck::Incomplete { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchingPairer {
    left: Vec<String>,
    right: Vec<String>,
    correct: Vec<MatchPair>,
    pairs: BTreeMap<usize, usize>,
    selected_left: Option<usize>,
    dragging_left: Option<usize>,
    last_check: Option<MatchCheck>,
}

impl MatchingPairer {
    /// Fails when either side has no items. Stored pairs outside the item
    /// ranges are dropped.
    pub fn new(payload: &Payload, stored: Option<&AnswerValue>) -> Result<Self, ConfigError> {
        let (left, right) = (&payload.left_items, &payload.right_items);
        if left.is_empty() || right.is_empty() {
            return Err(ConfigError::EmptyMatchingItems {
                left: left.len(),
                right: right.len(),
            });
        }

        let pairs = match stored {
            Some(AnswerValue::Matching(stored)) => stored
                .iter()
                .filter(|(&l, &r)| l < left.len() && r < right.len())
                .map(|(&l, &r)| (l, r))
                .collect(),
            _ => BTreeMap::new(),
        };

        Ok(Self {
            left: left.clone(),
            right: right.clone(),
            correct: payload.correct_matches.clone(),
            pairs,
            selected_left: None,
            dragging_left: None,
            last_check: None,
        })
    }

    pub fn left_items(&self) -> &[String] {
        &self.left
    }

    pub fn right_items(&self) -> &[String] {
        &self.right
    }

    pub fn pairs(&self) -> &BTreeMap<usize, usize> {
        &self.pairs
    }

    pub fn selected_left(&self) -> Option<usize> {
        self.selected_left
    }

    pub fn dragging_left(&self) -> Option<usize> {
        self.dragging_left
    }

    pub fn last_check(&self) -> Option<&MatchCheck> {
        self.last_check.as_ref()
    }

    pub fn partner_of(&self, left: usize) -> Option<usize> {
        self.pairs.get(&left).copied()
    }

    /// Every left item currently paired with `right`.
    pub fn lefts_for(&self, right: usize) -> Vec<usize> {
        self.pairs
            .iter()
            .filter(|(_, &r)| r == right)
            .map(|(&l, _)| l)
            .collect()
    }

    pub fn answer(&self) -> AnswerValue {
        AnswerValue::Matching(self.pairs.clone())
    }

    /// Click a left item: selects it, or deselects it if already selected.
    /// Returns the selection afterwards.
    pub fn select_left(&mut self, left: usize) -> Option<usize> {
        if left >= self.left.len() {
            tracing::debug!(left, "ignoring click on nonexistent left item");
            return self.selected_left;
        }
        self.selected_left = if self.selected_left == Some(left) {
            None
        } else {
            Some(left)
        };
        self.selected_left
    }

    /// Click a right item: pairs it with the selected left item, if any.
    pub fn click_right(&mut self, right: usize) -> Option<AnswerValue> {
        let left = self.selected_left?;
        let published = self.pair(left, right)?;
        self.selected_left = None;
        Some(published)
    }

    pub fn begin_drag(&mut self, left: usize) -> bool {
        if left >= self.left.len() {
            return false;
        }
        self.dragging_left = Some(left);
        true
    }

    pub fn cancel_drag(&mut self) {
        self.dragging_left = None;
    }

    /// Drop the dragged left item on a right item.
    pub fn drop_on_right(&mut self, right: usize) -> Option<AnswerValue> {
        let left = self.dragging_left.take()?;
        self.pair(left, right)
    }

    /// Create or overwrite the pair of `left`.
    pub fn pair(&mut self, left: usize, right: usize) -> Option<AnswerValue> {
        if left >= self.left.len() || right >= self.right.len() {
            tracing::debug!(left, right, "ignoring out-of-range pair");
            return None;
        }
        self.pairs.insert(left, right);
        Some(self.changed())
    }

    pub fn unpair(&mut self, left: usize) -> Option<AnswerValue> {
        self.pairs.remove(&left)?;
        Some(self.changed())
    }

    /// Drop every pair and any pending selection.
    pub fn clear(&mut self) -> AnswerValue {
        self.pairs.clear();
        self.selected_left = None;
        self.dragging_left = None;
        self.changed()
    }

    /// Score the pair map against the canonical pairs, once every left item
    /// is paired.
    pub fn check(&mut self) -> MatchCheck {
        let missing: Vec<usize> = (0..self.left.len())
            .filter(|l| !self.pairs.contains_key(l))
            .collect();

        let verdict = if missing.is_empty() {
            let correct = self
                .pairs
                .iter()
                .filter(|(&l, &r)| self.correct.iter().any(|m| m.left == l && m.right == r))
                .count();
            MatchCheck::Scored {
                correct,
                total: self.left.len(),
            }
        } else {
            MatchCheck::Incomplete { missing }
        };
        self.last_check = Some(verdict.clone());
        verdict
    }

    fn changed(&mut self) -> AnswerValue {
        self.last_check = None;
        self.answer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capitals() -> Payload {
        Payload {
            left_items: ["France", "Japan", "Peru"].map(String::from).to_vec(),
            right_items: ["Lima", "Paris", "Tokyo"].map(String::from).to_vec(),
            correct_matches: vec![
                MatchPair { left: 0, right: 1 },
                MatchPair { left: 1, right: 2 },
                MatchPair { left: 2, right: 0 },
            ],
            ..Payload::default()
        }
    }

    #[test]
    fn click_pairing_overwrites() {
        let mut m = MatchingPairer::new(&capitals(), None).unwrap();
        m.select_left(0);
        m.click_right(1);
        m.select_left(0);
        let published = m.click_right(2).unwrap();
        assert_eq!(published, AnswerValue::Matching(BTreeMap::from([(0, 2)])));
        assert!(m.selected_left().is_none());
    }

    #[test]
    fn click_same_left_deselects() {
        let mut m = MatchingPairer::new(&capitals(), None).unwrap();
        assert_eq!(m.select_left(1), Some(1));
        assert_eq!(m.select_left(2), Some(2));
        assert_eq!(m.select_left(2), None);
        assert!(m.click_right(0).is_none());
        assert!(m.pairs().is_empty());
    }

    #[test]
    fn drag_pairing() {
        let mut m = MatchingPairer::new(&capitals(), None).unwrap();
        assert!(m.begin_drag(2));
        assert_eq!(
            m.drop_on_right(0),
            Some(AnswerValue::Matching(BTreeMap::from([(2, 0)])))
        );
        assert!(m.drop_on_right(1).is_none());
    }

    #[test]
    fn right_items_may_be_shared() {
        let mut m = MatchingPairer::new(&capitals(), None).unwrap();
        m.pair(0, 1);
        m.pair(1, 1);
        assert_eq!(m.lefts_for(1), vec![0, 1]);
    }

    #[test]
    fn incomplete_is_never_scored() {
        let mut m = MatchingPairer::new(&capitals(), None).unwrap();
        m.pair(0, 1);
        m.pair(1, 2);
        assert_eq!(m.check(), MatchCheck::Incomplete { missing: vec![2] });
        assert!(m.check().fraction().is_none());
    }

    #[test]
    fn scored_check() {
        let mut m = MatchingPairer::new(&capitals(), None).unwrap();
        m.pair(0, 1);
        m.pair(1, 0);
        m.pair(2, 0);
        let verdict = m.check();
        assert_eq!(verdict, MatchCheck::Scored { correct: 2, total: 3 });
        assert!(!verdict.is_perfect());
        m.pair(1, 2);
        assert!(m.last_check().is_none());
        assert!(m.check().is_perfect());
    }

    #[test]
    fn clear_empties_map_and_selection() {
        let mut m = MatchingPairer::new(&capitals(), None).unwrap();
        m.pair(0, 1);
        m.select_left(2);
        assert_eq!(m.clear(), AnswerValue::Matching(BTreeMap::new()));
        assert!(m.selected_left().is_none());
    }

    #[test]
    fn empty_side_is_config_error() {
        let mut payload = capitals();
        payload.right_items.clear();
        assert_eq!(
            MatchingPairer::new(&payload, None).unwrap_err(),
            ConfigError::EmptyMatchingItems { left: 3, right: 0 }
        );
    }

    #[test]
    fn stored_pairs_filtered_to_range() {
        let stored = AnswerValue::Matching(BTreeMap::from([(0, 1), (5, 0), (1, 9)]));
        let m = MatchingPairer::new(&capitals(), Some(&stored)).unwrap();
        assert_eq!(m.pairs(), &BTreeMap::from([(0, 1)]));
    }

    #[test]
    fn unpair_removes_entry() {
        let mut m = MatchingPairer::new(&capitals(), None).unwrap();
        m.pair(0, 1);
        assert_eq!(m.unpair(0), Some(AnswerValue::Matching(BTreeMap::new())));
        assert!(m.unpair(0).is_none());
    }
}
