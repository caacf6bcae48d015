//! Puzzle fragment assembler.
//!
//! Fragments start shuffled in the pool and are dragged into the chain, the
//! ordered candidate solution. A fragment's `uid` is reminted every time it
//! crosses between pool and chain; its content and original index never
//! change. The pool and chain always partition the payload's fragments.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answer::AnswerValue;
use crate::config::EngineConfig;
use crate::descriptor::Payload;

/// A movable unit of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub uid: Uuid,
    pub content: String,
    /// Position in the payload's fragment list; `None` for orphans restored
    /// from a stored answer that no longer matches the payload.
    pub original_index: Option<usize>,
}

impl Fragment {
    fn new(content: String, original_index: Option<usize>) -> Self {
        Self {
            uid: Uuid::new_v4(),
            content,
            original_index,
        }
    }

    fn reminted(self) -> Self {
        Self {
            uid: Uuid::new_v4(),
            ..self
        }
    }
}

/// Where a fragment currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Pool,
    Chain,
}

/// Which comparison accepted an assembled answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Equal after trimming.
    Exact,
    /// Equal after removing all whitespace.
    Compact,
    /// Equal after mapping ASCII arrows to the arrow glyph.
    Arrow,
}

/// Compares an assembled chain against the canonical solution.
#[derive(Debug, Clone)]
pub struct SolutionMatcher {
    separator: String,
    arrow_glyph: String,
    ascii_arrows: Vec<String>,
}

impl SolutionMatcher {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            separator: config.chain_separator.clone(),
            arrow_glyph: config.arrow_glyph.clone(),
            ascii_arrows: config.ascii_arrows.clone(),
        }
    }

    pub fn join(&self, contents: &[String]) -> String {
        contents.join(&self.separator)
    }

    /// The first rule under which `assembled` equals `solution`.
    ///
    /// The arrow rule is only tried when the solution itself spells an
    /// arrow, either as the glyph or in ASCII. A solution written with `->`
    /// therefore also accepts a chain using the glyph, and the other way
    /// round. After normalization both the trimmed and the compact
    /// comparisons apply.
    pub fn matches(&self, assembled: &str, solution: &str) -> Option<MatchRule> {
        if assembled.trim() == solution.trim() {
            return Some(MatchRule::Exact);
        }
        if compact(assembled) == compact(solution) {
            return Some(MatchRule::Compact);
        }
        if self.spells_arrow(solution) {
            let assembled = self.normalize_arrows(assembled);
            let solution = self.normalize_arrows(solution);
            if assembled.trim() == solution.trim() || compact(&assembled) == compact(&solution) {
                return Some(MatchRule::Arrow);
            }
        }
        None
    }

    fn spells_arrow(&self, text: &str) -> bool {
        (!self.arrow_glyph.is_empty() && text.contains(&self.arrow_glyph))
            || self
                .ascii_arrows
                .iter()
                .any(|a| !a.is_empty() && text.contains(a.as_str()))
    }

    fn normalize_arrows(&self, text: &str) -> String {
        self.ascii_arrows
            .iter()
            .filter(|a| !a.is_empty())
            .fold(text.to_string(), |acc, arrow| {
                acc.replace(arrow.as_str(), &self.arrow_glyph)
            })
    }
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[derive(Debug, Clone)]
pub struct PuzzleAssembler {
    solution: Option<String>,
    fragment_count: usize,
    pool: Vec<Fragment>,
    chain: Vec<Fragment>,
    dragging: Option<Uuid>,
    last_check: Option<bool>,
    matcher: SolutionMatcher,
}

impl PuzzleAssembler {
    /// Build fragment records from the payload. A non-empty stored chain is
    /// restored by content; otherwise every fragment is shuffled into the
    /// pool.
    pub fn new<R: Rng + ?Sized>(
        payload: &Payload,
        stored: Option<&AnswerValue>,
        config: &EngineConfig,
        rng: &mut R,
    ) -> Self {
        let mut unplaced: Vec<Option<Fragment>> = payload
            .puzzle_fragments
            .iter()
            .enumerate()
            .map(|(i, content)| Some(Fragment::new(content.clone(), Some(i))))
            .collect();

        let (pool, chain) = match stored {
            Some(AnswerValue::Puzzle(contents)) if !contents.is_empty() => {
                let chain: Vec<Fragment> = contents
                    .iter()
                    .map(|content| {
                        unplaced
                            .iter_mut()
                            .find(|slot| matches!(slot, Some(f) if &f.content == content))
                            .and_then(Option::take)
                            .unwrap_or_else(|| {
                                tracing::debug!(content, "stored fragment not in payload, keeping as orphan");
                                Fragment::new(content.clone(), None)
                            })
                    })
                    .collect();
                (unplaced.into_iter().flatten().collect(), chain)
            }
            _ => {
                let mut pool: Vec<Fragment> = unplaced.into_iter().flatten().collect();
                pool.shuffle(rng);
                (pool, Vec::new())
            }
        };

        Self {
            solution: payload.puzzle_solution.clone(),
            fragment_count: payload.puzzle_fragments.len(),
            pool,
            chain,
            dragging: None,
            last_check: None,
            matcher: SolutionMatcher::new(config),
        }
    }

    pub fn pool(&self) -> &[Fragment] {
        &self.pool
    }

    pub fn chain(&self) -> &[Fragment] {
        &self.chain
    }

    /// True when the payload carried no fragments at all.
    pub fn is_empty(&self) -> bool {
        self.fragment_count == 0
    }

    pub fn dragging(&self) -> Option<Uuid> {
        self.dragging
    }

    /// Result of the most recent self-check, cleared by any later edit.
    pub fn last_check(&self) -> Option<bool> {
        self.last_check
    }

    pub fn answer(&self) -> AnswerValue {
        AnswerValue::Puzzle(self.chain.iter().map(|f| f.content.clone()).collect())
    }

    pub fn locate(&self, uid: Uuid) -> Option<(Zone, usize)> {
        if let Some(pos) = self.chain.iter().position(|f| f.uid == uid) {
            return Some((Zone::Chain, pos));
        }
        self.pool
            .iter()
            .position(|f| f.uid == uid)
            .map(|pos| (Zone::Pool, pos))
    }

    /// The uid at a position in a zone.
    pub fn uid_at(&self, zone: Zone, position: usize) -> Option<Uuid> {
        let list = match zone {
            Zone::Pool => &self.pool,
            Zone::Chain => &self.chain,
        };
        list.get(position).map(|f| f.uid)
    }

    /// Start dragging a fragment. Unknown uids are refused.
    pub fn begin_drag(&mut self, uid: Uuid) -> bool {
        if self.locate(uid).is_none() {
            tracing::debug!(%uid, "drag start on unknown fragment");
            return false;
        }
        self.dragging = Some(uid);
        true
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
    }

    /// Drop the dragged fragment at chain index `target`.
    pub fn drop_in_chain(&mut self, target: usize) -> Option<AnswerValue> {
        let uid = self.dragging.take()?;
        self.place(uid, target)
    }

    /// Drop the dragged fragment anywhere in the chain workspace. `centers`
    /// holds the horizontal center of each rendered chain item, in order.
    pub fn drop_in_workspace(&mut self, x: f64, centers: &[f64]) -> Option<AnswerValue> {
        let target = self.smart_index(x, centers);
        self.drop_in_chain(target)
    }

    /// Insertion index for a free drop: before the first item whose center
    /// lies right of `x`, else at the end.
    pub fn smart_index(&self, x: f64, centers: &[f64]) -> usize {
        centers
            .iter()
            .position(|&center| center > x)
            .unwrap_or(self.chain.len())
    }

    /// Drop the dragged fragment on the pool zone. Only chain fragments move.
    pub fn drop_on_pool(&mut self) -> Option<AnswerValue> {
        let uid = self.dragging.take()?;
        self.remove(uid)
    }

    /// Move a fragment into the chain at `target`, clamped to the chain
    /// length. Reordering within the chain accounts for the removed slot;
    /// fragments coming from the pool get a fresh uid.
    pub fn place(&mut self, uid: Uuid, target: usize) -> Option<AnswerValue> {
        let (zone, pos) = self.locate(uid)?;
        match zone {
            Zone::Chain => {
                let fragment = self.chain.remove(pos);
                let target = if pos < target { target - 1 } else { target };
                let target = target.min(self.chain.len());
                self.chain.insert(target, fragment);
            }
            Zone::Pool => {
                let fragment = self.pool.remove(pos).reminted();
                let target = target.min(self.chain.len());
                self.chain.insert(target, fragment);
            }
        }
        Some(self.changed())
    }

    /// Return a chain fragment to the pool. No-op for anything not in the
    /// chain.
    pub fn remove(&mut self, uid: Uuid) -> Option<AnswerValue> {
        let pos = self.chain.iter().position(|f| f.uid == uid)?;
        let fragment = self.chain.remove(pos).reminted();
        self.pool.push(fragment);
        if self.dragging == Some(uid) {
            self.dragging = None;
        }
        Some(self.changed())
    }

    /// Return every chain fragment to the pool.
    pub fn clear(&mut self) -> AnswerValue {
        let returned = std::mem::take(&mut self.chain);
        self.pool
            .extend(returned.into_iter().map(Fragment::reminted));
        self.dragging = None;
        self.changed()
    }

    /// Compare the assembled chain with the solution and remember the
    /// verdict until the next edit.
    pub fn check(&mut self) -> bool {
        let correct = self.matched_rule().is_some();
        self.last_check = Some(correct);
        correct
    }

    /// The rule that accepts the current chain, if any.
    pub fn matched_rule(&self) -> Option<MatchRule> {
        let solution = self.solution.as_deref()?;
        let contents: Vec<String> = self.chain.iter().map(|f| f.content.clone()).collect();
        self.matcher.matches(&self.matcher.join(&contents), solution)
    }

    fn changed(&mut self) -> AnswerValue {
        self.last_check = None;
        self.answer()
    }
}
