//! Discrete user gestures and the feedback they produce.
//!
//! Hosts with a real pointer layer can call the variant methods directly;
//! these enums exist for hosts that forward events generically and for
//! scripted replay. Fragments are addressed by zone and position, resolved
//! to their current identity at the moment the gesture is applied.

use serde::{Deserialize, Serialize};

use crate::variants::{MatchCheck, Zone};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Gesture {
    // single choice
    Select { key: String },
    // multiple choice
    Toggle { index: usize },
    // fill blank
    Edit { index: usize, value: String },
    ToggleHint { index: usize },
    // puzzle
    DragFragment { zone: Zone, position: usize },
    DropInChain { index: usize },
    DropInWorkspace { x: f64, centers: Vec<f64> },
    DropOnPool,
    RemoveFragment { position: usize },
    // matching
    SelectLeft { index: usize },
    ClickRight { index: usize },
    DragLeft { index: usize },
    DropOnRight { index: usize },
    Unpair { index: usize },
    // shared by puzzle and matching
    CancelDrag,
    Clear,
    Check,
}

/// What applying a gesture did, beyond any publication.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "feedback", rename_all = "snake_case")]
pub enum Feedback {
    /// State changed.
    Applied,
    /// The gesture did not apply to the active question; nothing changed.
    Ignored,
    /// Left-item selection after a click.
    Selection { left: Option<usize> },
    Hint { index: usize, visible: bool },
    PuzzleCheck { correct: bool },
    MatchCheck { verdict: MatchCheck },
}
